//! Graph Loader — bounded two-hop traversal around a target artifact.
//!
//! ```text
//!   input artifacts ──▶ input executions ──▶ TARGET ──▶ output executions ──▶ output artifacts
//! ```
//!
//! Hop one reads the target's own events: an execution that *output* the
//! target is an input execution, an execution that took the target as
//! *input* is an output execution. Hop two reads those executions' events
//! and keeps only the inputs of the input executions and the outputs of the
//! output executions.
//!
//! Every step fans out its independent fetches and waits for all of them.
//! Any failure aborts the traversal; nothing partial is ever returned.

use crate::store::MetadataStore;
use chrono::{DateTime, Utc};
use lineage_core::{
    Artifact, ArtifactId, Error, Event, Execution, ExecutionId, Result, TypeNames,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Everything one traversal produced. Committed as a unit.
#[derive(Clone, Debug, Serialize)]
pub struct LineageGraph {
    pub target: Artifact,
    pub input_artifacts: Vec<Artifact>,
    pub input_executions: Vec<Execution>,
    pub output_executions: Vec<Execution>,
    pub output_artifacts: Vec<Artifact>,
    /// Type tables fetched alongside the graph, so labels never outlive it.
    pub artifact_types: TypeNames,
    pub execution_types: TypeNames,
    pub loaded_at: DateTime<Utc>,
}

impl LineageGraph {
    /// Artifact ids across both artifact columns plus the target.
    pub fn contains_artifact(&self, id: ArtifactId) -> bool {
        self.target.id == id
            || self.input_artifacts.iter().any(|a| a.id == id)
            || self.output_artifacts.iter().any(|a| a.id == id)
    }
}

/// Execution ids split by which side of the target they sit on.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ExecutionSides {
    /// Executions that produced the target.
    pub inputs: Vec<ExecutionId>,
    /// Executions that consumed the target.
    pub outputs: Vec<ExecutionId>,
}

pub(crate) fn partition_target_events(events: &[Event]) -> ExecutionSides {
    let mut sides = ExecutionSides::default();
    for event in events {
        if event.is_output() {
            sides.inputs.push(event.execution_id);
        } else if event.is_input() {
            sides.outputs.push(event.execution_id);
        }
    }
    sides
}

fn artifact_ids_where(events: &[Event], keep: impl Fn(&Event) -> bool) -> Vec<ArtifactId> {
    events
        .iter()
        .filter(|e| keep(*e))
        .map(|e| e.artifact_id)
        .collect()
}

/// Runs traversals against one store.
#[derive(Clone)]
pub struct GraphLoader {
    store: Arc<dyn MetadataStore>,
}

impl GraphLoader {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Traverse two hops out from `target_id` in both directions.
    pub async fn load(&self, target_id: ArtifactId) -> Result<LineageGraph> {
        let store = self.store.as_ref();
        let target_ids = [target_id];

        // Step 1: target events, both type tables and the target record.
        let (target_events, artifact_types, execution_types, targets) = tokio::try_join!(
            store.events_by_artifact_ids(&target_ids),
            store.artifact_types(),
            store.execution_types(),
            store.artifacts_by_ids(&target_ids),
        )?;
        let target = targets
            .into_iter()
            .find(|a| a.id == target_id)
            .ok_or(Error::ArtifactNotFound(target_id))?;

        // Step 2.
        let sides = partition_target_events(&target_events);
        debug!(
            target_id,
            events = target_events.len(),
            input_executions = sides.inputs.len(),
            output_executions = sides.outputs.len(),
            "partitioned target events"
        );

        // Step 3.
        let (output_executions, input_executions) = tokio::try_join!(
            store.executions_by_ids(&sides.outputs),
            store.executions_by_ids(&sides.inputs),
        )?;

        // Step 4.
        let (input_execution_events, output_execution_events) = tokio::try_join!(
            store.events_by_execution_ids(&sides.inputs),
            store.events_by_execution_ids(&sides.outputs),
        )?;

        // Steps 5 and 6.
        let input_artifact_ids = artifact_ids_where(&input_execution_events, Event::is_input);
        let output_artifact_ids = artifact_ids_where(&output_execution_events, Event::is_output);
        debug!(
            target_id,
            input_artifacts = input_artifact_ids.len(),
            output_artifacts = output_artifact_ids.len(),
            "collected second-hop artifact ids"
        );

        // Step 7.
        let (input_artifacts, output_artifacts) = tokio::try_join!(
            store.artifacts_by_ids(&input_artifact_ids),
            store.artifacts_by_ids(&output_artifact_ids),
        )?;

        info!(
            target_id,
            input_artifacts = input_artifacts.len(),
            input_executions = input_executions.len(),
            output_executions = output_executions.len(),
            output_artifacts = output_artifacts.len(),
            "lineage loaded"
        );

        Ok(LineageGraph {
            target,
            input_artifacts,
            input_executions,
            output_executions,
            output_artifacts,
            artifact_types,
            execution_types,
            loaded_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::EventType;

    #[test]
    fn output_event_means_input_execution() {
        let sides = partition_target_events(&[Event::new(1, 10, EventType::Output)]);
        assert_eq!(sides.inputs, vec![10]);
        assert!(sides.outputs.is_empty());
    }

    #[test]
    fn input_event_means_output_execution() {
        let sides = partition_target_events(&[Event::new(1, 20, EventType::Input)]);
        assert!(sides.inputs.is_empty());
        assert_eq!(sides.outputs, vec![20]);
    }

    #[test]
    fn declared_variants_partition_like_plain_ones() {
        let plain = partition_target_events(&[
            Event::new(1, 10, EventType::Output),
            Event::new(1, 20, EventType::Input),
        ]);
        let declared = partition_target_events(&[
            Event::new(1, 10, EventType::DeclaredOutput),
            Event::new(1, 20, EventType::DeclaredInput),
        ]);
        assert_eq!(plain, declared);
    }

    #[test]
    fn unclassified_events_are_ignored() {
        let sides = partition_target_events(&[
            Event::new(1, 10, EventType::Unknown),
            Event::new(1, 11, EventType::InternalInput),
            Event::new(1, 12, EventType::InternalOutput),
        ]);
        assert_eq!(sides, ExecutionSides::default());
    }

    #[test]
    fn partition_keeps_event_order() {
        let sides = partition_target_events(&[
            Event::new(1, 30, EventType::Output),
            Event::new(1, 10, EventType::Output),
            Event::new(1, 20, EventType::Output),
        ]);
        assert_eq!(sides.inputs, vec![30, 10, 20]);
    }
}
