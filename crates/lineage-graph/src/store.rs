//! Metadata store abstraction — the collaborator every traversal reads from.
//!
//! The loader only ever asks for batches by id and for the two type tables.
//! Transport, retries and timeouts belong to the implementation.

use async_trait::async_trait;
use lineage_core::{
    Artifact, ArtifactId, Event, Execution, ExecutionId, Result, TypeId, TypeNames,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Read-only view of a metadata store.
///
/// Every batched lookup must accept an empty id list and answer with an
/// empty result.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// All events whose artifact is one of `ids`.
    async fn events_by_artifact_ids(&self, ids: &[ArtifactId]) -> Result<Vec<Event>>;

    /// All events whose execution is one of `ids`.
    async fn events_by_execution_ids(&self, ids: &[ExecutionId]) -> Result<Vec<Event>>;

    async fn executions_by_ids(&self, ids: &[ExecutionId]) -> Result<Vec<Execution>>;

    async fn artifacts_by_ids(&self, ids: &[ArtifactId]) -> Result<Vec<Artifact>>;

    async fn artifact_types(&self) -> Result<TypeNames>;

    async fn execution_types(&self) -> Result<TypeNames>;
}

/// On-disk form of a store: everything a lineage view could ask for.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub artifact_types: HashMap<TypeId, String>,
    pub execution_types: HashMap<TypeId, String>,
    pub artifacts: Vec<Artifact>,
    pub executions: Vec<Execution>,
    pub events: Vec<Event>,
}

impl StoreSnapshot {
    /// Load a snapshot from `.json`, `.yaml` or `.yml`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let snapshot = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        tracing::debug!("loaded store snapshot from {}", path.display());
        Ok(snapshot)
    }
}

/// Store backed by an in-memory snapshot.
pub struct InMemoryStore {
    artifact_types: TypeNames,
    execution_types: TypeNames,
    artifacts: HashMap<ArtifactId, Artifact>,
    executions: HashMap<ExecutionId, Execution>,
    events: Vec<Event>,
}

impl InMemoryStore {
    pub fn new(snapshot: StoreSnapshot) -> Self {
        Self {
            artifact_types: snapshot.artifact_types.into_iter().collect(),
            execution_types: snapshot.execution_types.into_iter().collect(),
            artifacts: snapshot.artifacts.into_iter().map(|a| (a.id, a)).collect(),
            executions: snapshot.executions.into_iter().map(|e| (e.id, e)).collect(),
            events: snapshot.events,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(StoreSnapshot::load(path)?))
    }

    fn events_where(&self, ids: &[i64], key: impl Fn(&Event) -> i64) -> Vec<Event> {
        if ids.is_empty() {
            return Vec::new();
        }
        let wanted: HashSet<i64> = ids.iter().copied().collect();
        self.events
            .iter()
            .filter(|e| wanted.contains(&key(e)))
            .cloned()
            .collect()
    }
}

impl From<StoreSnapshot> for InMemoryStore {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self::new(snapshot)
    }
}

#[async_trait]
impl MetadataStore for InMemoryStore {
    async fn events_by_artifact_ids(&self, ids: &[ArtifactId]) -> Result<Vec<Event>> {
        Ok(self.events_where(ids, |e| e.artifact_id))
    }

    async fn events_by_execution_ids(&self, ids: &[ExecutionId]) -> Result<Vec<Event>> {
        Ok(self.events_where(ids, |e| e.execution_id))
    }

    // Request order, unknown ids skipped.
    async fn executions_by_ids(&self, ids: &[ExecutionId]) -> Result<Vec<Execution>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.executions.get(id).cloned())
            .collect())
    }

    async fn artifacts_by_ids(&self, ids: &[ArtifactId]) -> Result<Vec<Artifact>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.artifacts.get(id).cloned())
            .collect())
    }

    async fn artifact_types(&self) -> Result<TypeNames> {
        Ok(self.artifact_types.clone())
    }

    async fn execution_types(&self) -> Result<TypeNames> {
        Ok(self.execution_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::EventType;

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            artifact_types: [(1, "Dataset".to_string())].into_iter().collect(),
            execution_types: [(10, "Trainer".to_string())].into_iter().collect(),
            artifacts: vec![Artifact::new(1, 1), Artifact::new(2, 1)],
            executions: vec![Execution::new(100, 10)],
            events: vec![
                Event::new(1, 100, EventType::Input),
                Event::new(2, 100, EventType::Output),
            ],
        }
    }

    #[tokio::test]
    async fn empty_id_lists_return_empty() {
        let store = InMemoryStore::new(snapshot());
        assert!(store.events_by_artifact_ids(&[]).await.unwrap().is_empty());
        assert!(store.events_by_execution_ids(&[]).await.unwrap().is_empty());
        assert!(store.executions_by_ids(&[]).await.unwrap().is_empty());
        assert!(store.artifacts_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batched_lookup_keeps_request_order() {
        let store = InMemoryStore::new(snapshot());
        let artifacts = store.artifacts_by_ids(&[2, 99, 1]).await.unwrap();
        let ids: Vec<_> = artifacts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn events_by_execution_returns_union() {
        let store = InMemoryStore::new(snapshot());
        let events = store.events_by_execution_ids(&[100, 100]).await.unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn snapshot_loads_yaml_and_json() {
        let tmp = tempfile::tempdir().unwrap();

        let json_path = tmp.path().join("store.json");
        std::fs::write(&json_path, serde_json::to_string(&snapshot()).unwrap()).unwrap();
        let from_json = StoreSnapshot::load(&json_path).unwrap();
        assert_eq!(from_json.events.len(), 2);

        let yaml_path = tmp.path().join("store.yaml");
        std::fs::write(&yaml_path, serde_yaml::to_string(&snapshot()).unwrap()).unwrap();
        let from_yaml = StoreSnapshot::load(&yaml_path).unwrap();
        assert_eq!(from_yaml.artifacts.len(), 2);
        assert_eq!(from_yaml.artifact_types.get(&1).map(String::as_str), Some("Dataset"));
    }

    #[test]
    fn snapshot_missing_file_is_io_error() {
        let err = StoreSnapshot::load(Path::new("/nonexistent/store.json")).unwrap_err();
        assert!(err.to_string().starts_with("io error"));
    }
}
