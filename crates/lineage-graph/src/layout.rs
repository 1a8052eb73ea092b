//! Five-column render model handed to the presentation layer.

use crate::cards::{CardGroup, CardGrouper, RouteBuilder, TargetContext};
use crate::config::LineageConfig;
use crate::loader::LineageGraph;
use lineage_core::{ArtifactId, ResourceKind};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnType {
    #[serde(rename = "ipa")]
    InputArtifact,
    #[serde(rename = "ipx")]
    InputExecution,
    #[serde(rename = "target")]
    Target,
    #[serde(rename = "opx")]
    OutputExecution,
    #[serde(rename = "opa")]
    OutputArtifact,
}

impl ColumnType {
    pub const ALL: [ColumnType; 5] = [
        Self::InputArtifact,
        Self::InputExecution,
        Self::Target,
        Self::OutputExecution,
        Self::OutputArtifact,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::InputArtifact => "ipa",
            Self::InputExecution => "ipx",
            Self::Target => "target",
            Self::OutputExecution => "opx",
            Self::OutputArtifact => "opa",
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::InputExecution | Self::OutputExecution => ResourceKind::Execution,
            _ => ResourceKind::Artifact,
        }
    }

    /// Output-side columns bind their edges on the left.
    pub fn reverse_bindings(&self) -> bool {
        matches!(self, Self::OutputExecution | Self::OutputArtifact)
    }

    /// Clicking a card in these columns moves the target.
    pub fn selectable(&self) -> bool {
        matches!(self, Self::InputArtifact | Self::OutputArtifact)
    }

    fn index(&self) -> usize {
        match self {
            Self::InputArtifact => 0,
            Self::InputExecution => 1,
            Self::Target => 2,
            Self::OutputExecution => 3,
            Self::OutputArtifact => 4,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardColumn {
    pub column_type: ColumnType,
    pub title: String,
    pub kind: ResourceKind,
    pub reverse_bindings: bool,
    pub selectable: bool,
    pub padding: u32,
    pub cards: Vec<CardGroup>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineageLayout {
    pub target_id: ArtifactId,
    /// Card width hint from config; the renderer picks one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_width: Option<u32>,
    pub columns: [CardColumn; 5],
}

impl LineageLayout {
    pub fn build(graph: &LineageGraph, routes: &dyn RouteBuilder, config: &LineageConfig) -> Self {
        let grouper = CardGrouper::new(&graph.artifact_types, &graph.execution_types, routes);
        let target_ctx = TargetContext {
            has_input_executions: !graph.input_executions.is_empty(),
            has_output_executions: !graph.output_executions.is_empty(),
        };

        let columns = ColumnType::ALL.map(|column_type| {
            let cards = match column_type {
                ColumnType::InputArtifact => grouper.artifact_cards(&graph.input_artifacts, None),
                ColumnType::InputExecution => grouper.execution_cards(&graph.input_executions),
                ColumnType::Target => {
                    grouper.artifact_cards(std::slice::from_ref(&graph.target), Some(target_ctx))
                }
                ColumnType::OutputExecution => grouper.execution_cards(&graph.output_executions),
                ColumnType::OutputArtifact => {
                    grouper.artifact_cards(&graph.output_artifacts, None)
                }
            };
            CardColumn {
                column_type,
                title: config.columns.names[column_type.index()].clone(),
                kind: column_type.kind(),
                reverse_bindings: column_type.reverse_bindings(),
                selectable: column_type.selectable(),
                padding: config.columns.padding,
                cards,
            }
        });

        Self {
            target_id: graph.target.id,
            card_width: config.display.card_width,
            columns,
        }
    }

    pub fn column(&self, column_type: ColumnType) -> &CardColumn {
        &self.columns[column_type.index()]
    }

    /// True when `id` sits in a column whose cards may become the new target.
    pub fn is_selectable(&self, id: ArtifactId) -> bool {
        self.columns
            .iter()
            .filter(|c| c.selectable)
            .flat_map(|c| c.cards.iter())
            .flat_map(|card| card.rows.iter())
            .any(|row| row.resource.kind() == ResourceKind::Artifact && row.resource.id() == id)
    }
}
