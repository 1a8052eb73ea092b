//! Core types for lineage traversal
//!
//! Records mirror what the metadata store hands back. Once fetched they are
//! plain values: cloned into columns, never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ArtifactId = i64;
pub type ExecutionId = i64;
pub type TypeId = i64;

/// An artifact record (dataset, model, metrics, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub type_id: TypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Artifact {
    pub fn new(id: ArtifactId, type_id: TypeId) -> Self {
        Self {
            id,
            type_id,
            uri: None,
            name: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// An execution record (a run of some component).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub type_id: TypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Execution {
    pub fn new(id: ExecutionId, type_id: TypeId) -> Self {
        Self {
            id,
            type_id,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Direction of an artifact/execution link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Unknown,
    DeclaredOutput,
    DeclaredInput,
    Input,
    Output,
    InternalInput,
    InternalOutput,
}

impl EventType {
    /// INPUT and DECLARED_INPUT are the same thing as far as lineage goes.
    pub fn is_input(self) -> bool {
        matches!(self, Self::Input | Self::DeclaredInput)
    }

    /// OUTPUT and DECLARED_OUTPUT, likewise.
    pub fn is_output(self) -> bool {
        matches!(self, Self::Output | Self::DeclaredOutput)
    }
}

/// Links one artifact to one execution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub artifact_id: ArtifactId,
    pub execution_id: ExecutionId,
    #[serde(rename = "type", default)]
    pub kind: EventType,
}

impl Event {
    pub fn new(artifact_id: ArtifactId, execution_id: ExecutionId, kind: EventType) -> Self {
        Self {
            artifact_id,
            execution_id,
            kind,
        }
    }

    pub fn is_input(&self) -> bool {
        self.kind.is_input()
    }

    pub fn is_output(&self) -> bool {
        self.kind.is_output()
    }
}

/// Type id -> display name. Lookups never fail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeNames(HashMap<TypeId, String>);

impl TypeNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TypeId, name: impl Into<String>) {
        self.0.insert(id, name.into());
    }

    pub fn get(&self, id: TypeId) -> Option<&str> {
        self.0.get(&id).map(|s| s.as_str())
    }

    /// Name for `id`, or `(unknown type <id>)` when the store never declared it.
    pub fn name_or_placeholder(&self, id: TypeId) -> String {
        match self.get(id) {
            Some(name) => name.to_string(),
            None => unknown_type_label(id),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(TypeId, S)> for TypeNames {
    fn from_iter<I: IntoIterator<Item = (TypeId, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, name)| (id, name.into())).collect())
    }
}

pub fn unknown_type_label(id: TypeId) -> String {
    format!("(unknown type {})", id)
}

/// Which side of the bipartite graph a resource lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Artifact,
    Execution,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Artifact => write!(f, "artifact"),
            Self::Execution => write!(f, "execution"),
        }
    }
}

/// Anything that can sit in a lineage card row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LineageResource {
    Artifact(Artifact),
    Execution(Execution),
}

impl LineageResource {
    pub fn id(&self) -> i64 {
        match self {
            Self::Artifact(a) => a.id,
            Self::Execution(e) => e.id,
        }
    }

    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Artifact(a) => a.type_id,
            Self::Execution(e) => e.type_id,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Artifact(_) => ResourceKind::Artifact,
            Self::Execution(_) => ResourceKind::Execution,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Artifact(a) => a.name.as_deref(),
            Self::Execution(e) => e.name.as_deref(),
        }
    }

    pub fn as_artifact(&self) -> Option<&Artifact> {
        match self {
            Self::Artifact(a) => Some(a),
            Self::Execution(_) => None,
        }
    }
}

impl From<Artifact> for LineageResource {
    fn from(a: Artifact) -> Self {
        Self::Artifact(a)
    }
}

impl From<Execution> for LineageResource {
    fn from(e: Execution) -> Self {
        Self::Execution(e)
    }
}
