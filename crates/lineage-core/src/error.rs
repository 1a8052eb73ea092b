//! Error types for lineage traversal

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("fetch failed: {operation} - {message}")]
    Fetch { operation: String, message: String },

    #[error("artifact not found: {0}")]
    ArtifactNotFound(i64),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn fetch(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Transport failures are the only kind a caller could sensibly retry.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}
