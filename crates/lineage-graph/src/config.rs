//! Lineage view configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file exists.

use lineage_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level lineage view configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    /// Column titles and spacing.
    pub columns: ColumnConfig,
    /// Card display hints passed through to the renderer.
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Titles for ipa, ipx, target, opx, opa. Execution columns are untitled by default.
    pub names: [String; 5],
    /// Horizontal padding between columns.
    pub padding: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fixed card width; the renderer picks one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_width: Option<u32>,
}

pub const DEFAULT_COLUMN_PADDING: u32 = 40;

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            names: [
                "Input Artifact".into(),
                String::new(),
                "Target".into(),
                String::new(),
                "Output Artifact".into(),
            ],
            padding: DEFAULT_COLUMN_PADDING,
        }
    }
}

impl LineageConfig {
    /// Load config from a TOML file. Unreadable or malformed files are errors.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(Error::Io(_)) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Render the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
