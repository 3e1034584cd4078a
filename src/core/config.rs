//! Store configuration.
//!
//! The configuration is an explicit value injected at store construction.
//! Nothing in the core reads ambient files; `StoreConfig::from_file` exists
//! for callers (the CLI) that load the original `config.json` wire shape.

use crate::core::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Repository binding for a store.
///
/// `database_address` is the filesystem root of the git repository that
/// holds the records. Each concrete store scopes itself to a subdirectory
/// ("database") under that root.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(rename = "database-address")]
    pub database_address: PathBuf,
}

impl StoreConfig {
    pub fn new(database_address: impl Into<PathBuf>) -> Self {
        Self {
            database_address: database_address.into(),
        }
    }

    /// Load a `{"database-address": "..."}` JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: StoreConfig = serde_json::from_str(&raw).map_err(|e| {
            StoreError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        Ok(config)
    }
}
