//! Engine configuration.
//!
//! ```toml
//! verify_signatures = true
//! decrypt_by_default = true
//!
//! [index]
//! api_base_url = "http://localhost:1260"
//! timeout_secs = 30
//! ```

use crate::error::RecordResult;
use radiks_store::RemoteIndexConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for a [`RecordStore`](crate::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verify signatures of fetched documents.
    pub verify_signatures: bool,
    /// Default for [`FetchOptions::decrypt`](crate::FetchOptions).
    pub decrypt_by_default: bool,
    /// Remote index connection.
    pub index: RemoteIndexConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verify_signatures: true,
            decrypt_by_default: true,
            index: RemoteIndexConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> RecordResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> RecordResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> RecordResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
