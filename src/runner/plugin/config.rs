//! Engine configuration file parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::registry::ConfigError;
use crate::runner::ds::heap::HeapConfig;

/// Complete engine configuration.
///
/// Expected format:
/// ```toml
/// [heap]
/// max_bytes = 1048576
/// ```
/// Every section is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub heap: HeapConfig,
}

impl EngineConfig {
    /// Create the default configuration: unlimited heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
