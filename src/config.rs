//! Adapter configuration
//!
//! ```toml
//! binary = "/usr/local/bin/evm"
//! channel_capacity = 1
//! name = "geth"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Result, TraceError};

pub const DEFAULT_BINARY: &str = "evm";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;
pub const DEFAULT_NAME: &str = "geth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Path to the VM executable
    pub binary: PathBuf,
    /// Bound of the delivery channel; values below 1 are raised to 1
    pub channel_capacity: usize,
    /// Adapter name used in diagnostics
    pub name: String,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl TraceConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TraceConfig = toml::from_str(content)?;
        config.validate()
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        tracing::debug!("Loaded trace config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Reject unusable settings and normalize the rest.
    pub fn validate(mut self) -> Result<Self> {
        if self.binary.as_os_str().is_empty() {
            return Err(TraceError::Config("binary path must not be empty".to_string()));
        }
        if self.channel_capacity == 0 {
            tracing::warn!("channel_capacity of 0 raised to 1");
            self.channel_capacity = 1;
        }
        Ok(self)
    }
}
