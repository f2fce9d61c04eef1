//! Layered configuration. Every section falls back to `defaults` when omitted.

mod clustering_config;
pub mod defaults;
mod embedding_config;
mod observability_config;
mod scheduler_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use clustering_config::ClusteringConfig;
pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use scheduler_config::SchedulerConfig;

use crate::errors::{InsightError, InsightResult};

/// Root configuration for the whole system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub embedding: EmbeddingConfig,
    pub clustering: ClusteringConfig,
    pub scheduler: SchedulerConfig,
    pub observability: ObservabilityConfig,
}

impl InsightConfig {
    /// Parse a (possibly partial) TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> InsightResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| InsightError::ConfigError(format!("{}: {e}", path.display())))?;
        let config =
            Self::from_toml(&raw).map_err(|e| InsightError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> InsightResult<()> {
        self.clustering.validate()?;
        self.scheduler.validate()
    }
}
