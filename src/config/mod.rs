//! Configuration management for the pipelines
//!
//! This module handles loading and validation of the serializable part of the
//! pipeline configuration. Callback-valued options are supplied in code.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{PipelineError, Result};
use std::path::Path;
use tracing::{debug, info};

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate().map_err(PipelineError::Config)?;
        Ok(config)
    }

    /// Load configuration from `REDRIVE_*` environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self::default().merge_env(|name| std::env::var(name).ok())?;
        config.validate().map_err(PipelineError::Config)?;
        Ok(config)
    }
}
