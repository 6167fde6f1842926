//! Top-level pipeline configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Configuration for every stage, as read from a file or the environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub redrive: RedriveConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
