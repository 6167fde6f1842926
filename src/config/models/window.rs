//! Windowing configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Bounds applied to every batch produced by the windower
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum items per batch
    #[serde(default = "default_max_batch_count")]
    pub max_batch_count: usize,
    /// Maximum cumulative item size per batch, in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_batch_count: default_max_batch_count(),
            max_message_size: default_max_message_size(),
        }
    }
}

impl WindowConfig {
    pub fn new(max_batch_count: usize, max_message_size: usize) -> Self {
        Self {
            max_batch_count,
            max_message_size,
        }
    }

    /// Count-only window, with no practical byte limit
    pub fn count_only(max_batch_count: usize) -> Self {
        Self::new(max_batch_count, usize::MAX)
    }
}
