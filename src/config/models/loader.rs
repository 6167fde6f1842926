//! Keyed loader configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Serializable part of a keyed loader's options
///
/// Function-valued options (key derivation, scheduling) are supplied through
/// `LoaderOptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Maximum keys per underlying batch load; 0 means unlimited
    #[serde(default)]
    pub max_batch_size: usize,
    /// Maximum resident cache entries; 0 means unbounded
    #[serde(default)]
    pub max_cached_items: usize,
    /// Cache resolved values
    #[serde(default = "default_true")]
    pub cache: bool,
    /// Maximum live loaders in a pool; 0 means unbounded
    #[serde(default)]
    pub max_pools: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 0,
            max_cached_items: 0,
            cache: true,
            max_pools: 0,
        }
    }
}
