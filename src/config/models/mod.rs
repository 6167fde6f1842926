//! Configuration data models
//!
//! This module defines the serializable configuration for every pipeline stage.

#![allow(missing_docs)]

pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod redrive;
pub mod window;

// Re-export all configuration types
pub use loader::*;
pub use logging::*;
pub use pipeline::*;
pub use redrive::*;
pub use window::*;

/// Default maximum items per batch
pub fn default_max_batch_count() -> usize {
    25
}

/// Default maximum serialized bytes per batch
pub fn default_max_message_size() -> usize {
    256_000
}

/// Default attempt ceiling per item
pub fn default_max_attempts() -> u32 {
    10
}

/// Default interval between redrive rounds (milliseconds)
pub fn default_throttle_ms() -> u64 {
    500
}

pub fn default_max_throttle_ms() -> u64 {
    30_000
}

pub fn default_backoff_multiplier() -> f64 {
    1.0
}

pub fn default_retry_on() -> Vec<String> {
    vec![
        "ThrottlingException".to_string(),
        "InternalFailure".to_string(),
        "ProvisionedThroughputExceededException".to_string(),
    ]
}

pub fn default_concurrency() -> usize {
    1
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}
