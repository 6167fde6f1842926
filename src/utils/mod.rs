//! Shared utilities
//!
//! Error taxonomy, logging setup and the bounded map used by loader caches
//! and pools.

pub mod bounded_map;
pub mod error;
pub mod logging;

pub use bounded_map::BoundedMap;
pub use error::{PipelineError, Result};
