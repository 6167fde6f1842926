//! Error Handling utilities
//!
//! This module defines the failure taxonomy shared by every pipeline stage.

pub mod error;

// Re-export commonly used types
pub use error::*;
