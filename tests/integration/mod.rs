//! Integration tests for redrive
//!
//! These tests drive the public API against mocked or in-memory transports.

pub mod config_file_tests;
pub mod loader_tests;
pub mod pagination_tests;
pub mod write_pipeline_tests;
