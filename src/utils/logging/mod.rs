//! Logging utilities
//!
//! Installs a `tracing` subscriber for applications embedding the pipelines.
//! The library itself only emits events; it never installs a subscriber on
//! its own.

use crate::config::LoggingConfig;
use crate::utils::error::{PipelineError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber
///
/// `RUST_LOG` takes precedence over the configured level. A subscriber that is
/// already installed is left in place.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| PipelineError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed, keeping existing one");
    }

    Ok(())
}
