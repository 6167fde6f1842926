//! Configuration loading utilities
//!
//! Environment overrides use the `REDRIVE_` prefix. Lookup is injected so the
//! parsing can be tested without touching the process environment.

use super::models::*;
use crate::utils::error::{PipelineError, Result};
use std::str::FromStr;
use tracing::debug;

fn parse_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| PipelineError::Config(format!("Invalid {}: {}", name, e))),
        None => Ok(None),
    }
}

impl PipelineConfig {
    /// Overlay environment variables on top of this configuration
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Merging REDRIVE_* environment overrides");

        // Window
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_BATCH_COUNT")? {
            self.window.max_batch_count = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_MESSAGE_SIZE")? {
            self.window.max_message_size = v;
        }

        // Redrive
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_ATTEMPTS")? {
            self.redrive.max_attempts = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_THROTTLE_MS")? {
            self.redrive.throttle_ms = v;
        }
        if let Some(codes) = lookup("REDRIVE_RETRY_ON") {
            self.redrive.retry_on = codes
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_RETRY_UNCLASSIFIED")? {
            self.redrive.retry_unclassified = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_BACKOFF_MULTIPLIER")? {
            self.redrive.backoff_multiplier = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_THROTTLE_MS")? {
            self.redrive.max_throttle_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_JITTER")? {
            self.redrive.jitter = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_CONCURRENCY")? {
            self.redrive.concurrency = v;
        }

        // Loader
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_BATCH_SIZE")? {
            self.loader.max_batch_size = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_CACHED_ITEMS")? {
            self.loader.max_cached_items = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_CACHE")? {
            self.loader.cache = v;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_MAX_POOLS")? {
            self.loader.max_pools = v;
        }

        // Logging
        if let Some(level) = lookup("REDRIVE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(v) = parse_var(&lookup, "REDRIVE_LOG_JSON")? {
            self.logging.json = v;
        }

        Ok(self)
    }
}
