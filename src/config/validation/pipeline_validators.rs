//! Pipeline configuration validators
//!
//! Validation implementations for the window, redrive, loader and logging
//! sections, plus the aggregate.

use super::Validate;
use crate::config::models::*;

impl Validate for WindowConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_batch_count == 0 {
            return Err("max_batch_count must be greater than 0".to_string());
        }

        if self.max_message_size == 0 {
            return Err("max_message_size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RedriveConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(format!(
                "backoff_multiplier must be a finite value >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.max_throttle_ms < self.throttle_ms {
            return Err(format!(
                "max_throttle_ms ({}) must not be smaller than throttle_ms ({})",
                self.max_throttle_ms, self.throttle_ms
            ));
        }

        if self.concurrency == 0 {
            return Err("concurrency must be greater than 0".to_string());
        }

        if self.retry_on.iter().any(|code| code.trim().is_empty()) {
            return Err("retry_on must not contain empty error codes".to_string());
        }

        Ok(())
    }
}

impl Validate for LoaderConfig {
    fn validate(&self) -> Result<(), String> {
        // every combination of zero/non-zero limits is meaningful
        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("log level must not be empty".to_string());
        }
        Ok(())
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        self.window
            .validate()
            .map_err(|e| format!("window: {}", e))?;
        self.redrive
            .validate()
            .map_err(|e| format!("redrive: {}", e))?;
        self.loader
            .validate()
            .map_err(|e| format!("loader: {}", e))?;
        self.logging
            .validate()
            .map_err(|e| format!("logging: {}", e))?;
        Ok(())
    }
}
