//! Redrive configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controls how unprocessed items are resubmitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedriveConfig {
    /// Attempt ceiling per item; 0 or 1 sends once and never redrives
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Interval before each redrive round (milliseconds)
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Error codes that make an unprocessed item eligible for another attempt
    #[serde(default = "default_retry_on")]
    pub retry_on: Vec<String>,
    /// Treat unprocessed items that carry no error code as retryable
    #[serde(default = "default_true")]
    pub retry_unclassified: bool,
    /// Growth factor applied to the throttle after each round
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Upper bound for the grown throttle (milliseconds)
    #[serde(default = "default_max_throttle_ms")]
    pub max_throttle_ms: u64,
    /// Spread each throttle by up to 10% in either direction
    #[serde(default)]
    pub jitter: bool,
    /// Batches redriven at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for RedriveConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            throttle_ms: default_throttle_ms(),
            retry_on: default_retry_on(),
            retry_unclassified: true,
            backoff_multiplier: default_backoff_multiplier(),
            max_throttle_ms: default_max_throttle_ms(),
            jitter: false,
            concurrency: default_concurrency(),
        }
    }
}

impl RedriveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_throttle(mut self, throttle: Duration) -> Self {
        self.throttle_ms = throttle.as_millis() as u64;
        self
    }

    pub fn with_retry_on<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retry_on = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_retry_unclassified(mut self, retry: bool) -> Self {
        self.retry_unclassified = retry;
        self
    }

    pub fn with_backoff(mut self, multiplier: f64, max_throttle: Duration) -> Self {
        self.backoff_multiplier = multiplier;
        self.max_throttle_ms = max_throttle.as_millis() as u64;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn max_throttle(&self) -> Duration {
        Duration::from_millis(self.max_throttle_ms)
    }

    /// Whether an error code is in the retryable set
    pub fn is_retryable(&self, error_code: Option<&str>) -> bool {
        match error_code {
            Some(code) => self.retry_on.iter().any(|c| c == code),
            None => self.retry_unclassified,
        }
    }
}
