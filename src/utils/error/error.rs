//! Error handling for batching, redrive and pagination pipelines
//!
//! Two failure scopes exist. Whole-run failures ([`PipelineError`]) abort the
//! stream they occur in. Per-item failures ([`RetryExhaustedError`]) resolve a
//! single item's outcome and leave its siblings untouched.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures that terminate an entire pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The remote call was rejected as a whole
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A single item can never fit in a batch
    #[error(transparent)]
    SizeExceeded(#[from] SizeExceededError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the failure came from the remote side rather than local input
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Classification of a rejected remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The remote side is shedding load
    RateLimited,
    Timeout,
    Unavailable,
    Other,
}

/// The underlying call rejected entirely
///
/// Cloneable so that one failed batch load can be handed to every caller
/// waiting on a key in that batch.
#[derive(Debug, Clone)]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Other, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::RateLimited, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unavailable, message)
    }

    /// Attach the client library's own error
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == TransportErrorKind::RateLimited
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// An item whose own size exceeds the batch byte limit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("item at position {index} is {size} bytes, which exceeds the batch limit of {limit} bytes")]
pub struct SizeExceededError {
    /// Position of the item in the input sequence
    pub index: usize,
    pub size: usize,
    pub limit: usize,
}

/// Why an item stopped being redriven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustReason {
    /// The error code is not in the retryable set
    NotRetryable,
    /// The attempt ceiling was reached
    AttemptsExhausted,
}

/// A single item that could not be delivered
///
/// Carries the original payload and the last error code so callers can
/// dead-letter or inspect it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("item failed after {attempts} attempt(s) ({reason:?}): {}", .error_code.as_deref().unwrap_or("unprocessed"))]
pub struct RetryExhaustedError<T: fmt::Debug> {
    pub item: T,
    pub error_code: Option<String>,
    pub attempts: u32,
    pub reason: ExhaustReason,
}

impl<T: fmt::Debug> RetryExhaustedError<T> {
    pub fn into_item(self) -> T {
        self.item
    }
}
