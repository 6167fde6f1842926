//! Redrive type definitions
//!
//! The transport seam, the shape of a partial-failure response and the
//! per-item outcome.

use crate::utils::error::{RetryExhaustedError, TransportError};
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

/// An item the remote side did not apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unprocessed {
    /// Position of the item in the submitted batch
    pub index: usize,
    /// Per-item error code, when the API reports one
    pub error_code: Option<String>,
}

/// Positional per-entry result, as returned by event-put style APIs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryResult {
    /// Identifier assigned to an accepted entry
    pub id: Option<String>,
    pub error_code: Option<String>,
}

impl EntryResult {
    pub fn accepted(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            error_code: None,
        }
    }

    pub fn rejected(error_code: impl Into<String>) -> Self {
        Self {
            id: None,
            error_code: Some(error_code.into()),
        }
    }
}

/// Outcome of one successful `send` call
///
/// Items not listed as unprocessed were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    unprocessed: Vec<Unprocessed>,
}

impl BatchResult {
    /// Every item was applied
    pub fn all_processed() -> Self {
        Self::default()
    }

    pub fn new(unprocessed: Vec<Unprocessed>) -> Self {
        Self { unprocessed }
    }

    /// Unprocessed items that carry no error code (batch-write shape)
    pub fn with_unprocessed_indices<I>(indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            unprocessed: indices
                .into_iter()
                .map(|index| Unprocessed {
                    index,
                    error_code: None,
                })
                .collect(),
        }
    }

    /// Build from entries aligned with the submitted batch
    ///
    /// An entry with an id was applied. An entry without an id but with an
    /// error code is unprocessed. An entry with neither cannot be judged and
    /// is treated as applied, as are missing trailing entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = EntryResult>,
    {
        let unprocessed = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match (entry.id, entry.error_code) {
                (None, Some(code)) => Some(Unprocessed {
                    index,
                    error_code: Some(code),
                }),
                _ => None,
            })
            .collect();
        Self { unprocessed }
    }

    pub fn push(&mut self, index: usize, error_code: Option<String>) {
        self.unprocessed.push(Unprocessed { index, error_code });
    }

    pub fn unprocessed(&self) -> &[Unprocessed] {
        &self.unprocessed
    }

    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }
}

/// The remote batch call
#[async_trait]
pub trait BatchSender<T: Send + Sync>: Send + Sync {
    async fn send_batch(&self, items: &[T]) -> Result<BatchResult, TransportError>;
}

#[async_trait]
impl<T, S> BatchSender<T> for Arc<S>
where
    T: Send + Sync,
    S: BatchSender<T> + ?Sized,
{
    async fn send_batch(&self, items: &[T]) -> Result<BatchResult, TransportError> {
        (**self).send_batch(items).await
    }
}

/// Adapter for closures that take an owned copy of the batch
pub struct FnSender<F>(pub F);

#[async_trait]
impl<T, F, Fut> BatchSender<T> for FnSender<F>
where
    T: Clone + Send + Sync,
    F: Fn(Vec<T>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<BatchResult, TransportError>> + Send,
{
    async fn send_batch(&self, items: &[T]) -> Result<BatchResult, TransportError> {
        (self.0)(items.to_vec()).await
    }
}

/// Terminal outcome for one item
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T: Debug> {
    /// The item was applied after `attempts` calls
    Delivered { item: T, attempts: u32 },
    /// The item will not be applied
    Failed(RetryExhaustedError<T>),
}

impl<T: Debug> Outcome<T> {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts, .. } => *attempts,
            Self::Failed(err) => err.attempts,
        }
    }

    pub fn item(&self) -> &T {
        match self {
            Self::Delivered { item, .. } => item,
            Self::Failed(err) => &err.item,
        }
    }

    pub fn into_result(self) -> Result<T, RetryExhaustedError<T>> {
        match self {
            Self::Delivered { item, .. } => Ok(item),
            Self::Failed(err) => Err(err),
        }
    }
}
