//! Count- and byte-bounded windowing of an item sequence

use super::sizer::ItemSizer;
use crate::config::WindowConfig;
use crate::utils::error::{PipelineError, SizeExceededError};
use futures::stream::{Stream, StreamExt};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// An ordered group of items that fits one remote call
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    items: Vec<T>,
    size_bytes: usize,
}

impl<T> Batch<T> {
    pub fn new(items: Vec<T>, size_bytes: usize) -> Self {
        Self { items, size_bytes }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cumulative size of the items as measured when they were windowed
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

impl<T> IntoIterator for Batch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Accumulates items into batches bounded by count and cumulative size
///
/// Batches become ready as soon as they are full; the last partial batch only
/// after [`flush`](Self::flush).
pub struct Windower<T, S> {
    config: WindowConfig,
    sizer: S,
    pending: Vec<T>,
    pending_size: usize,
    ready: VecDeque<Batch<T>>,
    seen: usize,
}

impl<T, S: ItemSizer<T>> Windower<T, S> {
    pub fn new(config: WindowConfig, sizer: S) -> Self {
        Self {
            pending: Vec::with_capacity(config.max_batch_count.min(1024)),
            config,
            sizer,
            pending_size: 0,
            ready: VecDeque::new(),
            seen: 0,
        }
    }

    /// Add the next item
    ///
    /// An item larger than the byte limit, or one that cannot be sized, can
    /// never be placed; the pending batch is discarded along with it.
    pub fn push(&mut self, item: T) -> Result<(), PipelineError> {
        let index = self.seen;
        self.seen += 1;

        let size = match self.sizer.size_of(&item) {
            Ok(size) => size,
            Err(e) => {
                warn!(index, error = %e, "Item cannot be sized");
                self.discard_pending();
                return Err(e.into());
            }
        };

        if size > self.config.max_message_size {
            warn!(
                index,
                size,
                limit = self.config.max_message_size,
                "Item exceeds batch size limit"
            );
            self.discard_pending();
            return Err(SizeExceededError {
                index,
                size,
                limit: self.config.max_message_size,
            }
            .into());
        }

        if !self.pending.is_empty()
            && self.pending_size.saturating_add(size) > self.config.max_message_size
        {
            self.cut();
        }

        self.pending.push(item);
        self.pending_size = self.pending_size.saturating_add(size);

        if self.pending.len() >= self.config.max_batch_count {
            self.cut();
        }

        Ok(())
    }

    /// Close the pending batch, if it has any items
    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.cut();
        }
    }

    /// Take the oldest completed batch
    pub fn pop_ready(&mut self) -> Option<Batch<T>> {
        self.ready.pop_front()
    }

    /// Number of items waiting in the open batch
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn discard_pending(&mut self) {
        self.pending.clear();
        self.pending_size = 0;
    }

    fn cut(&mut self) {
        let items = std::mem::take(&mut self.pending);
        let size = std::mem::replace(&mut self.pending_size, 0);
        debug!(count = items.len(), size_bytes = size, "Batch window closed");
        self.ready.push_back(Batch::new(items, size));
    }
}

/// Window a finite collection in one go
pub fn window_all<T, S, I>(
    items: I,
    config: WindowConfig,
    sizer: S,
) -> Result<Vec<Batch<T>>, PipelineError>
where
    S: ItemSizer<T>,
    I: IntoIterator<Item = T>,
{
    let mut windower = Windower::new(config, sizer);
    let mut batches = Vec::new();

    for item in items {
        windower.push(item)?;
        while let Some(batch) = windower.pop_ready() {
            batches.push(batch);
        }
    }

    windower.flush();
    batches.extend(windower.pop_ready());
    Ok(batches)
}

/// Window an item stream
///
/// Each batch is yielded as soon as it closes. An oversized item ends the
/// stream with [`PipelineError::SizeExceeded`], an item without a JSON form
/// with [`PipelineError::Serialization`].
pub fn window_stream<T, S, St>(
    input: St,
    config: WindowConfig,
    sizer: S,
) -> impl Stream<Item = Result<Batch<T>, PipelineError>>
where
    S: ItemSizer<T>,
    St: Stream<Item = T>,
{
    async_stream::try_stream! {
        let mut windower = Windower::new(config, sizer);
        futures::pin_mut!(input);

        while let Some(item) = input.next().await {
            windower.push(item)?;
            while let Some(batch) = windower.pop_ready() {
                yield batch;
            }
        }

        windower.flush();
        while let Some(batch) = windower.pop_ready() {
            yield batch;
        }
    }
}
