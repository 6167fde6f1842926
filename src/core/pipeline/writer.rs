//! Windowed, redriven batch writes

use crate::config::{PipelineConfig, RedriveConfig, WindowConfig};
use crate::core::feedback::Feedback;
use crate::core::redrive::{BatchResult, BatchSender, OutcomeStream, Redriver};
use crate::core::window::{ItemSizer, window_stream};
use futures::stream::{self, Stream};
use std::fmt::Debug;
use tracing::debug;

/// Window `items` and redrive every batch through `redriver`
///
/// The returned stream yields one outcome per item. It ends early with an
/// error if an item is oversized or a batch call is rejected outright.
pub fn write_all<T, S, Z, St>(
    items: St,
    window: WindowConfig,
    sizer: Z,
    redriver: &Redriver<T, S>,
) -> OutcomeStream<T>
where
    T: Debug + Send + Sync + 'static,
    S: BatchSender<T> + 'static,
    Z: ItemSizer<T> + 'static,
    St: Stream<Item = T> + Send + 'static,
{
    debug!(
        max_batch_count = window.max_batch_count,
        max_message_size = window.max_message_size,
        "Starting batch write"
    );
    redriver.redrive(window_stream(items, window, sizer))
}

/// A configured write path over one sender
pub struct BatchWriter<T, S, Z> {
    window: WindowConfig,
    sizer: Z,
    redriver: Redriver<T, S>,
}

impl<T, S, Z> BatchWriter<T, S, Z>
where
    T: Debug + Send + Sync + 'static,
    S: BatchSender<T> + 'static,
    Z: ItemSizer<T> + Clone + 'static,
{
    pub fn new(sender: S, window: WindowConfig, redrive: RedriveConfig, sizer: Z) -> Self {
        Self {
            window,
            sizer,
            redriver: Redriver::new(sender, redrive),
        }
    }

    pub fn from_config(sender: S, config: &PipelineConfig, sizer: Z) -> Self {
        Self::new(sender, config.window.clone(), config.redrive.clone(), sizer)
    }

    pub fn with_feedback(mut self, feedback: impl Feedback<BatchResult> + 'static) -> Self {
        self.redriver = self.redriver.with_feedback(feedback);
        self
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn redriver(&self) -> &Redriver<T, S> {
        &self.redriver
    }

    pub fn write<St>(&self, items: St) -> OutcomeStream<T>
    where
        St: Stream<Item = T> + Send + 'static,
    {
        write_all(items, self.window.clone(), self.sizer.clone(), &self.redriver)
    }

    pub fn write_iter<I>(&self, items: I) -> OutcomeStream<T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        self.write(stream::iter(items))
    }
}
