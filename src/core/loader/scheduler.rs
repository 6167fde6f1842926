//! Coalescing window schedulers
//!
//! A loader opens a pending window on the first `load` after a dispatch and
//! hands its dispatch future to a scheduler. Every `load` that arrives before
//! the scheduler runs that future joins the same window.

use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::time::Duration;

pub trait BatchScheduler: Send + Sync {
    /// Arrange for `dispatch` to run once the window should close
    fn schedule(&self, dispatch: BoxFuture<'static, ()>);
}

/// Close the window on the next runtime tick
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct YieldScheduler;

impl BatchScheduler for YieldScheduler {
    fn schedule(&self, dispatch: BoxFuture<'static, ()>) {
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            dispatch.await;
        });
    }
}

/// Keep the window open for a fixed interval
#[derive(Debug, Clone, Copy)]
pub struct DelayScheduler(pub Duration);

impl BatchScheduler for DelayScheduler {
    fn schedule(&self, dispatch: BoxFuture<'static, ()>) {
        let delay = self.0;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            dispatch.await;
        });
    }
}

/// Windows close only when [`ManualScheduler::run_pending`] is awaited
#[derive(Default)]
pub struct ManualScheduler {
    queued: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of dispatches waiting to run
    pub fn pending(&self) -> usize {
        self.queued.lock().len()
    }

    /// Run every queued dispatch to completion, in scheduling order
    pub async fn run_pending(&self) {
        let queued = std::mem::take(&mut *self.queued.lock());
        for dispatch in queued {
            dispatch.await;
        }
    }
}

impl BatchScheduler for ManualScheduler {
    fn schedule(&self, dispatch: BoxFuture<'static, ()>) {
        self.queued.lock().push(dispatch);
    }
}
