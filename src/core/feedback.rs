//! Inter-attempt feedback hooks
//!
//! A feedback hook runs after a response that requires a follow-up call (a
//! partial batch failure or a page with a continuation cursor) and before
//! that follow-up is issued. It is the place for metrics, logging or extra
//! delay.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Feedback<R: Sync>: Send + Sync {
    /// Called with the response that triggered the follow-up and the number
    /// of calls made so far
    async fn on_response(&self, response: &R, calls: u32);
}

/// Feedback that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

#[async_trait]
impl<R: Sync> Feedback<R> for NoFeedback {
    async fn on_response(&self, _response: &R, _calls: u32) {}
}

/// Wait a fixed interval before every follow-up call
#[derive(Debug, Clone, Copy)]
pub struct DelayFeedback(pub Duration);

#[async_trait]
impl<R: Sync> Feedback<R> for DelayFeedback {
    async fn on_response(&self, _response: &R, _calls: u32) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Synchronous side effect, such as incrementing a counter
pub struct FnFeedback<F>(pub F);

#[async_trait]
impl<R, F> Feedback<R> for FnFeedback<F>
where
    R: Sync,
    F: Fn(&R, u32) + Send + Sync,
{
    async fn on_response(&self, response: &R, calls: u32) {
        (self.0)(response, calls)
    }
}
