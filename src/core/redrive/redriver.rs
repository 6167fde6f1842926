//! Resubmission of unprocessed batch items
//!
//! Each batch runs an explicit round loop: send the in-flight items, emit the
//! items that were applied or can no longer be retried, then send the rest
//! again after the throttle interval. Outcomes are emitted as they resolve,
//! so items applied in an early round never wait for slower siblings.

use super::types::{BatchResult, BatchSender, Outcome};
use crate::config::RedriveConfig;
use crate::core::feedback::Feedback;
use crate::core::window::Batch;
use crate::utils::error::{ExhaustReason, PipelineError, RetryExhaustedError};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stream of per-item outcomes; `Err` means the whole run failed
pub type OutcomeStream<T> = BoxStream<'static, Result<Outcome<T>, PipelineError>>;

/// Drives batches through a [`BatchSender`] until every item is resolved
pub struct Redriver<T, S> {
    sender: Arc<S>,
    config: Arc<RedriveConfig>,
    feedback: Option<Arc<dyn Feedback<BatchResult>>>,
    _marker: std::marker::PhantomData<fn(T)>,
}

impl<T, S> Clone for Redriver<T, S> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            config: Arc::clone(&self.config),
            feedback: self.feedback.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T, S> Redriver<T, S>
where
    T: Debug + Send + Sync + 'static,
    S: BatchSender<T> + 'static,
{
    pub fn new(sender: S, config: RedriveConfig) -> Self {
        Self::from_arc(Arc::new(sender), config)
    }

    /// Share one sender between several redrivers
    pub fn from_arc(sender: Arc<S>, config: RedriveConfig) -> Self {
        Self {
            sender,
            config: Arc::new(config),
            feedback: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Run a hook between a partial failure and the next round
    pub fn with_feedback(mut self, feedback: impl Feedback<BatchResult> + 'static) -> Self {
        self.feedback = Some(Arc::new(feedback));
        self
    }

    pub fn config(&self) -> &RedriveConfig {
        &self.config
    }

    /// Resolve every item of one batch
    ///
    /// A transport failure ends the stream with that error; outcomes already
    /// emitted stand.
    pub fn redrive_batch(&self, batch: Batch<T>) -> OutcomeStream<T> {
        let sender = Arc::clone(&self.sender);
        let config = Arc::clone(&self.config);
        let feedback = self.feedback.clone();

        let outcomes = async_stream::try_stream! {
            let mut in_flight = batch.into_items();
            let mut throttle = config.throttle();
            let mut round: u32 = 0;

            while !in_flight.is_empty() {
                round += 1;

                if round > 1 {
                    pause(throttle, config.jitter).await;
                    throttle = next_throttle(throttle, &config);
                }

                debug!(round, count = in_flight.len(), "Sending batch");
                let result = sender.send_batch(&in_flight).await.map_err(|e| {
                    warn!(round, error = %e, "Batch call rejected");
                    e
                })?;

                let mut unprocessed: HashMap<usize, Option<String>> = HashMap::new();
                for entry in result.unprocessed() {
                    if entry.index < in_flight.len() {
                        unprocessed.insert(entry.index, entry.error_code.clone());
                    } else {
                        warn!(round, index = entry.index, "Ignoring unprocessed index outside the batch");
                    }
                }

                let submitted = std::mem::take(&mut in_flight);
                for (index, item) in submitted.into_iter().enumerate() {
                    match unprocessed.remove(&index) {
                        None => yield Outcome::Delivered { item, attempts: round },
                        Some(error_code) => {
                            if !config.is_retryable(error_code.as_deref()) {
                                debug!(round, ?error_code, "Unprocessed item is not retryable");
                                yield Outcome::Failed(RetryExhaustedError {
                                    item,
                                    error_code,
                                    attempts: round,
                                    reason: ExhaustReason::NotRetryable,
                                });
                            } else if round >= config.max_attempts {
                                warn!(round, ?error_code, "Unprocessed item exhausted its attempts");
                                yield Outcome::Failed(RetryExhaustedError {
                                    item,
                                    error_code,
                                    attempts: round,
                                    reason: ExhaustReason::AttemptsExhausted,
                                });
                            } else {
                                in_flight.push(item);
                            }
                        }
                    }
                }

                if !in_flight.is_empty() {
                    info!(round, remaining = in_flight.len(), "Redriving unprocessed items");
                    if let Some(feedback) = &feedback {
                        feedback.on_response(&result, round).await;
                    }
                }
            }
        };

        outcomes.boxed()
    }

    /// Resolve every item of a batch stream
    ///
    /// With `concurrency` 1 batches are handled one after another and outcomes
    /// keep batch order. The first whole-run error is emitted and ends the
    /// stream, dropping any other batch still in flight.
    pub fn redrive<St>(&self, batches: St) -> OutcomeStream<T>
    where
        St: Stream<Item = Result<Batch<T>, PipelineError>> + Send + 'static,
    {
        let this = self.clone();
        let concurrency = self.config.concurrency.max(1);

        let per_batch = batches.map(move |batch| -> OutcomeStream<T> {
            match batch {
                Ok(batch) => this.redrive_batch(batch),
                Err(e) => stream::once(async move { Err(e) }).boxed(),
            }
        });

        let flattened: OutcomeStream<T> = if concurrency == 1 {
            per_batch.flatten().boxed()
        } else {
            per_batch.flatten_unordered(concurrency).boxed()
        };

        stop_after_error(flattened)
    }
}

/// Emit the first error, then end
fn stop_after_error<T: Debug + Send + 'static>(outcomes: OutcomeStream<T>) -> OutcomeStream<T> {
    outcomes
        .scan(false, |failed, outcome| {
            if *failed {
                return futures::future::ready(None);
            }
            *failed = outcome.is_err();
            futures::future::ready(Some(outcome))
        })
        .boxed()
}

async fn pause(throttle: Duration, jitter: bool) {
    if throttle.is_zero() {
        return;
    }
    let delay = if jitter {
        let factor = 0.9 + rand::random::<f64>() * 0.2;
        Duration::from_millis((throttle.as_millis() as f64 * factor) as u64)
    } else {
        throttle
    };
    tokio::time::sleep(delay).await;
}

fn next_throttle(current: Duration, config: &RedriveConfig) -> Duration {
    if config.backoff_multiplier <= 1.0 {
        return current;
    }
    let grown = Duration::from_millis((current.as_millis() as f64 * config.backoff_multiplier) as u64);
    grown.min(config.max_throttle())
}
