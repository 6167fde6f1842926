//! Draining an outcome stream into a summary

use crate::core::redrive::Outcome;
use crate::utils::error::{PipelineError, RetryExhaustedError};
use futures::{Stream, StreamExt};
use std::fmt::Debug;

/// Totals for a finished write, with failed items kept for dead-lettering
#[derive(Debug)]
pub struct WriteReport<T: Debug> {
    pub delivered: usize,
    /// Largest number of calls any single item needed
    pub max_attempts: u32,
    pub failed: Vec<RetryExhaustedError<T>>,
}

impl<T: Debug> Default for WriteReport<T> {
    fn default() -> Self {
        Self {
            delivered: 0,
            max_attempts: 0,
            failed: Vec::new(),
        }
    }
}

impl<T: Debug> WriteReport<T> {
    pub fn record(&mut self, outcome: Outcome<T>) {
        self.max_attempts = self.max_attempts.max(outcome.attempts());
        match outcome {
            Outcome::Delivered { .. } => self.delivered += 1,
            Outcome::Failed(err) => self.failed.push(err),
        }
    }

    pub fn total(&self) -> usize {
        self.delivered + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Consume `outcomes`, stopping at the first whole-run error
pub async fn collect_report<T, St>(outcomes: St) -> Result<WriteReport<T>, PipelineError>
where
    T: Debug,
    St: Stream<Item = Result<Outcome<T>, PipelineError>>,
{
    futures::pin_mut!(outcomes);
    let mut report = WriteReport::default();
    while let Some(outcome) = outcomes.next().await {
        report.record(outcome?);
    }
    Ok(report)
}
