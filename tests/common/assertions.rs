//! Custom test assertions

use redrive::{Outcome, PipelineError};
use std::fmt::Debug;

/// Assertions over a collected outcome stream
pub trait OutcomeAssertions<T> {
    /// Assert every item was delivered and return the items in emission order
    fn assert_all_delivered(self) -> Vec<T>;
}

impl<T: Debug> OutcomeAssertions<T> for Vec<Result<Outcome<T>, PipelineError>> {
    fn assert_all_delivered(self) -> Vec<T> {
        self.into_iter()
            .enumerate()
            .map(|(position, outcome)| match outcome {
                Ok(Outcome::Delivered { item, .. }) => item,
                other => panic!("expected outcome {} to be delivered, got {:?}", position, other),
            })
            .collect()
    }
}
