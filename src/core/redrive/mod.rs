//! Batch redrive
//!
//! Sends a batch, then resubmits only the items the remote side reported as
//! unprocessed, until every item is applied, fails with a non-retryable code,
//! or reaches the attempt ceiling.

mod redriver;
mod types;


pub use redriver::{OutcomeStream, Redriver};
pub use types::{BatchResult, BatchSender, EntryResult, FnSender, Outcome, Unprocessed};
