//! # redrive
//!
//! Operators that turn a stream of records into correctly sized, correctly
//! paced calls against remote batch APIs.
//!
//! ## Features
//!
//! - **Windowing**: group items into batches bounded by count and serialized bytes
//! - **Redrive**: resubmit only the items a batch call reported as unprocessed,
//!   with a per-item attempt ceiling and an inter-attempt throttle
//! - **Pagination**: follow continuation cursors into one lazy item stream
//! - **Keyed loading**: coalesce point lookups into batch fetches behind a
//!   bounded LRU cache, optionally partitioned into a pool of loaders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use redrive::{BatchResult, BatchWriter, FnSender, JsonSizer, PipelineConfig, TransportError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::from_file("config/redrive.yaml").await?;
//!     redrive::init_logging(&config.logging)?;
//!
//!     let writer = BatchWriter::from_config(
//!         FnSender(|items: Vec<String>| async move {
//!             // Call the remote batch API here
//!             let _ = items;
//!             Ok::<_, TransportError>(BatchResult::all_processed())
//!         }),
//!         &config,
//!         JsonSizer,
//!     );
//!
//!     let mut outcomes = writer.write_iter(vec!["a".to_string(), "b".to_string()]);
//!     while let Some(outcome) = outcomes.next().await {
//!         match outcome?.into_result() {
//!             Ok(item) => println!("delivered {}", item),
//!             Err(failed) => eprintln!("dead letter: {}", failed),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{
    LoaderConfig, LoggingConfig, PipelineConfig, RedriveConfig, Validate, WindowConfig,
};
pub use utils::error::{
    ExhaustReason, PipelineError, Result, RetryExhaustedError, SizeExceededError,
    TransportError, TransportErrorKind,
};
pub use utils::logging::init_logging;

pub use core::feedback::{DelayFeedback, Feedback, FnFeedback, NoFeedback};
pub use core::loader::{
    BatchLoad, BatchScheduler, DelayScheduler, FnBatchLoad, KeyedLoader, LoadFuture,
    LoaderOptions, LoaderPool, ManualScheduler, PoolBatchLoad, YieldScheduler,
};
pub use core::paginate::{CursorRequest, FnPageSource, Page, PageRequest, PageSource, Paginator};
pub use core::pipeline::{BatchWriter, WriteReport, collect_report, write_all};
pub use core::redrive::{
    BatchResult, BatchSender, EntryResult, FnSender, Outcome, OutcomeStream, Redriver,
    Unprocessed,
};
pub use core::window::{
    Batch, CountOnly, FnSizer, ItemSizer, JsonSizer, Windower, window_all, window_stream,
};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
