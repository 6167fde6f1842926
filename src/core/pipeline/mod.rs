//! The composed write path: windowing followed by redrive

mod report;
mod writer;


pub use report::{WriteReport, collect_report};
pub use writer::{BatchWriter, write_all};
