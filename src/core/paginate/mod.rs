//! Paginated reads
//!
//! Follows continuation cursors until a page arrives without one.

mod paginator;
mod types;


pub use paginator::{FetchCounter, Paginator};
pub use types::{CursorRequest, FnPageSource, Page, PageRequest, PageSource};
