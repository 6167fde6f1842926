//! Batch windowing
//!
//! Groups an ordered item sequence into batches bounded by a maximum count
//! and a maximum cumulative serialized size.

pub mod limits;
mod sizer;
mod windower;


pub use sizer::{CountOnly, FnSizer, ItemSizer, JsonSizer};
pub use windower::{Batch, Windower, window_all, window_stream};
