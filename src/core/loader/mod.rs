//! Coalescing keyed loaders
//!
//! Single-key lookups issued within one window are merged into one batch
//! fetch, with results cached in a bounded LRU.

mod batch_load;
pub mod canonical;
mod keyed_loader;
mod options;
mod pool;
mod scheduler;


pub use batch_load::{BatchLoad, FnBatchLoad, PoolBatchLoad};
pub use canonical::canonical_key;
pub use keyed_loader::{KeyedLoader, LoadFuture};
pub use options::LoaderOptions;
pub use pool::{LoaderPool, PoolScoped};
pub use scheduler::{BatchScheduler, DelayScheduler, ManualScheduler, YieldScheduler};
