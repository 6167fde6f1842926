//! Limits of common remote batch APIs

use crate::config::WindowConfig;

/// Items per batch-write call
pub const BATCH_WRITE_MAX_ITEMS: usize = 25;
/// Keys per batch-get call
pub const BATCH_GET_MAX_KEYS: usize = 100;
/// Entries per event-put call
pub const EVENT_PUT_MAX_ENTRIES: usize = 10;
/// Total bytes per event-put call
pub const EVENT_PUT_MAX_BYTES: usize = 256_000;

impl WindowConfig {
    pub fn batch_write() -> Self {
        Self::count_only(BATCH_WRITE_MAX_ITEMS)
    }

    pub fn batch_get() -> Self {
        Self::count_only(BATCH_GET_MAX_KEYS)
    }

    pub fn event_put() -> Self {
        Self::new(EVENT_PUT_MAX_ENTRIES, EVENT_PUT_MAX_BYTES)
    }
}
