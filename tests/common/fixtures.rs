//! Test fixtures and data factories

use serde::Serialize;

/// A record as written to an event bus or table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: u32,
    pub detail: String,
}

pub struct EventFactory;

impl EventFactory {
    pub fn create(id: u32) -> Event {
        Event {
            id,
            detail: format!("event-{}", id),
        }
    }

    /// Events with ids `0..count`
    pub fn batch(count: u32) -> Vec<Event> {
        (0..count).map(Self::create).collect()
    }

    /// An event whose `detail` is `bytes` characters long
    pub fn sized(id: u32, bytes: usize) -> Event {
        Event {
            id,
            detail: "x".repeat(bytes),
        }
    }
}
