//! Common test utilities for redrive
//!
//! - Event fixtures and factories
//! - Mocked and scripted transports
//! - Custom assertions

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use fixtures::{Event, EventFactory};
pub use mocks::{MockEventLoad, MockEventSender, PagedTable};
