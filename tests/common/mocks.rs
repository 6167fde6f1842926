//! Mocked and scripted transports

use super::fixtures::Event;
use async_trait::async_trait;
use mockall::mock;
use parking_lot::Mutex;
use redrive::{BatchLoad, BatchResult, BatchSender, Page, PageRequest, PageSource, TransportError};

mock! {
    pub EventSender {}

    #[async_trait]
    impl BatchSender<Event> for EventSender {
        async fn send_batch(&self, items: &[Event]) -> Result<BatchResult, TransportError>;
    }
}

mock! {
    pub EventLoad {}

    #[async_trait]
    impl BatchLoad<u32, Event> for EventLoad {
        async fn load_batch(&self, keys: &[u32]) -> Result<Vec<Event>, TransportError>;
    }
}

/// Query parameters for [`PagedTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Only events whose id is divisible by this
    pub every: u32,
    pub limit: usize,
}

/// In-memory table served in pages; the cursor is the next row offset
pub struct PagedTable {
    rows: Vec<Event>,
    pub requests: Mutex<Vec<PageRequest<Query, usize>>>,
}

impl PagedTable {
    pub fn new(rows: Vec<Event>) -> Self {
        Self {
            rows,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl PageSource<PageRequest<Query, usize>, Event, usize> for PagedTable {
    async fn fetch_page(
        &self,
        request: &PageRequest<Query, usize>,
    ) -> Result<Page<Event, usize>, TransportError> {
        self.requests.lock().push(request.clone());

        let start = request.cursor.unwrap_or(0);
        let end = (start + request.params.limit).min(self.rows.len());
        let items = self.rows[start..end]
            .iter()
            .filter(|e| e.id % request.params.every == 0)
            .cloned()
            .collect();
        let cursor = (end < self.rows.len()).then_some(end);

        Ok(Page::new(items, cursor))
    }
}
