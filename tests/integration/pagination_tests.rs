//! Paginated reads over an in-memory table

use crate::common::mocks::Query;
use crate::common::{Event, EventFactory, PagedTable};
use futures::{StreamExt, TryStreamExt};
use redrive::{DelayFeedback, PageRequest, Paginator};
use std::sync::Arc;
use std::time::Duration;

fn query(every: u32, limit: usize) -> PageRequest<Query, usize> {
    PageRequest::new(Query { every, limit })
}

#[tokio::test]
async fn test_reads_every_row() {
    let table = Arc::new(PagedTable::new(EventFactory::batch(23)));
    let paginator = Paginator::from_arc(table.clone(), query(1, 10));
    let fetches = paginator.fetch_counter();

    let events: Vec<Event> = paginator.items().try_collect().await.unwrap();

    assert_eq!(events, EventFactory::batch(23));
    assert_eq!(fetches.get(), 3);
    let cursors: Vec<Option<usize>> = table.requests.lock().iter().map(|r| r.cursor).collect();
    assert_eq!(cursors, vec![None, Some(10), Some(20)]);
}

#[tokio::test]
async fn test_filtered_pages_may_be_empty() {
    let table = Arc::new(PagedTable::new(EventFactory::batch(30)));
    let paginator = Paginator::from_arc(table.clone(), query(25, 5));

    let pages: Vec<_> = paginator.pages().try_collect().await.unwrap();
    let ids: Vec<u32> = pages.iter().flat_map(|p| p.items.iter().map(|e| e.id)).collect();

    assert_eq!(pages.len(), 6);
    assert!(pages[1].items.is_empty());
    assert!(pages[1].has_more());
    assert_eq!(ids, vec![0, 25]);
}

#[tokio::test]
async fn test_inter_page_delay() {
    let table = Arc::new(PagedTable::new(EventFactory::batch(6)));
    let paginator = Paginator::from_arc(table.clone(), query(1, 2))
        .with_feedback(DelayFeedback(Duration::from_millis(5)));

    let started = std::time::Instant::now();
    let count = paginator.items().count().await;

    assert_eq!(count, 6);
    assert_eq!(table.request_count(), 3);
    assert!(started.elapsed() >= Duration::from_millis(10));
}

#[tokio::test]
async fn test_partial_read_fetches_only_needed_pages() {
    let table = Arc::new(PagedTable::new(EventFactory::batch(100)));
    let paginator = Paginator::from_arc(table.clone(), query(1, 10));

    let first: Vec<_> = paginator.items().take(15).collect().await;

    assert_eq!(first.len(), 15);
    assert_eq!(table.request_count(), 2);
}
