//! Cursor-following page fetcher
//!
//! The initial request is sent once the stream is first polled. Each page is
//! emitted before the next request is issued, so a consumer that stops
//! reading stops the fetching too.

use super::types::{CursorRequest, Page, PageSource};
use crate::core::feedback::Feedback;
use crate::utils::error::PipelineError;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

/// Shared count of page requests issued
#[derive(Debug, Clone, Default)]
pub struct FetchCounter(Arc<AtomicU32>);

impl FetchCounter {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    fn increment(&self) -> u32 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Lazily walks every page of one query
///
/// Consumed by [`Paginator::pages`] or [`Paginator::items`]; start over with
/// a new instance.
pub struct Paginator<Req, T, C, S> {
    source: Arc<S>,
    request: Req,
    feedback: Option<Arc<dyn Feedback<Page<T, C>>>>,
    fetches: FetchCounter,
    _marker: PhantomData<fn() -> T>,
}

impl<Req, T, C, S> Paginator<Req, T, C, S>
where
    Req: CursorRequest<C> + 'static,
    T: Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
    S: PageSource<Req, T, C> + 'static,
{
    pub fn new(source: S, request: Req) -> Self {
        Self::from_arc(Arc::new(source), request)
    }

    pub fn from_arc(source: Arc<S>, request: Req) -> Self {
        Self {
            source,
            request,
            feedback: None,
            fetches: FetchCounter::default(),
            _marker: PhantomData,
        }
    }

    /// Run a hook with each page that carries a continuation cursor
    ///
    /// The hook runs before the page is emitted and before its cursor is
    /// followed, so it can pace requests on what the page holds.
    pub fn with_feedback(mut self, feedback: impl Feedback<Page<T, C>> + 'static) -> Self {
        self.feedback = Some(Arc::new(feedback));
        self
    }

    pub fn fetch_counter(&self) -> FetchCounter {
        self.fetches.clone()
    }

    /// Raw pages, in fetch order
    pub fn pages(self) -> BoxStream<'static, Result<Page<T, C>, PipelineError>> {
        let Self {
            source,
            request,
            feedback,
            fetches,
            ..
        } = self;

        let pages = async_stream::try_stream! {
            let mut request = request;
            loop {
                let calls = fetches.increment();
                debug!(fetch = calls, "Fetching page");
                let page = source.fetch_page(&request).await.map_err(|e| {
                    warn!(fetch = calls, error = %e, "Page request rejected");
                    e
                })?;

                let next = page.continuation_cursor.clone();
                debug!(fetch = calls, items = page.items.len(), more = next.is_some(), "Received page");
                if next.is_some() {
                    if let Some(feedback) = &feedback {
                        feedback.on_response(&page, calls).await;
                    }
                }
                yield page;

                match next {
                    Some(cursor) => request = request.with_cursor(cursor),
                    None => break,
                }
            }
        };

        pages.boxed()
    }

    /// Items of every page, flattened in order
    pub fn items(self) -> BoxStream<'static, Result<T, PipelineError>> {
        self.pages()
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<T, PipelineError>)))
            .try_flatten()
            .boxed()
    }
}
