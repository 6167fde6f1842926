//! Pagination type definitions

use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::future::Future;

/// One response from a paginated read
///
/// A present cursor means "fetch again", even when `items` is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub continuation_cursor: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, continuation_cursor: Option<C>) -> Self {
        Self {
            items,
            continuation_cursor,
        }
    }

    /// A terminal page
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    pub fn has_more(&self) -> bool {
        self.continuation_cursor.is_some()
    }
}

/// A request that can be repeated from a continuation cursor
pub trait CursorRequest<C>: Send + Sync {
    /// The same request, resumed from `cursor`
    fn with_cursor(&self, cursor: C) -> Self;
}

/// Query parameters plus the cursor field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<P, C> {
    pub params: P,
    pub cursor: Option<C>,
}

impl<P, C> PageRequest<P, C> {
    pub fn new(params: P) -> Self {
        Self {
            params,
            cursor: None,
        }
    }
}

impl<P, C> CursorRequest<C> for PageRequest<P, C>
where
    P: Clone + Send + Sync,
    C: Send + Sync,
{
    fn with_cursor(&self, cursor: C) -> Self {
        Self {
            params: self.params.clone(),
            cursor: Some(cursor),
        }
    }
}

/// The remote page call
#[async_trait]
pub trait PageSource<Req: Sync, T, C>: Send + Sync {
    async fn fetch_page(&self, request: &Req) -> Result<Page<T, C>, TransportError>;
}

/// Adapter for closures that take an owned copy of the request
pub struct FnPageSource<F>(pub F);

#[async_trait]
impl<Req, T, C, F, Fut> PageSource<Req, T, C> for FnPageSource<F>
where
    Req: Clone + Send + Sync,
    F: Fn(Req) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T, C>, TransportError>> + Send,
{
    async fn fetch_page(&self, request: &Req) -> Result<Page<T, C>, TransportError> {
        (self.0)(request.clone()).await
    }
}
