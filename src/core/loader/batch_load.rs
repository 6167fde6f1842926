//! The batch fetch seam

use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Fetch values for many keys in one call
///
/// Results may come back in any order and may omit keys; they are matched to
/// the requested keys through the loader's `result_to_key` function.
#[async_trait]
pub trait BatchLoad<K: Sync, V>: Send + Sync {
    async fn load_batch(&self, keys: &[K]) -> Result<Vec<V>, TransportError>;
}

#[async_trait]
impl<K, V, B> BatchLoad<K, V> for Arc<B>
where
    K: Sync,
    B: BatchLoad<K, V> + ?Sized,
{
    async fn load_batch(&self, keys: &[K]) -> Result<Vec<V>, TransportError> {
        (**self).load_batch(keys).await
    }
}

/// Adapter for closures that take an owned copy of the keys
pub struct FnBatchLoad<F>(pub F);

#[async_trait]
impl<K, V, F, Fut> BatchLoad<K, V> for FnBatchLoad<F>
where
    K: Clone + Send + Sync,
    F: Fn(Vec<K>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<V>, TransportError>> + Send,
{
    async fn load_batch(&self, keys: &[K]) -> Result<Vec<V>, TransportError> {
        (self.0)(keys.to_vec()).await
    }
}

/// Batch fetch scoped by a pool identifier
#[async_trait]
pub trait PoolBatchLoad<P: Sync, K: Sync, V>: Send + Sync {
    async fn load_batch(&self, pool: &P, keys: &[K]) -> Result<Vec<V>, TransportError>;
}

#[async_trait]
impl<P, K, V, F, Fut> PoolBatchLoad<P, K, V> for FnBatchLoad<F>
where
    P: Clone + Send + Sync,
    K: Clone + Send + Sync,
    F: Fn(P, Vec<K>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<V>, TransportError>> + Send,
{
    async fn load_batch(&self, pool: &P, keys: &[K]) -> Result<Vec<V>, TransportError> {
        (self.0)(pool.clone(), keys.to_vec()).await
    }
}
