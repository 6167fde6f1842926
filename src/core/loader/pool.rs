//! Loaders partitioned by a pool identifier
//!
//! Each pool key gets its own [`KeyedLoader`] with its own cache and pending
//! window. Live loaders are held in a bounded map; inserting past `max_pools`
//! evicts the least recently used loader. Futures already returned by an
//! evicted loader still resolve, and a loader recreated for the same pool key
//! starts with an empty cache and never joins the evicted loader's fetches.

use super::batch_load::{BatchLoad, PoolBatchLoad};
use super::keyed_loader::{KeyedLoader, LoadFuture};
use super::options::LoaderOptions;
use crate::config::LoaderConfig;
use crate::utils::bounded_map::BoundedMap;
use crate::utils::error::TransportError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Binds a [`PoolBatchLoad`] to one pool key
pub struct PoolScoped<P, K, B> {
    pool: P,
    batch_load: Arc<B>,
    _marker: PhantomData<fn(K)>,
}

#[async_trait]
impl<P, K, V, B> BatchLoad<K, V> for PoolScoped<P, K, B>
where
    P: Send + Sync,
    K: Send + Sync,
    B: PoolBatchLoad<P, K, V>,
{
    async fn load_batch(&self, keys: &[K]) -> Result<Vec<V>, TransportError> {
        self.batch_load.load_batch(&self.pool, keys).await
    }
}

/// Lazily created loaders, one per pool key
pub struct LoaderPool<P: Hash + Eq, K, V, B> {
    batch_load: Arc<B>,
    options: LoaderOptions<K, V>,
    loaders: Mutex<BoundedMap<P, KeyedLoader<K, V, PoolScoped<P, K, B>>>>,
}

impl<P, K, V, B> LoaderPool<P, K, V, B>
where
    P: Hash + Eq + Clone + Debug + Send + Sync + 'static,
    K: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: PoolBatchLoad<P, K, V> + 'static,
{
    /// `max_pools` of 0 keeps every loader alive
    pub fn new(batch_load: B, options: LoaderOptions<K, V>, max_pools: usize) -> Self {
        Self {
            batch_load: Arc::new(batch_load),
            options,
            loaders: Mutex::new(BoundedMap::new(max_pools)),
        }
    }

    /// Apply a [`LoaderConfig`] to every pool loader and bound the pool count
    pub fn from_config(batch_load: B, options: LoaderOptions<K, V>, config: &LoaderConfig) -> Self {
        Self::new(batch_load, options.with_config(config), config.max_pools)
    }

    /// The loader for `pool`, created on first access
    pub fn get(&self, pool: &P) -> KeyedLoader<K, V, PoolScoped<P, K, B>> {
        let mut loaders = self.loaders.lock();
        if let Some(loader) = loaders.get(pool) {
            return loader.clone();
        }

        debug!(pool = ?pool, "Creating pool loader");
        let loader = KeyedLoader::new(
            PoolScoped {
                pool: pool.clone(),
                batch_load: Arc::clone(&self.batch_load),
                _marker: PhantomData,
            },
            self.options.clone(),
        );
        if let Some((evicted, _)) = loaders.insert(pool.clone(), loader.clone()) {
            debug!(pool = ?evicted, "Evicted pool loader");
        }
        loader
    }

    pub fn load(&self, pool: &P, key: K) -> LoadFuture<V> {
        self.get(pool).load(key)
    }

    /// Drop the loader for `pool` and its cache
    pub fn evict(&self, pool: &P) -> bool {
        let removed = self.loaders.lock().remove(pool).is_some();
        if removed {
            debug!(pool = ?pool, "Evicted pool loader");
        }
        removed
    }

    pub fn contains(&self, pool: &P) -> bool {
        self.loaders.lock().contains(pool)
    }

    /// Number of live loaders
    pub fn len(&self) -> usize {
        self.loaders.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.lock().is_empty()
    }

    pub fn clear(&self) {
        self.loaders.lock().clear();
    }
}
