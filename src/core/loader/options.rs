//! Keyed loader options

use super::canonical::canonical_key;
use super::scheduler::{BatchScheduler, YieldScheduler};
use crate::config::LoaderConfig;
use serde::Serialize;
use std::sync::Arc;

pub(crate) type ResultToKey<K, V> = Arc<dyn Fn(&V) -> K + Send + Sync>;
pub(crate) type CacheKeyFn<K> = Arc<dyn Fn(&K) -> Result<String, serde_json::Error> + Send + Sync>;

/// How a loader derives keys, batches and caches
pub struct LoaderOptions<K, V> {
    pub(crate) result_to_key: ResultToKey<K, V>,
    pub(crate) cache_key_fn: CacheKeyFn<K>,
    pub(crate) max_batch_size: usize,
    pub(crate) max_cached_items: usize,
    pub(crate) cache: bool,
    pub(crate) scheduler: Arc<dyn BatchScheduler>,
}

impl<K, V> Clone for LoaderOptions<K, V> {
    fn clone(&self) -> Self {
        Self {
            result_to_key: Arc::clone(&self.result_to_key),
            cache_key_fn: Arc::clone(&self.cache_key_fn),
            max_batch_size: self.max_batch_size,
            max_cached_items: self.max_cached_items,
            cache: self.cache,
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl<K: Serialize + 'static, V> LoaderOptions<K, V> {
    /// Options keyed by the canonical JSON form of `K`
    pub fn new(result_to_key: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        Self::with_cache_key_fn(result_to_key, |key: &K| canonical_key(key))
    }
}

impl<K, V> LoaderOptions<K, V> {
    /// Options with a caller-supplied key stringification
    ///
    /// `cache_key_fn` must be injective: distinct keys must never map to the
    /// same string.
    pub fn with_cache_key_fn(
        result_to_key: impl Fn(&V) -> K + Send + Sync + 'static,
        cache_key_fn: impl Fn(&K) -> Result<String, serde_json::Error> + Send + Sync + 'static,
    ) -> Self {
        Self {
            result_to_key: Arc::new(result_to_key),
            cache_key_fn: Arc::new(cache_key_fn),
            max_batch_size: 0,
            max_cached_items: 0,
            cache: true,
            scheduler: Arc::new(YieldScheduler),
        }
    }

    /// Replace the key stringification with an infallible one
    pub fn cache_key_fn(mut self, f: impl Fn(&K) -> String + Send + Sync + 'static) -> Self {
        self.cache_key_fn = Arc::new(move |key: &K| Ok(f(key)));
        self
    }

    /// Apply the serializable settings
    pub fn with_config(mut self, config: &LoaderConfig) -> Self {
        self.max_batch_size = config.max_batch_size;
        self.max_cached_items = config.max_cached_items;
        self.cache = config.cache;
        self
    }

    pub fn max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn max_cached_items(mut self, max_cached_items: usize) -> Self {
        self.max_cached_items = max_cached_items;
        self
    }

    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn scheduler(mut self, scheduler: Arc<dyn BatchScheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }
}
