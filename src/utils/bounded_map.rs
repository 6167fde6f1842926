//! Bounded least-recently-used map
//!
//! A capacity of 0 means unbounded, in which case entries live in a plain
//! `HashMap` and nothing is ever evicted.

use lru::LruCache;
use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Map with optional LRU eviction on insert
#[derive(Debug)]
pub enum BoundedMap<K: Hash + Eq, V> {
    Unbounded(HashMap<K, V>),
    Lru(LruCache<K, V>),
}

impl<K: Hash + Eq, V> BoundedMap<K, V> {
    pub fn new(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Self::Lru(LruCache::new(capacity)),
            None => Self::Unbounded(HashMap::new()),
        }
    }

    /// Look up an entry, marking it as most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self {
            Self::Unbounded(map) => map.get(key),
            Self::Lru(cache) => cache.get(key),
        }
    }

    /// Look up an entry without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        match self {
            Self::Unbounded(map) => map.get(key),
            Self::Lru(cache) => cache.peek(key),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match self {
            Self::Unbounded(map) => map.contains_key(key),
            Self::Lru(cache) => cache.contains(key),
        }
    }

    /// Insert an entry, returning whatever was evicted to make room
    ///
    /// Replacing an existing key is not an eviction.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        match self {
            Self::Unbounded(map) => {
                map.insert(key, value);
                None
            }
            Self::Lru(cache) => {
                if cache.contains(&key) {
                    cache.put(key, value);
                    None
                } else {
                    cache.push(key, value)
                }
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        match self {
            Self::Unbounded(map) => map.remove(key),
            Self::Lru(cache) => cache.pop(key),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Unbounded(map) => map.clear(),
            Self::Lru(cache) => cache.clear(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Unbounded(map) => map.len(),
            Self::Lru(cache) => cache.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity, or `None` when unbounded
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Self::Unbounded(_) => None,
            Self::Lru(cache) => Some(cache.cap().get()),
        }
    }
}
