//! Coalescing keyed loader
//!
//! `load` registers the key synchronously, in call order, and returns a
//! future. The first registration after a dispatch opens a pending window
//! and schedules its dispatch; later registrations join that window until
//! the scheduler runs it. Dispatch deduplicates the window by canonical key,
//! splits it into sub-batches of at most `max_batch_size` keys and fans each
//! result out to the callers registered for that window. Only with caching
//! enabled can a later call join a fetch that is already running.

use super::batch_load::BatchLoad;
use super::options::LoaderOptions;
use crate::utils::bounded_map::BoundedMap;
use crate::utils::error::{PipelineError, TransportError};
use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;
use pin_project_lite::pin_project;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Waiter<V> = oneshot::Sender<Result<Option<V>, TransportError>>;

/// Callers waiting on one key of one dispatched window
type WaiterList<V> = Arc<Mutex<Vec<Waiter<V>>>>;

/// A key registered in the open window
struct PendingKey<K, V> {
    key: K,
    waiters: Vec<Waiter<V>>,
}

struct LoaderState<K, V> {
    pending: Vec<(String, PendingKey<K, V>)>,
    pending_index: HashMap<String, usize>,
    scheduled: bool,
    in_flight: HashMap<String, WaiterList<V>>,
    cache: BoundedMap<String, Option<V>>,
}

struct LoaderInner<K, V, B> {
    batch_load: B,
    options: LoaderOptions<K, V>,
    state: Mutex<LoaderState<K, V>>,
}

pin_project! {
    /// Resolves to the value for one key, or `None` if the batch load did
    /// not return it
    pub struct LoadFuture<V> {
        #[pin]
        inner: BoxFuture<'static, Result<Option<V>, PipelineError>>,
    }
}

impl<V: Send + 'static> LoadFuture<V> {
    fn ready(result: Result<Option<V>, PipelineError>) -> Self {
        Self {
            inner: future::ready(result).boxed(),
        }
    }

    fn waiting(rx: oneshot::Receiver<Result<Option<V>, TransportError>>) -> Self {
        Self {
            inner: async move {
                match rx.await {
                    Ok(result) => result.map_err(PipelineError::from),
                    Err(_) => Err(TransportError::unavailable(
                        "batch load was dropped before it completed",
                    )
                    .into()),
                }
            }
            .boxed(),
        }
    }
}

impl<V> Future for LoadFuture<V> {
    type Output = Result<Option<V>, PipelineError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().inner.poll(cx)
    }
}

/// Deduplicating, caching batch loader for single keys
pub struct KeyedLoader<K, V, B> {
    inner: Arc<LoaderInner<K, V, B>>,
}

impl<K, V, B> Clone for KeyedLoader<K, V, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, B> KeyedLoader<K, V, B>
where
    K: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: BatchLoad<K, V> + 'static,
{
    pub fn new(batch_load: B, options: LoaderOptions<K, V>) -> Self {
        let cache = BoundedMap::new(options.max_cached_items);
        Self {
            inner: Arc::new(LoaderInner {
                batch_load,
                options,
                state: Mutex::new(LoaderState {
                    pending: Vec::new(),
                    pending_index: HashMap::new(),
                    scheduled: false,
                    in_flight: HashMap::new(),
                    cache,
                }),
            }),
        }
    }

    /// Register `key` in the current window
    ///
    /// A cached key resolves without a batch call. With caching enabled, a
    /// key already being fetched joins that fetch.
    pub fn load(&self, key: K) -> LoadFuture<V> {
        let cache_key = match (self.inner.options.cache_key_fn)(&key) {
            Ok(cache_key) => cache_key,
            Err(e) => return LoadFuture::ready(Err(e.into())),
        };

        let (tx, rx) = oneshot::channel();
        let open_window = {
            let mut state = self.inner.state.lock();

            if self.inner.options.cache {
                if let Some(value) = state.cache.get(&cache_key) {
                    return LoadFuture::ready(Ok(value.clone()));
                }
                if let Some(waiters) = state.in_flight.get(&cache_key) {
                    waiters.lock().push(tx);
                    return LoadFuture::waiting(rx);
                }
            }

            match state.pending_index.get(&cache_key).copied() {
                Some(index) => state.pending[index].1.waiters.push(tx),
                None => {
                    let index = state.pending.len();
                    state.pending_index.insert(cache_key.clone(), index);
                    state.pending.push((
                        cache_key,
                        PendingKey {
                            key,
                            waiters: vec![tx],
                        },
                    ));
                }
            }

            !std::mem::replace(&mut state.scheduled, true)
        };

        if open_window {
            let inner = Arc::clone(&self.inner);
            self.inner
                .options
                .scheduler
                .schedule(async move { inner.dispatch().await }.boxed());
        }

        LoadFuture::waiting(rx)
    }

    /// Load several keys in one window; results keep the order of `keys`
    pub async fn load_many<I>(&self, keys: I) -> Vec<Result<Option<V>, PipelineError>>
    where
        I: IntoIterator<Item = K>,
    {
        let loads: Vec<_> = keys.into_iter().map(|key| self.load(key)).collect();
        future::join_all(loads).await
    }

    /// Forget the cached value for `key`
    pub fn clear(&self, key: &K) -> bool {
        match (self.inner.options.cache_key_fn)(key) {
            Ok(cache_key) => self.inner.state.lock().cache.remove(&cache_key).is_some(),
            Err(_) => false,
        }
    }

    pub fn clear_all(&self) {
        self.inner.state.lock().cache.clear();
    }

    /// Seed the cache; an existing entry is kept
    pub fn prime(&self, key: &K, value: Option<V>) -> Result<(), PipelineError> {
        if !self.inner.options.cache {
            return Ok(());
        }
        let cache_key = (self.inner.options.cache_key_fn)(key)?;
        let mut state = self.inner.state.lock();
        if !state.cache.contains(&cache_key) {
            state.cache.insert(cache_key, value);
        }
        Ok(())
    }

    pub fn cached_len(&self) -> usize {
        self.inner.state.lock().cache.len()
    }

    /// Whether `key` is resident, without refreshing its recency
    pub fn is_cached(&self, key: &K) -> bool {
        match (self.inner.options.cache_key_fn)(key) {
            Ok(cache_key) => self.inner.state.lock().cache.contains(&cache_key),
            Err(_) => false,
        }
    }

    /// Keys registered in the window that has not been dispatched yet
    pub fn pending_len(&self) -> usize {
        self.inner.state.lock().pending.len()
    }
}

impl<K, V, B> LoaderInner<K, V, B>
where
    K: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    B: BatchLoad<K, V> + 'static,
{
    /// Close the window and run its batch loads
    async fn dispatch(&self) {
        let window: Vec<(String, K, WaiterList<V>)> = {
            let mut state = self.state.lock();
            state.scheduled = false;
            state.pending_index.clear();
            let pending = std::mem::take(&mut state.pending);
            pending
                .into_iter()
                .map(|(cache_key, pending)| {
                    let waiters = Arc::new(Mutex::new(pending.waiters));
                    if self.options.cache {
                        state.in_flight.insert(cache_key.clone(), Arc::clone(&waiters));
                    }
                    (cache_key, pending.key, waiters)
                })
                .collect()
        };

        if window.is_empty() {
            return;
        }

        let chunk_size = match self.options.max_batch_size {
            0 => window.len(),
            n => n,
        };

        let mut batches = Vec::new();
        let mut keys = Vec::with_capacity(chunk_size.min(window.len()));
        let mut slots = Vec::with_capacity(keys.capacity());
        for (cache_key, key, waiters) in window {
            keys.push(key);
            slots.push((cache_key, waiters));
            if keys.len() == chunk_size {
                batches.push((std::mem::take(&mut keys), std::mem::take(&mut slots)));
            }
        }
        if !keys.is_empty() {
            batches.push((keys, slots));
        }

        debug!(batches = batches.len(), "Dispatching loader window");
        future::join_all(
            batches
                .into_iter()
                .map(|(keys, slots)| self.load_chunk(keys, slots)),
        )
        .await;
    }

    async fn load_chunk(&self, keys: Vec<K>, slots: Vec<(String, WaiterList<V>)>) {
        debug!(keys = keys.len(), "Loading batch");
        let result = self.batch_load.load_batch(&keys).await;

        match result {
            Ok(values) => {
                let requested: HashSet<&str> = slots.iter().map(|(k, _)| k.as_str()).collect();
                let mut by_key: HashMap<String, V> = HashMap::with_capacity(values.len());
                for value in values {
                    let derived = (self.options.result_to_key)(&value);
                    match (self.options.cache_key_fn)(&derived) {
                        Ok(cache_key) if requested.contains(cache_key.as_str()) => {
                            by_key.insert(cache_key, value);
                        }
                        Ok(cache_key) => {
                            debug!(key = %cache_key, "Dropping result for a key that was not requested");
                        }
                        Err(e) => warn!(error = %e, "Dropping result whose key cannot be derived"),
                    }
                }

                let mut state = self.state.lock();
                for (cache_key, waiters) in slots {
                    let value = by_key.remove(&cache_key);
                    if self.options.cache {
                        if let Some((evicted, _)) = state.cache.insert(cache_key.clone(), value.clone()) {
                            debug!(key = %evicted, "Evicted cached value");
                        }
                    }
                    release(&mut state, &cache_key, &waiters);
                    for waiter in std::mem::take(&mut *waiters.lock()) {
                        let _ = waiter.send(Ok(value.clone()));
                    }
                }
            }
            Err(e) => {
                warn!(keys = keys.len(), error = %e, "Batch load failed");
                let mut state = self.state.lock();
                for (cache_key, waiters) in slots {
                    release(&mut state, &cache_key, &waiters);
                    for waiter in std::mem::take(&mut *waiters.lock()) {
                        let _ = waiter.send(Err(e.clone()));
                    }
                }
            }
        }
    }
}

/// Stop later calls from joining a finished fetch
fn release<K, V>(state: &mut LoaderState<K, V>, cache_key: &str, waiters: &WaiterList<V>) {
    if state
        .in_flight
        .get(cache_key)
        .is_some_and(|current| Arc::ptr_eq(current, waiters))
    {
        state.in_flight.remove(cache_key);
    }
}
