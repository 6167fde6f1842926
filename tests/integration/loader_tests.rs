//! Keyed loading against a mocked batch fetch

use crate::common::{Event, EventFactory, MockEventLoad};
use redrive::{
    FnBatchLoad, KeyedLoader, LoaderConfig, LoaderOptions, LoaderPool, ManualScheduler,
    PipelineError, TransportError,
};
use std::sync::Arc;

fn options() -> LoaderOptions<u32, Event> {
    LoaderOptions::new(|event: &Event| event.id)
}

#[tokio::test]
async fn test_duplicate_keys_share_one_fetch() {
    let mut load = MockEventLoad::new();
    load.expect_load_batch()
        .withf(|keys| keys == [1, 2, 3])
        .times(1)
        .returning(|keys| Ok(keys.iter().map(|id| EventFactory::create(*id)).collect()));

    let loader = KeyedLoader::new(load, options());
    let results = loader.load_many(vec![1, 2, 2, 3]).await;

    let ids: Vec<u32> = results
        .into_iter()
        .map(|r| r.unwrap().expect("event should exist").id)
        .collect();
    assert_eq!(ids, vec![1, 2, 2, 3]);

    // Served from cache; a second fetch would fail the `times(1)` expectation
    assert_eq!(loader.load(1).await.unwrap(), Some(EventFactory::create(1)));
}

#[tokio::test]
async fn test_config_limits_cache_and_batch_size() {
    let mut load = MockEventLoad::new();
    load.expect_load_batch()
        .withf(|keys| keys.len() <= 2)
        .times(2)
        .returning(|keys| Ok(keys.iter().map(|id| EventFactory::create(*id)).collect()));

    let config = LoaderConfig {
        max_batch_size: 2,
        max_cached_items: 2,
        ..LoaderConfig::default()
    };
    let loader = KeyedLoader::new(load, options().with_config(&config));

    let results = loader.load_many(vec![10, 11, 12]).await;

    assert!(results.iter().all(|r| matches!(r, Ok(Some(_)))));
    assert_eq!(loader.cached_len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let mut load = MockEventLoad::new();
    let mut calls = 0;
    load.expect_load_batch().times(2).returning(move |keys| {
        calls += 1;
        if calls == 1 {
            Err(TransportError::timeout("read timed out"))
        } else {
            Ok(keys.iter().map(|id| EventFactory::create(*id)).collect())
        }
    });

    let loader = KeyedLoader::new(load, options());

    assert!(matches!(loader.load(5).await, Err(PipelineError::Transport(_))));
    assert_eq!(loader.cached_len(), 0);
    assert!(loader.load(5).await.unwrap().is_some());
}

#[tokio::test]
async fn test_pool_scopes_fetches_by_tenant() {
    let scheduler = Arc::new(ManualScheduler::new());
    let pool = LoaderPool::new(
        FnBatchLoad(|tenant: String, keys: Vec<u32>| async move {
            Ok::<_, TransportError>(
                keys.into_iter()
                    .map(|id| Event {
                        id,
                        detail: tenant.clone(),
                    })
                    .collect::<Vec<_>>(),
            )
        }),
        options().scheduler(scheduler.clone()),
        2,
    );

    let a = pool.load(&"acme".to_string(), 1);
    let b = pool.load(&"globex".to_string(), 1);
    assert_eq!(scheduler.pending(), 2);
    scheduler.run_pending().await;

    assert_eq!(a.await.unwrap().unwrap().detail, "acme");
    assert_eq!(b.await.unwrap().unwrap().detail, "globex");

    pool.get(&"initech".to_string());
    assert_eq!(pool.len(), 2);
    assert!(!pool.contains(&"acme".to_string()));
}
