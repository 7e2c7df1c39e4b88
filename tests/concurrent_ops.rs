use flight_cache::Cache;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Notify;

const DEFAULT_TTL: Duration = Duration::from_secs(60);

fn build_cache<V: Send + Sync + 'static>() -> Cache<V> {
  Cache::builder().time_to_live(DEFAULT_TTL).build().unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_get_or_insert_is_single_flight() {
  const CALLERS: usize = 16;

  let cache: Cache<u64> = build_cache();
  let runs = Arc::new(AtomicUsize::new(0));

  let mut tasks = Vec::with_capacity(CALLERS);
  for _ in 0..CALLERS {
    let cache = cache.clone();
    let runs = runs.clone();
    tasks.push(tokio::spawn(async move {
      cache
        .get_or_insert_with("hot", move || {
          let runs = runs.clone();
          async move {
            runs.fetch_add(1, Ordering::SeqCst);
            // Stay in flight long enough for every caller to pile up.
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(42)
          }
        })
        .await
        .unwrap()
    }));
  }

  let values = join_all(tasks).await;

  assert_eq!(runs.load(Ordering::SeqCst), 1, "factory must run exactly once");
  for value in values {
    assert_eq!(*value.unwrap(), 42);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_only_one_wins() {
  const CALLERS: usize = 8;

  let cache: Cache<usize> = build_cache();

  let mut tasks = Vec::with_capacity(CALLERS);
  for i in 0..CALLERS {
    let cache = cache.clone();
    tasks.push(tokio::spawn(async move {
      cache.insert("contested", move || async move { Ok(i) }).unwrap()
    }));
  }

  let outcomes = join_all(tasks).await;
  let winners = outcomes.into_iter().filter(|r| *r.as_ref().unwrap()).count();

  assert_eq!(winners, 1);
  assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_pending_key_does_not_block_other_keys() {
  let cache: Cache<&'static str> = build_cache();
  let gate = Arc::new(Notify::new());

  let release = gate.clone();
  cache
    .insert("slow", move || {
      let gate = release.clone();
      async move {
        gate.notified().await;
        Ok("slow value")
      }
    })
    .unwrap();

  let pending = {
    let cache = cache.clone();
    tokio::spawn(async move { cache.get("slow").await.unwrap().unwrap() })
  };

  // While "slow" is stuck in its factory, another key resolves freely.
  let fast = cache
    .get_or_insert_with("fast", || async { Ok("fast value") })
    .await
    .unwrap();
  assert_eq!(*fast, "fast value");

  gate.notify_one();
  assert_eq!(*pending.await.unwrap(), "slow value");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_all_waiters_share_one_outcome() {
  const CALLERS: usize = 8;

  let cache: Cache<u64> = build_cache();
  let gate = Arc::new(Notify::new());

  let release = gate.clone();
  cache
    .insert("shared", move || {
      let gate = release.clone();
      async move {
        gate.notified().await;
        Ok(7)
      }
    })
    .unwrap();

  let mut tasks = Vec::with_capacity(CALLERS);
  for _ in 0..CALLERS {
    let cache = cache.clone();
    tasks.push(tokio::spawn(async move {
      cache.get("shared").await.unwrap().unwrap()
    }));
  }

  // Give every waiter time to subscribe to the in-flight computation.
  tokio::time::sleep(Duration::from_millis(50)).await;
  gate.notify_one();

  let values = join_all(tasks).await;
  let first = values[0].as_ref().unwrap().clone();
  for value in &values {
    assert!(Arc::ptr_eq(value.as_ref().unwrap(), &first));
  }
}
