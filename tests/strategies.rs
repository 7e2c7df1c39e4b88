use flight_cache::{Cache, CacheError, FactoryError, ResetOnError};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TTL: Duration = Duration::from_secs(60);

fn computation_error(err: CacheError) -> FactoryError {
  match err {
    CacheError::Computation(source) => source,
    other => panic!("expected a computation failure, got {other}"),
  }
}

#[tokio::test]
async fn test_plain_strategy_replays_the_same_failure() {
  let cache: Cache<u32> = Cache::builder().time_to_live(DEFAULT_TTL).build().unwrap();
  let runs = Arc::new(AtomicUsize::new(0));

  let counter = runs.clone();
  cache
    .insert("failing", move || {
      let counter = counter.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err("boom".into())
      }
    })
    .unwrap();

  let first = computation_error(cache.get("failing").await.unwrap_err());
  let second = computation_error(cache.get("failing").await.unwrap_err());

  // The identical memoized failure, not merely an equal one.
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.to_string(), "boom");
  assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_plain_strategy_recovers_after_explicit_reset() {
  let cache: Cache<u32> = Cache::builder().time_to_live(DEFAULT_TTL).build().unwrap();
  let runs = Arc::new(AtomicUsize::new(0));

  let counter = runs.clone();
  cache
    .insert("flaky", move || {
      let counter = counter.clone();
      async move {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
          Err("transient".into())
        } else {
          Ok(5)
        }
      }
    })
    .unwrap();

  assert!(cache.get("flaky").await.is_err());

  // Plain never rearms on its own; the caller has to.
  let entry = cache.remove("flaky").unwrap();
  entry.reset();
  assert_eq!(*entry.get().await.unwrap(), 5);
  assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_reset_on_error_rearms_after_each_failure() {
  let cache: Cache<u32> = Cache::builder()
    .time_to_live(DEFAULT_TTL)
    .await_strategy(ResetOnError)
    .build()
    .unwrap();
  let runs = Arc::new(AtomicUsize::new(0));

  let counter = runs.clone();
  cache
    .insert("flaky", move || {
      let counter = counter.clone();
      async move {
        match counter.fetch_add(1, Ordering::SeqCst) {
          0 => Err("e1".into()),
          1 => Err("e2".into()),
          _ => Ok(11),
        }
      }
    })
    .unwrap();

  let first = computation_error(cache.get("flaky").await.unwrap_err());
  assert_eq!(first.to_string(), "e1");

  // The automatic reset makes the next caller run the factory afresh.
  let second = computation_error(cache.get("flaky").await.unwrap_err());
  assert_eq!(second.to_string(), "e2");

  assert_eq!(*cache.get("flaky").await.unwrap().unwrap(), 11);
  assert_eq!(runs.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_reset_on_error_memoizes_success() {
  let cache: Cache<u32> = Cache::builder()
    .time_to_live(DEFAULT_TTL)
    .await_strategy(ResetOnError)
    .build()
    .unwrap();
  let runs = Arc::new(AtomicUsize::new(0));

  let counter = runs.clone();
  cache
    .insert("stable", move || {
      let counter = counter.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(3)
      }
    })
    .unwrap();

  assert_eq!(*cache.get("stable").await.unwrap().unwrap(), 3);
  assert_eq!(*cache.get("stable").await.unwrap().unwrap(), 3);
  assert_eq!(runs.load(Ordering::SeqCst), 1, "success must stay memoized");
}
