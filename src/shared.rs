use crate::entry::CacheEntry;
use crate::listener::InsertListener;
use crate::runtime::TaskSpawner;
use crate::strategy::AwaitStrategy;

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;

/// The state shared by all clones of a [`Cache`](crate::Cache) handle.
///
/// The key→entry map is the only mutable shared structure; each entry's
/// memoization cell carries its own lock, so contention on one key never
/// blocks operations on another.
pub(crate) struct CacheShared<V: Send + Sync + 'static> {
  pub(crate) map: RwLock<HashMap<String, Arc<CacheEntry<V>>, ahash::RandomState>>,
  pub(crate) time_to_live: Duration,
  pub(crate) strategy: Arc<dyn AwaitStrategy<V>>,
  pub(crate) listeners: RwLock<Vec<Arc<dyn InsertListener>>>,
  pub(crate) spawner: Arc<dyn TaskSpawner>,
}

impl<V: Send + Sync + 'static> CacheShared<V> {
  /// Handles one insertion event: dispatches every registered listener on
  /// its own task and arms the deferred removal for `key`.
  ///
  /// One timer is armed per event, never deduplicated, so repeated
  /// `get_or_insert_with` calls on a present key accumulate timers; the
  /// earliest wins and later firings are no-ops.
  pub(crate) fn notify_insert(self: &Arc<Self>, key: &str, time_to_live: Duration) {
    let listeners: Vec<Arc<dyn InsertListener>> = self.listeners.read().clone();
    for listener in listeners {
      let key = key.to_owned();
      self.spawner.spawn(Box::pin(async move {
        listener.on_insert(&key, time_to_live);
      }));
    }

    self.schedule_expiry(key.to_owned(), time_to_live);
  }

  /// Arms one deferred removal of `key` after `time_to_live`.
  ///
  /// The timer holds only a weak reference, so outstanding timers never
  /// keep a dropped cache alive, and firing after the key is already gone
  /// is a no-op.
  fn schedule_expiry(self: &Arc<Self>, key: String, time_to_live: Duration) {
    let weak: Weak<Self> = Arc::downgrade(self);
    let sleep = self.spawner.sleep(time_to_live);
    self.spawner.spawn(Box::pin(async move {
      sleep.await;
      if let Some(shared) = weak.upgrade() {
        shared.map.write().remove(&key);
      }
    }));
  }
}
