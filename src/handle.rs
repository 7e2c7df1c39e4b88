use crate::builder::CacheBuilder;
use crate::entry::CacheEntry;
use crate::error::{BoxError, CacheError};
use crate::listener::InsertListener;
use crate::shared::CacheShared;

use std::collections::hash_map::Entry;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// A concurrent key→entry store with single-flight value resolution and
/// per-insertion time-to-live expiry.
///
/// All operations are safe to call concurrently without external locking.
/// Key lookup and insertion are non-suspending, constant-time map
/// operations; suspension happens only while awaiting a factory's
/// computation through the cache's [`AwaitStrategy`](crate::AwaitStrategy).
///
/// Cloning the handle is cheap and yields a view onto the same store.
pub struct Cache<V: Send + Sync + 'static> {
  pub(crate) shared: Arc<CacheShared<V>>,
}

impl<V: Send + Sync + 'static> Clone for Cache<V> {
  fn clone(&self) -> Self {
    Self {
      shared: self.shared.clone(),
    }
  }
}

impl<V: Send + Sync + 'static> std::fmt::Debug for Cache<V> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Cache")
      .field("entries", &self.shared.map.read().len())
      .field("time_to_live", &self.shared.time_to_live)
      .finish_non_exhaustive()
  }
}

impl<V: Send + Sync + 'static> Cache<V> {
  pub fn builder() -> CacheBuilder<V> {
    CacheBuilder::new()
  }

  /// Retrieves a value from the cache.
  ///
  /// Fails with [`CacheError::InvalidKey`] before any asynchronous work if
  /// the key is empty or whitespace-only. An absent key yields `Ok(None)`
  /// immediately without creating an entry. A present key is awaited via
  /// the bound strategy; a factory failure surfaces as
  /// [`CacheError::Computation`].
  pub async fn get(&self, key: &str) -> Result<Option<Arc<V>>, CacheError> {
    validate_key(key)?;

    let entry = self.shared.map.read().get(key).cloned();
    match entry {
      Some(entry) => {
        let value = self
          .shared
          .strategy
          .await_entry(&entry)
          .await
          .map_err(CacheError::Computation)?;
        Ok(Some(value))
      }
      None => Ok(None),
    }
  }

  /// Inserts a new entry under `key` with the cache's default
  /// time-to-live. See [`insert_with_ttl`](Self::insert_with_ttl).
  pub fn insert<F, Fut>(&self, key: &str, factory: F) -> Result<bool, CacheError>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
  {
    self.insert_with_ttl(key, factory, self.shared.time_to_live)
  }

  /// Inserts a new entry under `key` only if the key is currently absent.
  ///
  /// An existing entry is left untouched, its memoized outcome included,
  /// and the call returns `Ok(false)`. On actual insertion the insertion
  /// notification fires with `(key, time_to_live)` and one expiration
  /// timer is armed. The factory is not invoked here; it runs on first
  /// access.
  pub fn insert_with_ttl<F, Fut>(
    &self,
    key: &str,
    factory: F,
    time_to_live: Duration,
  ) -> Result<bool, CacheError>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
  {
    validate_key(key)?;

    let inserted = {
      let mut map = self.shared.map.write();
      match map.entry(key.to_owned()) {
        Entry::Occupied(_) => false,
        Entry::Vacant(slot) => {
          slot.insert(Arc::new(CacheEntry::new(factory)));
          true
        }
      }
    };

    if inserted {
      self.shared.notify_insert(key, time_to_live);
    }
    Ok(inserted)
  }

  /// Gets the entry under `key`, inserting one built from `factory` if the
  /// key is absent, then awaits its value with the cache's default
  /// time-to-live. See
  /// [`get_or_insert_with_ttl`](Self::get_or_insert_with_ttl).
  pub async fn get_or_insert_with<F, Fut>(&self, key: &str, factory: F) -> Result<Arc<V>, CacheError>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
  {
    self
      .get_or_insert_with_ttl(key, factory, self.shared.time_to_live)
      .await
  }

  /// Gets the entry under `key`, atomically inserting one built from
  /// `factory` if the key is absent, then awaits its value via the bound
  /// strategy.
  ///
  /// When the key is already present the supplied factory is not used. The
  /// insertion notification fires on both branches, so a repeated call on
  /// a present key arms a fresh expiration timer for it.
  pub async fn get_or_insert_with_ttl<F, Fut>(
    &self,
    key: &str,
    factory: F,
    time_to_live: Duration,
  ) -> Result<Arc<V>, CacheError>
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
  {
    validate_key(key)?;

    let entry = {
      let mut map = self.shared.map.write();
      map
        .entry(key.to_owned())
        .or_insert_with(|| Arc::new(CacheEntry::new(factory)))
        .clone()
    };

    self.shared.notify_insert(key, time_to_live);

    self
      .shared
      .strategy
      .await_entry(&entry)
      .await
      .map_err(CacheError::Computation)
  }

  /// Detaches the entry for `key` from the cache and hands it out.
  ///
  /// Returns `None` when the key is absent; removal is idempotent. The
  /// detached entry keeps working on its own: an in-flight or completed
  /// computation inside it is neither cancelled nor invalidated.
  pub fn remove(&self, key: &str) -> Option<Arc<CacheEntry<V>>> {
    self.shared.map.write().remove(key)
  }

  /// Registers an additional insertion listener at runtime.
  pub fn add_insert_listener<L>(&self, listener: L)
  where
    L: InsertListener + 'static,
  {
    self.shared.listeners.write().push(Arc::new(listener));
  }

  /// Returns `true` if an entry for `key` is currently present, without
  /// touching its memoization state.
  pub fn contains_key(&self, key: &str) -> bool {
    self.shared.map.read().contains_key(key)
  }

  /// Returns the number of entries currently in the cache.
  pub fn len(&self) -> usize {
    self.shared.map.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.shared.map.read().is_empty()
  }

  /// The default time-to-live configured at build time.
  pub fn time_to_live(&self) -> Duration {
    self.shared.time_to_live
  }
}

fn validate_key(key: &str) -> Result<(), CacheError> {
  if key.trim().is_empty() {
    return Err(CacheError::InvalidKey(key.to_owned()));
  }
  Ok(())
}
