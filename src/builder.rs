use crate::error::BuildError;
use crate::handle::Cache;
use crate::listener::InsertListener;
use crate::runtime::TaskSpawner;
use crate::shared::CacheShared;
use crate::strategy::{AwaitStrategy, Plain};

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

/// A builder for creating [`Cache`] instances.
pub struct CacheBuilder<V: Send + Sync + 'static> {
  time_to_live: Option<Duration>,
  strategy: Arc<dyn AwaitStrategy<V>>,
  listeners: Vec<Arc<dyn InsertListener>>,
  spawner: Option<Arc<dyn TaskSpawner>>,
}

impl<V: Send + Sync + 'static> fmt::Debug for CacheBuilder<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("time_to_live", &self.time_to_live)
      .field("listeners", &self.listeners.len())
      .field("has_spawner", &self.spawner.is_some())
      .finish_non_exhaustive()
  }
}

impl<V: Send + Sync + 'static> Default for CacheBuilder<V> {
  fn default() -> Self {
    Self {
      time_to_live: None,
      strategy: Arc::new(Plain),
      listeners: Vec::new(),
      spawner: None,
    }
  }
}

impl<V: Send + Sync + 'static> CacheBuilder<V> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the default time-to-live applied to insertions that do not carry
  /// their own override. Required.
  pub fn time_to_live(mut self, duration: Duration) -> Self {
    self.time_to_live = Some(duration);
    self
  }

  /// Sets the await strategy that governs failure handling for every read
  /// through this cache.
  ///
  /// By default the cache uses the [`Plain`] strategy.
  pub fn await_strategy<S>(mut self, strategy: S) -> Self
  where
    S: AwaitStrategy<V> + 'static,
  {
    self.strategy = Arc::new(strategy);
    self
  }

  /// Registers an insertion listener. May be called multiple times; more
  /// listeners can be added after construction via
  /// [`Cache::add_insert_listener`].
  pub fn insert_listener<L>(mut self, listener: L) -> Self
  where
    L: InsertListener + 'static,
  {
    self.listeners.push(Arc::new(listener));
    self
  }

  /// Sets a custom task spawner. Without one, `build` falls back to a
  /// [`TokioSpawner`](crate::runtime::TokioSpawner) when the `tokio`
  /// feature is enabled.
  pub fn spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
    self.spawner = Some(spawner);
    self
  }

  /// Builds the cache.
  pub fn build(self) -> Result<Cache<V>, BuildError> {
    let time_to_live = self.time_to_live.ok_or(BuildError::MissingTimeToLive)?;

    let spawner: Arc<dyn TaskSpawner> = match self.spawner {
      Some(spawner) => spawner,
      #[cfg(feature = "tokio")]
      None => Arc::new(crate::runtime::TokioSpawner::new()),
      #[cfg(not(feature = "tokio"))]
      None => return Err(BuildError::SpawnerRequired),
    };

    Ok(Cache {
      shared: Arc::new(CacheShared {
        map: RwLock::new(HashMap::default()),
        time_to_live,
        strategy: self.strategy,
        listeners: RwLock::new(self.listeners),
        spawner,
      }),
    })
  }
}
