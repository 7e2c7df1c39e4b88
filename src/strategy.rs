use crate::entry::CacheEntry;
use crate::error::FactoryError;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// A policy governing how a caller's wait on a [`CacheEntry`] behaves when
/// the underlying computation fails.
///
/// A cache is bound to exactly one strategy for its lifetime, chosen at
/// build time. The default is [`Plain`].
pub trait AwaitStrategy<V: Send + Sync + 'static>: Send + Sync {
  /// Awaits the entry's value and decides what to do with a failure.
  fn await_entry<'a>(&'a self, entry: &'a CacheEntry<V>) -> BoxFuture<'a, Result<Arc<V>, FactoryError>>;
}

/// Awaits the entry's value as-is and propagates the outcome verbatim.
///
/// A failure stays memoized: every subsequent caller replays the identical
/// error until an explicit [`CacheEntry::reset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl<V: Send + Sync + 'static> AwaitStrategy<V> for Plain {
  fn await_entry<'a>(&'a self, entry: &'a CacheEntry<V>) -> BoxFuture<'a, Result<Arc<V>, FactoryError>> {
    entry.value().boxed()
  }
}

/// Awaits the entry's value and, on failure, resets the entry before
/// returning the error.
///
/// Each failed access automatically rearms the entry, so the next caller
/// triggers a fresh factory invocation instead of replaying the failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetOnError;

impl<V: Send + Sync + 'static> AwaitStrategy<V> for ResetOnError {
  fn await_entry<'a>(&'a self, entry: &'a CacheEntry<V>) -> BoxFuture<'a, Result<Arc<V>, FactoryError>> {
    async move {
      match entry.value().await {
        Ok(value) => Ok(value),
        Err(err) => {
          entry.reset();
          Err(err)
        }
      }
    }
    .boxed()
  }
}
