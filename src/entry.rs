use crate::error::{BoxError, CacheError, FactoryError};

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

/// The shareable future representing an entry's (eventual) value.
///
/// Every caller of [`CacheEntry::value`] within one epoch receives a clone
/// of the same future, so the underlying computation runs at most once and
/// its outcome is observed by all of them.
pub type ValueFuture<V> = Shared<BoxFuture<'static, Result<Arc<V>, FactoryError>>>;

type Factory<V> = Arc<dyn Fn() -> BoxFuture<'static, Result<V, BoxError>> + Send + Sync>;

/// A lazily-computed, single-flight, resettable holder for one asynchronous
/// value.
///
/// The entry owns a factory and a memoization cell. The first access per
/// epoch invokes the factory; concurrent and subsequent accesses share that
/// invocation's outcome, success or failure, until [`reset`](Self::reset)
/// starts a new epoch. An entry detached from its cache keeps working: its
/// computation and any already-produced value stay valid.
pub struct CacheEntry<V> {
  factory: Factory<V>,
  cell: Mutex<Option<ValueFuture<V>>>,
}

impl<V: Send + Sync + 'static> CacheEntry<V> {
  /// Creates a new, unresolved entry. The factory is not invoked until the
  /// first call to [`value`](Self::value).
  pub fn new<F, Fut>(factory: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, BoxError>> + Send + 'static,
  {
    let factory: Factory<V> = Arc::new(move || factory().boxed());
    Self {
      factory,
      cell: Mutex::new(None),
    }
  }

  /// Returns the future for this entry's value, invoking the factory if
  /// this is the first access of the current epoch.
  ///
  /// The cell lock is held only to install or clone the shared future,
  /// never across an await point, so two tasks racing on a fresh entry
  /// cannot trigger two factory invocations.
  pub fn value(&self) -> ValueFuture<V> {
    let mut cell = self.cell.lock();
    cell
      .get_or_insert_with(|| {
        let fut = (self.factory)();
        fut
          .map(|result| result.map(Arc::new).map_err(Arc::from))
          .boxed()
          .shared()
      })
      .clone()
  }

  /// Awaits this entry's value directly, bypassing any cache-level
  /// await strategy.
  pub async fn get(&self) -> Result<Arc<V>, CacheError> {
    self.value().await.map_err(CacheError::Computation)
  }

  /// Discards the memoized outcome, pending, resolved or failed, and
  /// rearms the entry so the next access runs the factory again.
  ///
  /// An in-flight computation is not cancelled: callers already holding
  /// the previous epoch's future still observe that epoch's outcome.
  pub fn reset(&self) {
    *self.cell.lock() = None;
  }

  /// Returns `true` if no access has occurred in the current epoch.
  pub fn is_unresolved(&self) -> bool {
    self.cell.lock().is_none()
  }
}

impl<V> std::fmt::Debug for CacheEntry<V> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CacheEntry")
      .field("resolved_or_resolving", &self.cell.lock().is_some())
      .finish_non_exhaustive()
  }
}
