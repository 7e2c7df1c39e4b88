use std::fmt;
use std::sync::Arc;

/// The error type a value factory may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A factory failure as memoized by a [`CacheEntry`](crate::CacheEntry).
///
/// Failures are held behind an `Arc` so that a single outcome can be
/// replayed to every caller awaiting the same computation.
pub type FactoryError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when building a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
  /// No default time-to-live was configured. Every cache needs one so that
  /// inserted entries can be scheduled for expiration.
  MissingTimeToLive,
  /// No `TaskSpawner` was configured and the default `tokio` feature is
  /// not enabled, so expiration timers and listener callbacks cannot run.
  SpawnerRequired,
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BuildError::MissingTimeToLive => write!(f, "a default time-to-live must be configured"),
      BuildError::SpawnerRequired => write!(
        f,
        "expiration scheduling requires a task spawner or the 'tokio' feature"
      ),
    }
  }
}

impl std::error::Error for BuildError {}

/// Errors surfaced by cache operations.
#[derive(Debug, Clone)]
pub enum CacheError {
  /// The supplied key was empty or whitespace-only. Raised before any
  /// state is touched.
  InvalidKey(String),
  /// The value factory failed. Delivered only through the awaited future,
  /// never synchronously from an insert call.
  Computation(FactoryError),
}

impl fmt::Display for CacheError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheError::InvalidKey(key) => {
        write!(f, "cache keys must be non-empty, got {key:?}")
      }
      CacheError::Computation(source) => write!(f, "value factory failed: {source}"),
    }
  }
}

impl std::error::Error for CacheError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      CacheError::InvalidKey(_) => None,
      CacheError::Computation(source) => Some(source.as_ref()),
    }
  }
}

impl CacheError {
  /// Returns `true` if this error is a memoized factory failure.
  pub fn is_computation(&self) -> bool {
    matches!(self, CacheError::Computation(_))
  }
}
