use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A trait for driving the cache's background work on an asynchronous
/// runtime: fire-and-forget listener dispatch and deferred expiration.
pub trait TaskSpawner: Send + Sync + 'static {
  /// Spawns a type-erased future.
  fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>);

  /// Returns a future that resolves after `duration` has elapsed.
  fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>>;
}

#[cfg(feature = "tokio")]
pub struct TokioSpawner(tokio::runtime::Handle);

#[cfg(feature = "tokio")]
impl TokioSpawner {
  /// Creates a spawner that uses the current Tokio runtime context.
  /// Panics if called outside of a Tokio runtime.
  pub fn new() -> Self {
    Self(tokio::runtime::Handle::current())
  }
}

#[cfg(feature = "tokio")]
impl Default for TokioSpawner {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(feature = "tokio")]
impl TaskSpawner for TokioSpawner {
  fn spawn(&self, future: Pin<Box<dyn Future<Output = ()> + Send>>) {
    self.0.spawn(future);
  }

  fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(tokio::time::sleep(duration))
  }
}
