//! A key-addressed, single-flight, asynchronous memoizing cache.
//!
//! # Features
//! - **Single-flight resolution**: concurrent demand for one key collapses
//!   into a single factory invocation whose outcome every caller shares.
//! - **Lazy, resettable entries**: a [`CacheEntry`] runs its factory on
//!   first access and can be rearmed with [`CacheEntry::reset`].
//! - **Pluggable failure handling**: the [`AwaitStrategy`] bound at build
//!   time decides whether failures stay memoized ([`Plain`]) or rearm the
//!   entry ([`ResetOnError`]).
//! - **Time-based expiry**: every insertion arms a deferred removal after
//!   its time-to-live, a per-call override or the cache-wide default.
//! - **Insertion notifications**: registrable [`InsertListener`] callbacks
//!   dispatched off the caller's path.
//! - **Non-Clone values**: values are stored in an `Arc<V>`, avoiding
//!   `V: Clone` bounds.
//!
//! # Example
//! ```no_run
//! use flight_cache::Cache;
//! use std::time::Duration;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let cache: Cache<String> = Cache::builder()
//!   .time_to_live(Duration::from_secs(60))
//!   .build()?;
//!
//! let greeting = cache
//!   .get_or_insert_with("greeting", || async { Ok("hello".to_string()) })
//!   .await?;
//! assert_eq!(*greeting, "hello");
//! # Ok(())
//! # }
//! ```

// Public modules that form the API
pub mod builder;
pub mod entry;
pub mod error;
pub mod listener;
pub mod runtime;
pub mod strategy;

// Internal, crate-only modules
mod handle;
mod shared;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use entry::{CacheEntry, ValueFuture};
pub use error::{BoxError, BuildError, CacheError, FactoryError};
pub use handle::Cache;
pub use listener::InsertListener;
pub use runtime::TaskSpawner;
#[cfg(feature = "tokio")]
pub use runtime::TokioSpawner;
pub use strategy::{AwaitStrategy, Plain, ResetOnError};
