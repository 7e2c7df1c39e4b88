use std::time::Duration;

/// A listener that can be registered with the cache to receive a
/// notification whenever an entry is inserted (or re-requested via
/// `get_or_insert_with`, which re-fires the event for a present key).
///
/// `on_insert` is called with the key and the time-to-live that applies to
/// the triggering call. It runs on a spawned task, never inline on the
/// inserting caller's path, and its delivery order relative to the
/// triggering call's return is unspecified.
pub trait InsertListener: Send + Sync {
  fn on_insert(&self, key: &str, time_to_live: Duration);
}

impl<F> InsertListener for F
where
  F: Fn(&str, Duration) + Send + Sync,
{
  fn on_insert(&self, key: &str, time_to_live: Duration) {
    self(key, time_to_live)
  }
}
