//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::tasks::ExpiryTimer;

// == Cache Entry ==
/// A single live cache entry.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Pending expiry timer, None when max age is unbounded
    timer: Option<ExpiryTimer>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry with no expiry timer.
    pub fn new(value: V) -> Self {
        Self { value, timer: None }
    }

    // == Arm ==
    /// Installs a new expiry timer, cancelling the previous one.
    pub fn arm(&mut self, timer: ExpiryTimer) {
        self.timer = Some(timer);
    }

    // == Disarm ==
    /// Cancels the pending expiry timer, if any.
    pub fn disarm(&mut self) {
        self.timer = None;
    }

    /// Id of the pending timer, if any.
    pub fn timer_id(&self) -> Option<u64> {
        self.timer.as_ref().map(ExpiryTimer::id)
    }

    /// Consumes the entry from inside its own firing timer.
    ///
    /// The timer task is not aborted since it is the caller.
    pub fn into_value_from_timer(mut self) -> V {
        if let Some(timer) = self.timer.take() {
            timer.disarm();
        }
        self.value
    }

    pub fn into_value(self) -> V {
        self.value
    }

    // == Expiry ==
    /// Deadline of the pending timer, None if the entry never expires.
    pub fn expires_at(&self) -> Option<Instant> {
        self.timer.as_ref().map(ExpiryTimer::deadline)
    }

    // == Time To Live ==
    /// Returns the remaining time before expiry.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the deadline has passed but the timer has
    ///   not run yet
    /// - `Some(remaining)` if the entry has a pending timer
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
