//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with payload and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored payload
    pub data: T,
    /// Insertion instant (monotonic clock)
    pub created_at: Instant,
    /// Time-to-live measured from `created_at`
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    ///
    /// # Arguments
    /// * `data` - The payload to store
    /// * `ttl` - Duration after which the entry is considered expired
    pub fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Is Live ==
    /// Checks whether the entry is still live at `now`.
    ///
    /// Boundary condition: an entry stays live while the elapsed time is less
    /// than or equal to its TTL, and expires once elapsed time exceeds it.
    pub fn is_live_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) <= self.ttl
    }

    // == Is Expired ==
    /// Checks if the entry has expired. Recomputed on every call.
    pub fn is_expired(&self) -> bool {
        !self.is_live_at(Instant::now())
    }

    /// Time elapsed since insertion.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.age())
    }
}
