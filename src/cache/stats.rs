//! Cache Statistics Module
//!
//! Tracks cache-aside hit/miss counts and derives the hit rate.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Hit/miss counters shared by every cache-aside lookup.
///
/// Counters are atomics so one instance can be shared through an `Arc`
/// between caches and request handlers without an extra lock.
#[derive(Debug, Default)]
pub struct CacheStats {
    /// Number of lookups served from the cache
    hits: AtomicU64,
    /// Number of lookups that had to invoke the producer
    misses: AtomicU64,
}

// == Stats Snapshot ==
/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    /// Hit rate as a percentage (0-100) rounded to two decimals
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    // == Hit Rate ==
    /// Calculates the hit rate as a percentage rounded to two decimals.
    ///
    /// Returns 0.0 if no lookups have been recorded.
    pub fn hit_rate(&self) -> f64 {
        hit_rate_percent(self.hits(), self.misses())
    }

    // == Snapshot ==
    /// Returns the current counters and derived hit rate.
    pub fn snapshot(&self) -> StatsSnapshot {
        let hits = self.hits();
        let misses = self.misses();
        StatsSnapshot {
            hits,
            misses,
            hit_rate: hit_rate_percent(hits, misses),
        }
    }

    // == Reset ==
    /// Zeroes both counters.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    let percent = hits as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}
