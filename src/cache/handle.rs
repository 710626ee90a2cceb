//! Shared Cache Handle
//!
//! Cloneable, thread-safe front for a [`CacheStore`], plus the cache-aside
//! helpers used by request handlers.
//!
//! The store lock is a synchronous `parking_lot::Mutex`: every critical
//! section is a single map operation and it is never held across an
//! `.await`, so producers are free to use the cache themselves.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheStore, StatsSnapshot};
use crate::error::{CacheError, Result};

// == Cache Snapshot ==
/// Diagnostic view of a cache: entry count and a point-in-time key list.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    pub size: usize,
    pub keys: Vec<String>,
}

struct Inner<T> {
    name: String,
    default_ttl: Duration,
    store: Mutex<CacheStore<T>>,
    stats: Arc<CacheStats>,
    /// Per-key turn locks used only by `get_or_fetch_coalesced`
    in_flight: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

// == Cache ==
/// Handle to one logical, typed cache.
///
/// Clones share the same store and counters. Build one per payload type
/// (products, checkouts, orders...) and pass it to whoever needs it.
pub struct Cache<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Cache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("name", &self.inner.name)
            .field("default_ttl", &self.inner.default_ttl)
            .field("size", &self.size())
            .finish()
    }
}

impl<T> Cache<T> {
    // == Constructors ==
    /// Creates a cache with its own hit/miss counters.
    pub fn new(name: impl Into<String>, default_ttl: Duration) -> Self {
        Self::with_stats(name, default_ttl, Arc::new(CacheStats::new()))
    }

    /// Creates a cache that records into shared counters.
    pub fn with_stats(
        name: impl Into<String>,
        default_ttl: Duration,
        stats: Arc<CacheStats>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                default_ttl,
                store: Mutex::new(CacheStore::new()),
                stats,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    // == Set ==
    /// Inserts or replaces the entry at `key`.
    pub fn set(&self, key: impl Into<String>, data: T, ttl: Duration) {
        self.inner.store.lock().set(key.into(), data, ttl);
    }

    /// Inserts with this cache's default TTL.
    pub fn set_default(&self, key: impl Into<String>, data: T) {
        self.set(key, data, self.inner.default_ttl);
    }

    // == Invalidation ==
    /// Removes the entry at `key` if present. Returns whether anything was removed.
    pub fn invalidate(&self, key: &str) -> bool {
        let removed = self.inner.store.lock().invalidate(key);
        if removed {
            debug!(cache = %self.inner.name, key, "invalidated entry");
        }
        removed
    }

    /// Removes every entry whose key matches the regular expression `pattern`.
    ///
    /// The pattern is compiled before the store is touched, so a malformed
    /// pattern leaves the cache unchanged.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = compile_pattern(pattern)?;
        Ok(self.invalidate_regex(&regex))
    }

    /// Same as [`invalidate_pattern`](Self::invalidate_pattern) with a precompiled pattern.
    pub fn invalidate_regex(&self, pattern: &Regex) -> usize {
        let removed = self.inner.store.lock().invalidate_matching(pattern);
        debug!(
            cache = %self.inner.name,
            pattern = pattern.as_str(),
            removed,
            "pattern invalidation"
        );
        removed
    }

    /// Removes all entries.
    pub fn clear(&self) -> usize {
        self.inner.store.lock().clear()
    }

    /// Evicts every expired entry. Used by the background sweeper.
    pub fn purge_expired(&self) -> usize {
        self.inner.store.lock().cleanup_expired()
    }

    // == Introspection ==
    pub fn size(&self) -> usize {
        self.inner.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.lock().is_empty()
    }

    /// Point-in-time key list; later mutations are not reflected.
    pub fn keys(&self) -> Vec<String> {
        self.inner.store.lock().keys()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let store = self.inner.store.lock();
        CacheSnapshot {
            size: store.len(),
            keys: store.keys(),
        }
    }

    // == Stats ==
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.inner.stats.reset();
    }

    /// Shared counters, for handing to other caches or reporting.
    pub fn stats_handle(&self) -> Arc<CacheStats> {
        Arc::clone(&self.inner.stats)
    }

    // == Shutdown ==
    /// Drops every entry. The sweeper task is stopped by whoever spawned it.
    pub fn shutdown(&self) {
        let dropped = self.clear();
        info!(cache = %self.inner.name, dropped, "cache shut down");
    }
}

impl<T: Clone> Cache<T> {
    // == Get ==
    /// Returns a copy of the live payload at `key`.
    ///
    /// Raw reads do not touch the hit/miss counters; only the cache-aside
    /// helpers record statistics.
    pub fn get(&self, key: &str) -> Option<T> {
        self.inner.store.lock().get(key).cloned()
    }

    // == Get Or Fetch ==
    /// Cache-aside lookup.
    ///
    /// On a hit the stored value is returned and `producer` is never called.
    /// On a miss `producer` runs (without the store lock held), and its
    /// value is stored under `key` with `ttl`. A producer error is returned
    /// unchanged and nothing is cached, so the next call retries.
    ///
    /// Concurrent misses for the same key each run their own producer; use
    /// [`get_or_fetch_coalesced`](Self::get_or_fetch_coalesced) to share one.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Duration,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.lookup(key) {
            return Ok(data);
        }
        self.fetch_and_store(key, producer, ttl).await
    }

    /// [`get_or_fetch`](Self::get_or_fetch) with this cache's default TTL.
    pub async fn get_or_fetch_default<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.get_or_fetch(key, producer, self.inner.default_ttl).await
    }

    /// Cache-aside lookup with single-flight on misses.
    ///
    /// Callers missing the same key take turns: the first runs the producer,
    /// the rest re-check the cache once it is their turn and are served the
    /// stored value. If the producer fails, the next waiter runs its own
    /// producer. Callers that find the value cached are not serialized.
    pub async fn get_or_fetch_coalesced<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Duration,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.lookup(key) {
            return Ok(data);
        }

        let flight = FlightGuard {
            cache: self,
            key,
            turn: Arc::clone(
                self.inner
                    .in_flight
                    .lock()
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            ),
        };

        let _turn = flight.turn.lock().await;
        match self.lookup(key) {
            Some(data) => Ok(data),
            None => self.fetch_and_store(key, producer, ttl).await,
        }
    }

    /// Reads `key` and records a hit when found.
    fn lookup(&self, key: &str) -> Option<T> {
        let data = self.get(key)?;
        self.inner.stats.record_hit();
        debug!(cache = %self.inner.name, key, "cache hit");
        Some(data)
    }

    async fn fetch_and_store<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        ttl: Duration,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        self.inner.stats.record_miss();
        debug!(cache = %self.inner.name, key, "cache miss, invoking producer");

        match producer().await {
            Ok(data) => {
                self.set(key, data.clone(), ttl);
                Ok(data)
            }
            Err(err) => {
                warn!(cache = %self.inner.name, key, "producer failed, nothing cached");
                Err(err)
            }
        }
    }

}

// == Flight Guard ==
/// A caller's claim on a key's turn lock in `in_flight`.
///
/// Dropping it releases the claim, whether the lookup finished or its
/// future was cancelled while waiting.
struct FlightGuard<'a, T> {
    cache: &'a Cache<T>,
    key: &'a str,
    turn: Arc<AsyncMutex<()>>,
}

impl<T> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        let mut in_flight = self.cache.inner.in_flight.lock();
        // One reference in the map, one held by us: nobody else is waiting.
        if Arc::strong_count(&self.turn) <= 2 {
            in_flight.remove(self.key);
        }
    }
}

/// Compiles an invalidation pattern, logging rejected input.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| {
        warn!(pattern, error = %source, "rejected invalidation pattern");
        CacheError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        }
    })
}
