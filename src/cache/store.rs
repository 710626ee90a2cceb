//! Cache Store Module
//!
//! Key-to-entry map with lazy TTL expiry and pattern-based bulk removal.
//! The store is a plain data structure; sharing and locking live in
//! [`Cache`](crate::cache::Cache).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

use crate::cache::CacheEntry;

// == Cache Store ==
/// Owns every entry of one logical cache.
#[derive(Debug)]
pub struct CacheStore<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CacheStore<T> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Set ==
    /// Inserts or replaces the entry at `key`.
    ///
    /// Last write wins: an existing entry is overwritten and its TTL restarts.
    pub fn set(&mut self, key: String, data: T, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(data, ttl));
    }

    // == Get ==
    /// Returns the payload at `key` if present and live.
    ///
    /// An expired entry found here is removed before returning `None`, so a
    /// reader never observes stale data regardless of when the sweeper last ran.
    pub fn get(&mut self, key: &str) -> Option<&T> {
        let live = self.entries.get(key)?.is_live_at(Instant::now());

        if !live {
            self.entries.remove(key);
            debug!(key, "evicted expired entry on read");
            return None;
        }

        self.entries.get(key).map(|entry| &entry.data)
    }

    // == Invalidate ==
    /// Removes the entry at `key`. Returns whether an entry was removed.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Invalidate Matching ==
    /// Removes every entry whose key matches `pattern` anywhere in the key.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_matching(&mut self, pattern: &Regex) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.is_match(key));
        before - self.entries.len()
    }

    // == Clear ==
    /// Removes all entries. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live_at(now));
        before - self.entries.len()
    }

    // == Keys ==
    /// Point-in-time copy of the stored keys, expired or not.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
