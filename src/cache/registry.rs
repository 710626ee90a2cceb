//! Cache Registry
//!
//! Caches are typed per payload, so administrative operations and the
//! sweeper reach them through the object-safe [`ManagedCache`] trait.

use std::sync::Arc;

use regex::Regex;
use tracing::info;

use crate::cache::handle::compile_pattern;
use crate::cache::{Cache, CacheSnapshot};
use crate::error::Result;

// == Managed Cache ==
/// Payload-independent operations shared by every cache.
pub trait ManagedCache: Send + Sync {
    fn name(&self) -> &str;
    fn size(&self) -> usize;
    fn keys(&self) -> Vec<String>;
    fn invalidate(&self, key: &str) -> bool;
    fn invalidate_regex(&self, pattern: &Regex) -> usize;
    fn clear(&self) -> usize;
    fn purge_expired(&self) -> usize;
}

impl<T: Send + 'static> ManagedCache for Cache<T> {
    fn name(&self) -> &str {
        Cache::name(self)
    }

    fn size(&self) -> usize {
        Cache::size(self)
    }

    fn keys(&self) -> Vec<String> {
        Cache::keys(self)
    }

    fn invalidate(&self, key: &str) -> bool {
        Cache::invalidate(self, key)
    }

    fn invalidate_regex(&self, pattern: &Regex) -> usize {
        Cache::invalidate_regex(self, pattern)
    }

    fn clear(&self) -> usize {
        Cache::clear(self)
    }

    fn purge_expired(&self) -> usize {
        Cache::purge_expired(self)
    }
}

// == Cache Registry ==
/// Set of caches managed together.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    caches: Vec<Arc<dyn ManagedCache>>,
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.caches.iter().map(|cache| cache.name()))
            .finish()
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cache. The registry keeps a clone of the handle.
    pub fn register<T: Send + 'static>(&mut self, cache: &Cache<T>) {
        self.caches.push(Arc::new(cache.clone()));
    }

    pub fn with<T: Send + 'static>(mut self, cache: &Cache<T>) -> Self {
        self.register(cache);
        self
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    /// Total entry count across all caches.
    pub fn total_entries(&self) -> usize {
        self.caches.iter().map(|cache| cache.size()).sum()
    }

    /// Every key in every cache, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.caches.iter().flat_map(|cache| cache.keys()).collect();
        keys.sort();
        keys
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let keys = self.keys();
        CacheSnapshot {
            size: keys.len(),
            keys,
        }
    }

    /// Removes `key` from every cache. Returns how many caches held it.
    pub fn invalidate(&self, key: &str) -> usize {
        self.caches
            .iter()
            .filter(|cache| cache.invalidate(key))
            .count()
    }

    /// Pattern invalidation across every cache.
    ///
    /// The pattern is validated once up front; on error nothing is removed.
    pub fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        let regex = compile_pattern(pattern)?;
        let removed = self
            .caches
            .iter()
            .map(|cache| cache.invalidate_regex(&regex))
            .sum();
        info!(pattern, removed, "pattern invalidation across caches");
        Ok(removed)
    }

    pub fn clear(&self) -> usize {
        let removed = self.caches.iter().map(|cache| cache.clear()).sum();
        info!(removed, "cleared all caches");
        removed
    }

    /// One sweep over every cache. Each cache is locked only for its own pass.
    pub fn purge_expired(&self) -> usize {
        self.caches.iter().map(|cache| cache.purge_expired()).sum()
    }
}
