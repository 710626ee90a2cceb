//! Session-Scoped Cache
//!
//! Key-namespacing layer over a [`Cache`] for per-session resources such as
//! an in-progress checkout. Keys have the form `{kind}:{session_id}` or
//! `{kind}:{session_id}:{id}`.

use std::time::Duration;

use tracing::info;

use crate::cache::Cache;
use crate::error::Result;

// == Key Builder ==
/// Builds the cache key for a session-owned resource.
pub fn session_key(session_id: &str, kind: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}:{}:{}", kind, session_id, id),
        None => format!("{}:{}", kind, session_id),
    }
}

// == Session Cache ==
/// Per-session view of a cache, all keys prefixed with one type tag.
#[derive(Debug, Clone)]
pub struct SessionCache<T> {
    cache: Cache<T>,
    kind: String,
    ttl: Duration,
}

impl<T> SessionCache<T> {
    /// Wraps `cache`, namespacing keys under `kind` and storing with `ttl`.
    pub fn new(cache: Cache<T>, kind: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            kind: kind.into(),
            ttl,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying cache, shared with anyone else holding it.
    pub fn cache(&self) -> &Cache<T> {
        &self.cache
    }

    pub fn key_for(&self, session_id: &str) -> String {
        session_key(session_id, &self.kind, None)
    }

    pub fn set(&self, session_id: &str, data: T) {
        self.cache.set(self.key_for(session_id), data, self.ttl);
    }

    /// Stores a sub-resource of the session, e.g. one line item.
    pub fn set_item(&self, session_id: &str, id: &str, data: T) {
        self.cache
            .set(session_key(session_id, &self.kind, Some(id)), data, self.ttl);
    }

    /// Drops the session's own entry. Sub-resources are left alone.
    pub fn invalidate(&self, session_id: &str) -> bool {
        self.cache.invalidate(&self.key_for(session_id))
    }

    /// Drops the session's entry together with every sub-resource.
    pub fn invalidate_session_items(&self, session_id: &str) -> Result<usize> {
        let pattern = format!("^{}(:|$)", regex::escape(&self.key_for(session_id)));
        self.cache.invalidate_pattern(&pattern)
    }

    // == Invalidate All ==
    /// Drops every entry under this type tag, across all sessions.
    pub fn invalidate_all(&self) -> Result<usize> {
        let pattern = format!("^{}:", regex::escape(&self.kind));
        let removed = self.cache.invalidate_pattern(&pattern)?;
        info!(kind = %self.kind, removed, "invalidated all session entries");
        Ok(removed)
    }
}

impl<T: Clone> SessionCache<T> {
    pub fn get(&self, session_id: &str) -> Option<T> {
        self.cache.get(&self.key_for(session_id))
    }

    pub fn get_item(&self, session_id: &str, id: &str) -> Option<T> {
        self.cache.get(&session_key(session_id, &self.kind, Some(id)))
    }
}
