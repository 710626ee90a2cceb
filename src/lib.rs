//! Storefront Cache - in-process TTL caching for storefront servers
//!
//! Typed TTL caches with lazy and background expiry, regex pattern
//! invalidation, cache-aside helpers and session-scoped keys, plus a small
//! admin HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{
    Cache, CacheRegistry, OrderCache, ProductCache, SessionCache, ShippingMethodsCache,
};
pub use config::{Config, TtlPolicy};
pub use error::CacheError;
pub use tasks::spawn_cleanup_task;
