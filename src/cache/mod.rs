//! Cache Module
//!
//! In-memory caching with TTL expiration, pattern invalidation and
//! cache-aside helpers.

mod domains;
mod entry;
mod handle;
pub mod keys;
mod registry;
mod session;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use domains::{OrderCache, ProductCache, ShippingMethodsCache};
pub use entry::CacheEntry;
pub use handle::{Cache, CacheSnapshot};
pub use registry::{CacheRegistry, ManagedCache};
pub use session::{session_key, SessionCache};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::CacheStore;
