//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheRegistry;

/// Spawns a background task that periodically sweeps expired entries from
/// every cache in `caches`.
///
/// Reads never depend on this task: expired entries are also dropped when
/// looked up. The sweep only reclaims memory held by keys nobody reads.
/// Each cache is locked only for its own pass.
///
/// # Arguments
/// * `caches` - The caches to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task; abort it during graceful shutdown.
///
/// # Example
/// ```ignore
/// let products: Cache<Product> = Cache::new("products", ttl.product);
/// let cleanup_handle = spawn_cleanup_task(CacheRegistry::new().with(&products), interval);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(caches: CacheRegistry, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {:?} over {} caches",
            interval,
            caches.len()
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = caches.purge_expired();

            // Log cleanup statistics
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
