//! TTL Cleanup Task
//!
//! Background task that periodically removes expired local cache entries.
//! Lazy expiry already hides them from readers; sweeping only returns their
//! bytes to the store sooner.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheBackend, CacheManager, Serializer};

/// Spawns a background task that periodically purges expired entries.
///
/// # Arguments
/// * `cache` - shared manager whose backend is swept
/// * `cleanup_interval_secs` - seconds between sweeps, at least 1
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheManager::new(LocalStore::new(1024 * 1024)));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<B, S>(
    cache: Arc<CacheManager<B, S>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    B: CacheBackend + 'static,
    S: Serializer + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
