//! TTL Cleanup Task
//!
//! Background sweep for the in-memory cache backend. Expired entries are already invisible to
//! reads; the sweep reclaims the memory of keys nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that removes expired entries every `cleanup_interval_secs`.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = MemoryCache::new(10_000);
/// let cleanup_handle = spawn_cleanup_task(cache.store(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "starting cache cleanup task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let (removed, remaining, evictions) = {
                let mut guard = cache.write().await;
                (guard.cleanup_expired(), guard.len(), guard.evictions())
            };

            if removed > 0 {
                info!(removed, remaining, evictions, "cache cleanup removed expired entries");
            } else {
                debug!(remaining, evictions, "cache cleanup found nothing to remove");
            }
        }
    })
}
