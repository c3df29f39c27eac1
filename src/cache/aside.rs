//! Cache-aside orchestration.
//!
//! Reads check the backend first and fall through to a caller-supplied loader on a miss, then
//! populate the key with the loaded value. Writes go straight to the store; callers then hand
//! the affected keys to [`CacheAside::invalidate`].
//!
//! The backend is an accelerator only. Any fault it raises is logged and counted, and the
//! request is served from the store as if the cache were empty. Loader failures propagate and
//! leave the cache untouched.
//!
//! Consistency is loose. A read that misses, loads a value, and writes it back
//! after a concurrent writer's invalidation has already run leaves that older value cached
//! until its TTL lapses. Nothing here locks or versions entries to prevent that.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheStats, StatsRecorder};
use crate::config::CACHE_TTL_SECS;
use crate::error::Result;

pub struct CacheAside {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    stats: StatsRecorder,
}

impl CacheAside {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            ttl: Duration::from_secs(CACHE_TTL_SECS),
            stats: StatsRecorder::new(),
        }
    }

    /// Serves `key` from the cache, or runs `loader` and caches what it returns.
    ///
    /// A hit never invokes `loader`.
    pub async fn read_through<T, F, Fut>(&self, key: &str, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let backend_up = match self.backend.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => {
                    self.stats.record_hit();
                    debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    warn!(key, error = %e, "discarding undecodable cache entry");
                    true
                }
            },
            Ok(None) => true,
            Err(e) => {
                self.stats.record_backend_error();
                warn!(key, error = %e, "cache read failed, serving from store");
                false
            }
        };

        self.stats.record_miss();
        debug!(key, "cache miss");
        let value = loader().await?;

        if backend_up {
            self.populate(key, &value).await;
        }
        Ok(value)
    }

    async fn populate<T: Serialize>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "could not serialize value for cache");
                return;
            }
        };

        match self.backend.set_ex(key, raw, self.ttl).await {
            Ok(()) => debug!(key, ttl_secs = self.ttl.as_secs(), "cache populated"),
            Err(e) => {
                self.stats.record_backend_error();
                warn!(key, error = %e, "cache write failed");
            }
        }
    }

    /// Deletes each key. Must be called only after the store mutation has committed.
    pub async fn invalidate(&self, keys: &[String]) {
        for key in keys {
            match self.backend.delete(key).await {
                Ok(()) => {
                    self.stats.record_invalidation();
                    debug!(key = %key, "cache invalidated");
                }
                Err(e) => {
                    self.stats.record_backend_error();
                    warn!(key = %key, error = %e, "cache invalidation failed");
                }
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}
