//! Cache backend seam.
//!
//! The orchestrator only needs get, set-with-expiry and delete. No multi-key atomicity or
//! transactions are assumed of an implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheStore, Clock};
use crate::error::CacheError;

/// A key/value store with per-entry expiry.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value under `key`, or `None` on a miss.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// `CacheBackend` over the in-process `CacheStore`.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self::from_store(CacheStore::with_clock(max_entries, clock))
    }

    fn from_store(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared handle to the underlying store, used by the expiry sweep.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.store)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // write lock: a read may drop an expired entry and reorders the LRU
        Ok(self.store.write().await.get(key))
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.store.write().await.set(key, value, ttl.as_secs())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.delete(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new(10);

        cache
            .set_ex("item:1", "{\"id\":1}".into(), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(
            cache.get("item:1").await.unwrap().as_deref(),
            Some("{\"id\":1}")
        );
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_delete_absent_is_ok() {
        let cache = MemoryCache::new(10);
        assert!(cache.delete("never-set").await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_cache_respects_clock() {
        let clock = Arc::new(ManualClock::starting_at(0));
        let cache = MemoryCache::with_clock(10, clock.clone());

        cache
            .set_ex("k", "v".into(), Duration::from_secs(5))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(5));

        assert!(cache.get("k").await.unwrap().is_none());
    }
}
