//! Cache Store Module
//!
//! In-process key/value storage combining a HashMap with LRU ordering and TTL expiry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, Clock, LruTracker, SystemClock, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
/// Bounded cache storage with LRU eviction and per-entry expiry.
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    max_entries: usize,
    evictions: u64,
    clock: Arc<dyn Clock>,
}

impl CacheStore {
    /// Creates a store reading time from the system clock.
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
            evictions: 0,
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_secs`, replacing any previous entry and its TTL.
    ///
    /// When the store is full, the least recently used entry is dropped first.
    pub fn set(&mut self, key: &str, value: String, ttl_secs: u64) -> Result<(), CacheError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected(format!(
                "key exceeds maximum length of {MAX_KEY_LENGTH} bytes"
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected(format!(
                "value exceeds maximum size of {MAX_VALUE_SIZE} bytes"
            )));
        }

        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.evictions += 1;
                tracing::debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        let entry = CacheEntry::new(value, ttl_secs, self.clock.now_ms());
        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`. Expired entries are dropped and read as absent.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let expired = self.entries.get(key)?.is_expired_at(now);

        if expired {
            self.remove(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Delete ==
    /// Removes `key`, reporting whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key)
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    fn remove(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::config::CACHE_TTL_SECS;
    use std::time::Duration;

    fn store_with_clock(max_entries: usize) -> (CacheStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_at(0));
        (CacheStore::with_clock(max_entries, clock.clone()), clock)
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100);

        store.set("item:1", "{}".to_string(), CACHE_TTL_SECS).unwrap();

        assert_eq!(store.get("item:1").as_deref(), Some("{}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100);
        assert!(store.get("item:404").is_none());
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(100);
        store.set("item:1", "v".to_string(), CACHE_TTL_SECS).unwrap();

        assert!(store.delete("item:1"));
        assert!(!store.delete("item:1"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock(100);

        store.set("k", "v1".to_string(), 10).unwrap();
        clock.advance(Duration::from_secs(8));
        store.set("k", "v2".to_string(), 10).unwrap();
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with_clock(100);
        store.set("k", "v".to_string(), CACHE_TTL_SECS).unwrap();

        clock.advance(Duration::from_secs(CACHE_TTL_SECS - 1));
        assert!(store.get("k").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(store.get("k").is_none());
        assert!(store.is_empty(), "expired entry should be dropped on read");
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);

        store.set("k1", "v1".to_string(), 300).unwrap();
        store.set("k2", "v2".to_string(), 300).unwrap();
        store.set("k3", "v3".to_string(), 300).unwrap();
        store.get("k1");
        store.set("k4", "v4".to_string(), 300).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.evictions(), 1);
        assert!(store.get("k2").is_none());
        assert!(store.get("k1").is_some());
        assert!(store.get("k4").is_some());
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock(100);
        store.set("short", "v".to_string(), 1).unwrap();
        store.set("long", "v".to_string(), 10).unwrap();

        clock.advance(Duration::from_secs(2));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }

    #[test]
    fn test_store_rejects_oversized() {
        let mut store = CacheStore::new(100);

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(&long_key, "v".to_string(), 60),
            Err(CacheError::Rejected(_))
        ));

        let large_value = "x".repeat(MAX_VALUE_SIZE + 1);
        assert!(matches!(
            store.set("k", large_value, 60),
            Err(CacheError::Rejected(_))
        ));
    }
}
