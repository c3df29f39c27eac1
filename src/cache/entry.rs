//! Cache Entry Module
//!
//! A serialized payload plus the instant it stops being servable.

// == Cache Entry ==
/// A cached payload with its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized JSON payload
    pub value: String,
    /// Unix milliseconds at which the entry expires
    pub expires_at: u64,
}

impl CacheEntry {
    pub fn new(value: String, ttl_secs: u64, now_ms: u64) -> Self {
        Self {
            value,
            expires_at: now_ms.saturating_add(ttl_secs.saturating_mul(1000)),
        }
    }

    /// An entry is expired once `now_ms` reaches its deadline.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
