//! Cache Module
//!
//! Key scheme, backend seam and cache-aside orchestration for content reads.

mod aside;
mod backend;
mod clock;
mod entry;
pub mod keys;
mod lru;
mod redis;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use aside::CacheAside;
pub use backend::{CacheBackend, MemoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use redis::RedisCache;
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
