//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Lifetime of every cache entry, in seconds. Not configurable.
pub const CACHE_TTL_SECS: u64 = 3600;

/// Largest page size a list request may ask for.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Which cache backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// In-process map with TTL and LRU eviction
    Memory,
    /// External Redis server
    Redis,
}

impl FromStr for CacheBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown cache backend `{other}`")),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Page size used when a list request omits one; its first page is invalidated on writes
    pub default_page_size: i64,
    /// Cache backend selection
    pub cache_backend: CacheBackendKind,
    /// Connection URL for the Redis backend
    pub redis_url: String,
    /// Capacity of the in-memory backend
    pub max_entries: usize,
    /// Expired-entry sweep interval in seconds (in-memory backend)
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_PAGE_SIZE` - Page size when none is requested (default: 10)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379/0)
    /// - `MAX_ENTRIES` - In-memory cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_page_size: parse_var::<i64>("DEFAULT_PAGE_SIZE")
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .unwrap_or(defaults.default_page_size),
            cache_backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.cache_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_page_size: 10,
            cache_backend: CacheBackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            max_entries: 10_000,
            cleanup_interval: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.cache_backend, CacheBackendKind::Memory);
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.cleanup_interval, 60);
    }

    #[test]
    fn test_config_from_env_defaults() {
        for var in [
            "SERVER_PORT",
            "DEFAULT_PAGE_SIZE",
            "CACHE_BACKEND",
            "REDIS_URL",
            "MAX_ENTRIES",
            "CLEANUP_INTERVAL",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.cache_backend, CacheBackendKind::Memory);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("Redis".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Redis));
        assert_eq!(
            " memory ".parse::<CacheBackendKind>(),
            Ok(CacheBackendKind::Memory)
        );
        assert!("memcached".parse::<CacheBackendKind>().is_err());
    }
}
