//! Configuration Module
//!
//! Loads service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::CachePolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of orders the cache can hold
    pub max_entries: usize,
    /// Number of most recent orders loaded into the cache at startup
    pub startup_size: usize,
    /// Idle TTL in seconds; 0 disables expiry
    pub cache_ttl: u64,
    /// TTL sweep interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Deadline for each request or ingested message, in milliseconds
    pub request_timeout_ms: u64,
    /// JSON-lines file backing the order store
    pub orders_file: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Cache capacity (default: 1000)
    /// - `CACHE_STARTUP_SIZE` - Orders restored at startup (default: 10)
    /// - `CACHE_TTL` - Idle TTL in seconds, 0 disables (default: 0)
    /// - `CLEANUP_INTERVAL` - TTL sweep frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 8081)
    /// - `REQUEST_TIMEOUT_MS` - Store deadline per call (default: 5000)
    /// - `ORDERS_FILE` - Order store path (default: orders.jsonl)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            startup_size: env_or("CACHE_STARTUP_SIZE", defaults.startup_size),
            cache_ttl: env_or("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            orders_file: env::var("ORDERS_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.orders_file),
        }
    }

    /// Cache strategy implied by the TTL setting.
    pub fn cache_policy(&self) -> CachePolicy {
        if self.cache_ttl == 0 {
            CachePolicy::Lru {
                capacity: self.max_entries,
            }
        } else {
            CachePolicy::LruWithTtl {
                capacity: self.max_entries,
                ttl: Duration::from_secs(self.cache_ttl),
                sweep_interval: Duration::from_secs(self.cleanup_interval.max(1)),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            startup_size: 10,
            cache_ttl: 0,
            cleanup_interval: 1,
            server_port: 8081,
            request_timeout_ms: 5000,
            orders_file: PathBuf::from("orders.jsonl"),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = raw, "Invalid configuration value, using default");
            default
        }
    }
}
