//! Cache Module
//!
//! Bounded, thread-safe in-memory caches with LRU eviction and optional
//! idle-time expiry. The cache knows nothing about orders or storage.
//!
//! # Locking
//! Every strategy guards its whole `CacheStore` with one exclusive lock.
//! Reads take it too, because a hit moves the entry in the recency order.
//! No caller can observe a half-inserted or half-evicted entry.

mod entry;
mod expiring;
mod lru;
mod lru_cache;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

pub use entry::CacheEntry;
pub use expiring::{ExpiringCache, SharedStore};
pub use lru::LruTracker;
pub use lru_cache::LruCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Cache Contract ==
/// Capability shared by every cache strategy.
///
/// `get` and `set` never block on I/O and never fail. After `close` the
/// cache is terminal: `get` reports a miss for every key and `set` is
/// ignored.
pub trait Cache<V>: Send + Sync {
    /// Returns the value for `key`, refreshing its recency on a hit.
    fn get(&self, key: &str) -> Option<V>;

    /// Inserts or replaces the value for `key`, evicting at most one
    /// least-recently-used entry when capacity is exceeded.
    fn set(&self, key: String, value: V);

    /// Releases every entry and stops background maintenance.
    fn close(&self);

    fn is_closed(&self) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn stats(&self) -> CacheStats;
}

// == Cache Policy ==
/// Strategy selected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Capacity-bounded LRU
    Lru { capacity: usize },
    /// Capacity-bounded LRU plus idle TTL with a periodic sweep
    LruWithTtl {
        capacity: usize,
        ttl: Duration,
        sweep_interval: Duration,
    },
}

impl CachePolicy {
    pub fn capacity(&self) -> usize {
        match self {
            CachePolicy::Lru { capacity } | CachePolicy::LruWithTtl { capacity, .. } => *capacity,
        }
    }
}

// == Builder ==
/// Builds the cache strategy described by `policy`.
///
/// `LruWithTtl` spawns its sweep task and must be called from within a
/// Tokio runtime.
pub fn build_cache<V>(policy: CachePolicy) -> Arc<dyn Cache<V>>
where
    V: Clone + Send + Sync + 'static,
{
    match policy {
        CachePolicy::Lru { capacity } => Arc::new(LruCache::new(capacity)),
        CachePolicy::LruWithTtl {
            capacity,
            ttl,
            sweep_interval,
        } => Arc::new(ExpiringCache::start(capacity, ttl, sweep_interval)),
    }
}
