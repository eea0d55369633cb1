//! Cache Store Module
//!
//! Single-threaded cache engine combining HashMap storage with LRU tracking
//! and optional idle-time expiry. Thread safety is added by the strategies
//! that own a `CacheStore` behind a lock.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and optional idle TTL.
///
/// Invariant: `entries.len() <= max_entries` after every public call.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    /// Idle time after which an entry is treated as absent
    ttl: Option<Duration>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and optional idle TTL.
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::with_capacity(max_entries.min(4096)),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
        }
    }

    // == Set ==
    /// Inserts or replaces the value for `key` and marks it most recent.
    ///
    /// When the insertion pushes the entry count over capacity, exactly one
    /// entry, the least recently used, is evicted and its key returned.
    pub fn set(&mut self, key: String, value: V) -> Option<String> {
        if let Some(entry) = self.entries.get_mut(&key) {
            let tick = self.lru.touch(&key, Some(entry.tick));
            entry.value = value;
            entry.touch(tick);
            return None;
        }

        let tick = self.lru.touch(&key, None);
        self.entries.insert(key, CacheEntry::new(value, tick));

        let evicted = if self.entries.len() > self.max_entries {
            self.evict_oldest()
        } else {
            None
        };

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Get ==
    /// Returns a copy of the value for `key` and marks it most recent.
    ///
    /// An entry idle for longer than the TTL is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let ttl = self.ttl;
        let expired_tick = match self.entries.get_mut(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired(ttl) => entry.tick,
            Some(entry) => {
                let tick = self.lru.touch(key, Some(entry.tick));
                entry.touch(tick);
                self.stats.record_hit();
                return Some(entry.value.clone());
            }
        };

        self.entries.remove(key);
        self.lru.remove(expired_tick);
        self.stats.record_expirations(1);
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
        None
    }

    // == Contains ==
    /// Checks for a live entry without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    // == Cleanup Expired ==
    /// Removes every entry idle for longer than the TTL.
    ///
    /// Recency ticks and access instants advance together, so expired
    /// entries always form a prefix of the LRU order and the scan stops at
    /// the first live entry. Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        if self.ttl.is_none() {
            return 0;
        }

        let mut removed = 0;
        while let Some((tick, key)) = self.lru.peek_oldest() {
            let expired = self
                .entries
                .get(key)
                .map_or(true, |entry| entry.is_expired(self.ttl));
            if !expired {
                break;
            }
            if let Some(key) = self.lru.remove(tick) {
                self.entries.remove(&key);
                removed += 1;
            }
        }

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let key = self.lru.evict_oldest()?;
        self.entries.remove(&key);
        self.stats.record_eviction();
        Some(key)
    }
}
