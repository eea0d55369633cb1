//! LRU Tracker Module
//!
//! Implements least-recently-used ordering for cache eviction.

use std::collections::BTreeMap;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every access draws a fresh tick from a monotonic counter, so no two keys
/// ever share a recency position:
/// - Lowest tick = least recently used
/// - Highest tick = most recently used
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Keys ordered by the tick of their last access
    order: BTreeMap<u64, String>,
    /// Next tick to hand out
    next_tick: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used and returns its new tick.
    ///
    /// `previous` is the tick the key held before, if it was tracked.
    pub fn touch(&mut self, key: &str, previous: Option<u64>) -> u64 {
        let key = match previous.and_then(|tick| self.order.remove(&tick)) {
            Some(existing) => existing,
            None => key.to_string(),
        };

        let tick = self.next_tick;
        self.next_tick += 1;
        self.order.insert(tick, key);
        tick
    }

    // == Remove ==
    /// Stops tracking the key that holds `tick`.
    pub fn remove(&mut self, tick: u64) -> Option<String> {
        self.order.remove(&tick)
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key and its tick without removing it.
    pub fn peek_oldest(&self) -> Option<(u64, &str)> {
        self.order
            .first_key_value()
            .map(|(tick, key)| (*tick, key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
