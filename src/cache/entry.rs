//! Cache Entry Module
//!
//! Defines a single cache entry together with its recency marker.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and recency metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, replaced as a whole on every write
    pub value: V,
    /// Position in the recency ordering (higher = more recent)
    pub tick: u64,
    /// Time of the last read or write
    pub last_access: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry accessed "now" at the given recency tick.
    pub fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            tick,
            last_access: Instant::now(),
        }
    }

    // == Touch ==
    /// Records an access at the given recency tick.
    pub fn touch(&mut self, tick: u64) {
        self.tick = tick;
        self.last_access = Instant::now();
    }

    // == Is Expired ==
    /// Checks whether the entry has been idle for longer than `ttl`.
    ///
    /// Without a TTL an entry never expires.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.last_access.elapsed() > ttl,
            None => false,
        }
    }

    // == Idle Time ==
    /// Returns how long the entry has gone without an access.
    pub fn idle_for(&self) -> Duration {
        self.last_access.elapsed()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), 7);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.tick, 7);
        assert!(entry.idle_for() < Duration::from_secs(1));
    }

    #[test]
    fn test_entry_never_expires_without_ttl() {
        let entry = CacheEntry::new(1u32, 0);
        assert!(!entry.is_expired(None));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(1u32, 0);
        assert!(!entry.is_expired(Some(Duration::from_millis(200))));

        sleep(Duration::from_millis(250));

        assert!(entry.is_expired(Some(Duration::from_millis(200))));
    }

    #[test]
    fn test_touch_resets_idle_time() {
        let mut entry = CacheEntry::new(1u32, 0);
        sleep(Duration::from_millis(150));
        assert!(entry.is_expired(Some(Duration::from_millis(100))));

        entry.touch(1);

        assert_eq!(entry.tick, 1);
        assert!(!entry.is_expired(Some(Duration::from_millis(100))));
    }
}
