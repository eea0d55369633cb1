//! Plain LRU cache strategy.

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{Cache, CacheStats, CacheStore};

/// Capacity-bounded LRU cache without expiry or background work.
///
/// `None` inside the lock marks the closed state.
#[derive(Debug)]
pub struct LruCache<V> {
    store: Mutex<Option<CacheStore<V>>>,
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Mutex::new(Some(CacheStore::new(capacity, None))),
        }
    }
}

impl<V> Cache<V> for LruCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<V> {
        self.store.lock().as_mut()?.get(key)
    }

    fn set(&self, key: String, value: V) {
        let mut guard = self.store.lock();
        let Some(store) = guard.as_mut() else {
            return;
        };
        if let Some(evicted) = store.set(key, value) {
            debug!(key = %evicted, "evicted least recently used entry");
        }
    }

    fn close(&self) {
        if let Some(mut store) = self.store.lock().take() {
            store.clear();
        }
    }

    fn is_closed(&self) -> bool {
        self.store.lock().is_none()
    }

    fn len(&self) -> usize {
        self.store.lock().as_ref().map_or(0, |store| store.len())
    }

    fn stats(&self) -> CacheStats {
        self.store
            .lock()
            .as_ref()
            .map(|store| store.stats())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_and_get() {
        let cache = LruCache::new(10);
        cache.set("a".to_string(), "alpha".to_string());

        assert_eq!(cache.get("a"), Some("alpha".to_string()));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_access_resets_recency() {
        let cache = LruCache::new(2);

        cache.set("1".to_string(), 1);
        cache.set("2".to_string(), 2);
        cache.get("1");
        cache.get("2");
        cache.set("3".to_string(), 3);

        assert_eq!(cache.get("1"), None);
        assert_eq!(cache.get("2"), Some(2));
        assert_eq!(cache.get("3"), Some(3));
    }

    #[test]
    fn test_close_is_terminal() {
        let cache = LruCache::new(10);
        cache.set("a".to_string(), 1);

        cache.close();

        assert!(cache.is_closed());
        assert_eq!(cache.get("a"), None);

        cache.set("b".to_string(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats(), CacheStats::default());

        // Closing twice is harmless
        cache.close();
        assert!(cache.is_closed());
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        let cache = Arc::new(LruCache::new(16));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..200 {
                        let key = format!("k{}", (worker * 31 + i) % 64);
                        cache.set(key.clone(), i);
                        let _ = cache.get(&key);
                        assert!(cache.len() <= 16);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        assert!(cache.len() <= 16);
    }
}
