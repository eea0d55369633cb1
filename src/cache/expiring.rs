//! LRU cache strategy with idle-time expiry and a background sweep.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{Cache, CacheStats, CacheStore};
use crate::tasks::{spawn_sweep_task, SweepHandle};

/// Shared slot holding the store; `None` once the cache is closed.
pub type SharedStore<V> = Arc<Mutex<Option<CacheStore<V>>>>;

/// Capacity-bounded LRU cache whose entries also expire after `ttl` without
/// an access.
///
/// Expired entries are hidden from `get` immediately and physically removed
/// by a sweep task that runs every `sweep_interval` until `close`.
pub struct ExpiringCache<V> {
    store: SharedStore<V>,
    sweeper: SweepHandle,
}

impl<V> ExpiringCache<V>
where
    V: Clone + Send + 'static,
{
    /// Creates the cache and starts its sweep task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(capacity: usize, ttl: Duration, sweep_interval: Duration) -> Self {
        let store: SharedStore<V> =
            Arc::new(Mutex::new(Some(CacheStore::new(capacity, Some(ttl)))));
        let sweeper = spawn_sweep_task(Arc::clone(&store), sweep_interval);

        Self { store, sweeper }
    }

    /// Runs one sweep pass immediately and returns the number of entries
    /// removed.
    pub fn sweep_now(&self) -> usize {
        self.store
            .lock()
            .as_mut()
            .map_or(0, |store| store.cleanup_expired())
    }

    /// Returns true while the sweep task is still running.
    pub fn sweeper_running(&self) -> bool {
        !self.sweeper.is_finished()
    }
}

impl<V> Cache<V> for ExpiringCache<V>
where
    V: Clone + Send + Sync + 'static,
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
        self.sweeper.stop();
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

impl<V> Drop for ExpiringCache<V> {
    fn drop(&mut self) {
        self.sweeper.stop();
    }
}
