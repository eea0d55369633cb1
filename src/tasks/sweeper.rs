//! TTL Sweep Task
//!
//! Background task that periodically removes idle cache entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::SharedStore;

/// Handle for stopping a running sweep task.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Signals the task to stop and aborts it if it is parked on the timer.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the task and waits for it to exit.
    pub async fn join(self) {
        self.shutdown_tx.send_replace(true);
        let _ = self.task.await;
    }
}

/// Spawns a task that sweeps expired entries out of `store` every
/// `sweep_interval` until stopped or until the store is closed.
///
/// The lock is held for a single pass over expired entries only.
pub fn spawn_sweep_task<V>(store: SharedStore<V>, sweep_interval: Duration) -> SweepHandle
where
    V: Clone + Send + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {:?}",
            sweep_interval
        );

        let mut ticker = interval_at(Instant::now() + sweep_interval, sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = {
                        let mut guard = store.lock();
                        match guard.as_mut() {
                            Some(store) => store.cleanup_expired(),
                            None => break,
                        }
                    };

                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("TTL sweep task stopped");
    });

    SweepHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::cache::CacheStore;

    fn shared(ttl: Duration) -> SharedStore<String> {
        Arc::new(Mutex::new(Some(CacheStore::new(100, Some(ttl)))))
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let store = shared(Duration::from_millis(100));
        store
            .lock()
            .as_mut()
            .unwrap()
            .set("expire_soon".to_string(), "value".to_string());

        let handle = spawn_sweep_task(Arc::clone(&store), Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(450)).await;

        assert_eq!(store.lock().as_ref().unwrap().len(), 0);
        handle.join().await;
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_live_entries() {
        let store = shared(Duration::from_secs(3600));
        store
            .lock()
            .as_mut()
            .unwrap()
            .set("long_lived".to_string(), "value".to_string());

        let handle = spawn_sweep_task(Arc::clone(&store), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let value = store.lock().as_mut().unwrap().get("long_lived");
        assert_eq!(value, Some("value".to_string()));
        handle.join().await;
    }

    #[tokio::test]
    async fn test_sweep_task_exits_when_store_closed() {
        let store = shared(Duration::from_secs(1));
        let handle = spawn_sweep_task(Arc::clone(&store), Duration::from_millis(20));

        store.lock().take();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished(), "task should exit once the store is gone");
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_stopped() {
        let store = shared(Duration::from_secs(1));
        let handle = spawn_sweep_task(store, Duration::from_secs(60));

        handle.stop();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(handle.is_finished(), "task should be finished after stop");
    }
}
