//! Operation Context
//!
//! Carries the caller's deadline and cancellation signal into service
//! operations. Store calls are raced against both; cache-only paths never
//! look at the context.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

use crate::error::StoreError;

/// Deadline and cancellation signal for one operation.
///
/// Cloning is cheap; clones share the same cancel signal.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every context derived from the pair it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    /// A context cancelled through the returned handle.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: None,
            cancel: Some(rx),
        };
        (ctx, CancelHandle { tx })
    }

    /// Derives a context sharing this one's cancel signal whose deadline is
    /// the earlier of the parent's and `timeout` from now.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        Self {
            deadline: Some(self.deadline.map_or(deadline, |parent| parent.min(deadline))),
            cancel: self.cancel.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context is done, if it is.
    pub fn err(&self) -> Option<StoreError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(StoreError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StoreError::DeadlineExceeded);
        }
        None
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Completes when the context is cancelled or its deadline passes.
    /// Never completes for a background context.
    pub async fn done(&self) -> StoreError {
        tokio::select! {
            _ = Self::cancelled(self.cancel.clone()) => StoreError::Cancelled,
            _ = Self::expired(self.deadline) => StoreError::DeadlineExceeded,
        }
    }

    /// Runs `fut` unless the context finishes first.
    ///
    /// A context that is already done short-circuits without polling `fut`.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        tokio::select! {
            biased;
            err = self.done() => Err(err),
            result = fut => result,
        }
    }

    async fn cancelled(rx: Option<watch::Receiver<bool>>) {
        let Some(mut rx) = rx else {
            return pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // The handle is gone without cancelling; nothing can cancel us now.
                return pending().await;
            }
        }
    }

    async fn expired(deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => sleep_until(deadline).await,
            None => pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_future() {
        let ctx = Context::background();
        let result = ctx.run(async { Ok::<_, StoreError>(7) }).await;

        assert_eq!(result.unwrap(), 7);
        assert!(!ctx.is_done());
    }

    #[tokio::test]
    async fn test_deadline_aborts_slow_future() {
        let ctx = Context::with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
        assert!(ctx.is_done());
    }

    #[tokio::test]
    async fn test_cancel_aborts_pending_future() {
        let (ctx, handle) = Context::with_cancel();

        let runner = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.run(pending::<Result<(), StoreError>>()).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let result = runner.await.unwrap();
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    #[allow(unreachable_code)]
    async fn test_already_cancelled_does_not_poll() {
        let (ctx, handle) = Context::with_cancel();
        handle.cancel();

        let result = ctx
            .run(async {
                panic!("future must not be polled");
                Ok::<(), StoreError>(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_handle_never_cancels() {
        let (ctx, handle) = Context::with_cancel();
        drop(handle);

        assert!(ctx.err().is_none());
        let result = ctx.run(async { Ok::<_, StoreError>("done") }).await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test]
    async fn test_child_keeps_earlier_deadline_and_cancel() {
        let (parent, handle) = Context::with_cancel();
        let parent = parent.child_with_timeout(Duration::from_millis(30));
        let child = parent.child_with_timeout(Duration::from_secs(60));

        assert_eq!(child.deadline(), parent.deadline());

        handle.cancel();
        assert!(matches!(child.err(), Some(StoreError::Cancelled)));
    }
}
