//! Cancellation Context
//!
//! Carries a caller-supplied deadline and cancellation signal into every
//! store round-trip and lock acquisition.

use std::future::{pending, Future};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{StoreError, StoreResult};

// == Context ==
/// Deadline and cancellation token accompanying a cache call.
///
/// Cloning is cheap; clones observe the same cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Fires the cancellation signal of the [`Context`] it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancels every in-flight and future call made with the paired context.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that never cancels and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Tightens the deadline to at most `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(candidate),
            None => candidate,
        });
        self
    }

    /// Attaches a fresh cancellation signal, replacing any previous one.
    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx })
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the paired [`CancelHandle`] has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Drives `fut` until it completes, the context is cancelled, or the
    /// deadline passes. On cancellation `fut` is dropped along with any
    /// guard it holds.
    pub(crate) async fn run<T, F>(&self, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        if self.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(StoreError::DeadlineExceeded);
        }

        tokio::select! {
            res = fut => res,
            _ = wait_cancelled(self.cancel.clone()) => Err(StoreError::Cancelled),
            _ = wait_deadline(self.deadline) => Err(StoreError::DeadlineExceeded),
        }
    }
}

async fn wait_cancelled(rx: Option<watch::Receiver<bool>>) {
    if let Some(mut rx) = rx {
        let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
        if fired {
            return;
        }
    }
    // No handle, or the handle was dropped without cancelling
    pending::<()>().await
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = Context::background();
        let value = ctx.run(async { Ok::<_, StoreError>(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_before_run() {
        let (ctx, handle) = Context::background().with_cancel();
        handle.cancel();
        assert!(ctx.is_cancelled());

        let result = ctx.run(async { Ok::<_, StoreError>(()) }).await;
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_future() {
        let (ctx, handle) = Context::background().with_cancel();

        let task = tokio::spawn(async move {
            ctx.run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, StoreError>(())
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(StoreError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (ctx, handle) = Context::background().with_cancel();
        drop(handle);

        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok::<_, StoreError>("done")
            })
            .await;
        assert_eq!(result.unwrap(), "done");
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = Context::with_timeout(Duration::from_millis(50));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, StoreError>(())
            })
            .await;
        assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_only_tightens() {
        let ctx = Context::with_timeout(Duration::from_secs(1));
        let first = ctx.deadline().unwrap();

        let looser = ctx.clone().timeout(Duration::from_secs(10));
        assert_eq!(looser.deadline().unwrap(), first);

        let tighter = ctx.timeout(Duration::from_millis(100));
        assert!(tighter.deadline().unwrap() < first);
    }
}
