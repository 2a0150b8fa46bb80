//! Per-call execution context
//!
//! Every storage operation runs under a [`CallContext`] carrying an optional
//! deadline and a cancellation token. When either fires first, the storage
//! future is dropped, which aborts the in-flight statement and rolls back an
//! open transaction.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::errors::{Result, ShortcutError};

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// No deadline; can still be cancelled through [`cancel_token`](Self::cancel_token).
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: CancellationToken::new(),
        }
    }

    /// Share an existing token, e.g. one per request or one per process shutdown.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drive `operation` to completion unless the deadline elapses or the
    /// context is cancelled first.
    pub async fn run<T, Fut>(&self, operation_name: &str, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ShortcutError::cancelled(format!(
                "Operation '{}' cancelled before it started",
                operation_name
            )));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("Operation '{}' cancelled", operation_name);
                Err(ShortcutError::cancelled(format!(
                    "Operation '{}' cancelled",
                    operation_name
                )))
            }
            _ = deadline => {
                warn!("Operation '{}' exceeded its deadline", operation_name);
                Err(ShortcutError::deadline_exceeded(format!(
                    "Operation '{}' exceeded its deadline",
                    operation_name
                )))
            }
            result = operation => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes_in_time() {
        let ctx = CallContext::with_timeout(Duration::from_secs(5));
        let value = ctx.run("fast", async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_run_passes_errors_through() {
        let ctx = CallContext::background();
        let result: Result<()> = ctx
            .run("failing", async { Err(ShortcutError::id_not_found("gone")) })
            .await;
        assert!(matches!(result, Err(ShortcutError::IdNotFound(_))));
    }

    #[tokio::test]
    async fn test_run_deadline_exceeded() {
        let ctx = CallContext::with_timeout(Duration::from_millis(10));
        let result = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ShortcutError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_run_already_elapsed_deadline() {
        let ctx = CallContext::with_deadline(Instant::now());
        tokio::time::sleep(Duration::from_millis(1)).await;
        let result = ctx
            .run("late", async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(ShortcutError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_run_cancelled_before_start() {
        let ctx = CallContext::background();
        ctx.cancel();
        let result = ctx.run("never", async { Ok(1) }).await;
        assert!(matches!(result, Err(ShortcutError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_run_cancelled_while_running() {
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_cancel_token(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let result = ctx
            .run("blocked", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        canceller.await.unwrap();
        assert!(matches!(result, Err(ShortcutError::Cancelled(_))));
    }
}
