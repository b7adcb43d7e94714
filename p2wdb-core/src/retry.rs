//! Bounded retry with a fixed delay between attempts.
//!
//! Only errors for which [`P2wdbError::is_recoverable`](crate::error::P2wdbError::is_recoverable) holds are retried;
//! everything else is returned on the first failure.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::constants::{RETRY_ATTEMPTS, RETRY_DELAY_MS};
use crate::error::Result;

/// Retry policy: how many attempts and how long to wait between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: RETRY_ATTEMPTS,
            delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and delay.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Runs `op` until it succeeds, fails with a non-recoverable error, or the
    /// attempts are exhausted. The last error is returned.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < attempts && e.is_recoverable() => {
                    warn!(label, attempt, attempts, error = %e, "Attempt failed, retrying");
                    if !self.delay.is_zero() {
                        sleep(self.delay).await;
                    }
                    attempt += 1;
                }
                Err(e) => {
                    if attempt > 1 {
                        warn!(label, attempt, error = %e, "Giving up");
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::P2wdbError;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn fast(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::ZERO)
    }

    async fn flaky(calls: &AtomicU32, failures: u32) -> Result<&'static str> {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= failures {
            Err(P2wdbError::HttpError(format!("attempt {} failed", n)))
        } else {
            Ok("done")
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts, 3);
        assert_eq!(policy.delay, Duration::from_millis(RETRY_DELAY_MS));
    }

    #[tokio::test]
    async fn test_succeeds_after_two_failures() {
        let calls = AtomicU32::new(0);
        let result = fast(3).run("flaky", || flaky(&calls, 2)).await;

        assert_eq!(assert_ok!(result), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_three_failures_surface_last_error() {
        let calls = AtomicU32::new(0);
        let result = fast(3).run("flaky", || flaky(&calls, 3)).await;

        let err = assert_err!(result);
        assert!(err.to_string().contains("attempt 3 failed"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_recoverable_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = fast(3)
            .run("funds", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(P2wdbError::InsufficientFunds("100 sats".into())) }
            })
            .await;

        assert!(matches!(result, Err(P2wdbError::InsufficientFunds(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_attempt_policy() {
        let calls = AtomicU32::new(0);
        let result = RetryPolicy::none().run("once", || flaky(&calls, 1)).await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result = fast(0).run("zero", || flaky(&calls, 0)).await;

        assert_ok!(result);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
