//! Bounded retry with linear backoff
//!
//! A reusable retrying executor: fixed attempt budget, linearly growing
//! delay between attempts, and a shutdown receiver raced against every
//! backoff sleep so cancellation never waits out the full window. Only
//! transient errors are retried; permanent ones return immediately.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::shutdown::Shutdown;

/// Classifies errors into retryable and not
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Attempt budget and backoff shape
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay grows linearly: `base_delay * attempt` after the n-th failure
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after the given failed attempt (1-based). Non-decreasing.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Run `op` until it succeeds, returns a permanent error, exhausts the
/// attempt budget, or shutdown is requested mid-backoff.
pub async fn with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    shutdown: &Shutdown,
    mut op: F,
) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    "transient failure (attempt {}/{}): {}",
                    attempt, policy.max_attempts, e
                );
                let mut sd = shutdown.clone();
                if sd.is_triggered() {
                    return Err(e);
                }
                tokio::select! {
                    _ = tokio::time::sleep(policy.delay(attempt)) => {}
                    _ = sd.wait() => return Err(e),
                }
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct TestError {
        transient: bool,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "test error (transient: {})", self.transient)
        }
    }

    impl Transient for TestError {
        fn is_transient(&self) -> bool {
            self.transient
        }
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    /// An op that fails transiently `failures` times, then succeeds
    fn flaky(failures: u32) -> (Arc<AtomicU32>, impl FnMut() -> std::pin::Pin<Box<dyn Future<Output = Result<u32, TestError>> + Send>>) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let op = move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if n < failures {
                    Err(TestError { transient: true })
                } else {
                    Ok(n)
                }
            }) as std::pin::Pin<Box<dyn Future<Output = Result<u32, TestError>> + Send>>
        };
        (calls, op)
    }

    #[test]
    fn backoff_is_non_decreasing() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let delays: Vec<Duration> = (1..5).map(|n| policy.delay(n)).collect();
        assert_eq!(delays[0], Duration::from_secs(1));
        assert_eq!(delays[3], Duration::from_secs(4));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn succeeds_within_the_attempt_budget() {
        let (calls, op) = flaky(4);
        let result = with_retry(&fast_policy(5), &Shutdown::never(), op).await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let (calls, op) = flaky(5);
        let result = with_retry(&fast_policy(5), &Shutdown::never(), op).await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5, "exactly max_attempts calls");
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let result: Result<(), TestError> =
            with_retry(&fast_policy(5), &Shutdown::never(), move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err(TestError { transient: false }) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_cuts_the_backoff_short() {
        let (handle, shutdown) = shutdown::channel();
        // Long enough that only early exit lets the test finish promptly
        let policy = RetryPolicy::new(5, Duration::from_secs(3600));
        let (calls, op) = flaky(10);

        handle.trigger();
        let started = std::time::Instant::now();
        let result = with_retry(&policy, &shutdown, op).await;
        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
