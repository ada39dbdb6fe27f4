//! crates/legitmind_core/src/retry.rs
//!
//! A generic bounded-retry wrapper applied uniformly to every Gateway
//! operation, parameterized by attempt count and a fixed inter-attempt delay.

use crate::ports::{GatewayError, GatewayResult};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Bounds on how often and how quickly a Gateway call is re-attempted.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between consecutive attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }
}

/// Runs `operation` up to `policy.max_attempts` times, sleeping
/// `policy.delay` between attempts.
///
/// Non-transient errors (bad input) fail immediately. When the attempt
/// budget is exhausted the caller receives [`GatewayError::Overloaded`],
/// deliberately distinct from whatever the last underlying failure was.
pub async fn call_with_retry<T, F, Fut>(policy: &RetryPolicy, operation: F) -> GatewayResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) => {
                warn!(attempt, max_attempts = attempts, error = %err, "model call failed");
                if attempt < attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }
    Err(GatewayError::Overloaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_failures() {
        let calls = AtomicU32::new(0);
        let result = call_with_retry(&policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(GatewayError::InvocationFailed("503".into()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_reports_overloaded_after_three_attempts() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result: GatewayResult<()> = call_with_retry(&policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GatewayError::InvocationFailed("boom".into())) }
        })
        .await;

        assert!(matches!(result, Err(GatewayError::Overloaded)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two inter-attempt delays of 1000ms each.
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: GatewayResult<()> = call_with_retry(&policy(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GatewayError::EmptyInput) }
        })
        .await;

        assert!(matches!(result, Err(GatewayError::EmptyInput)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_output_is_retried_as_transient() {
        let calls = AtomicU32::new(0);
        let result = call_with_retry(&policy(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(GatewayError::OutputInvalid("missing field".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
