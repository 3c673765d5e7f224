//! Retry policy and driver for model calls.
//!
//! Kept separate from the HTTP client so the attempt budget and backoff
//! growth can be exercised against fake operations with tokio's paused
//! clock — no network involved.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::LlmError;

/// Bounded-retry policy: total attempt budget plus the base backoff unit.
///
/// The delay inserted before attempt k+1 is `base_delay * 2^k`, so with the
/// default one-second unit the sequence is 2s before attempt 2 and 4s before
/// attempt 3. No delay ever precedes the first attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff inserted after `completed` attempts have failed.
    pub fn backoff_after(&self, completed: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(completed)
    }
}

/// Drives `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget runs out. `op` receives the 1-based attempt number.
///
/// Terminal exhaustion is surfaced as a single aggregated
/// [`LlmError::Exhausted`] naming the attempt count and last cause, so
/// callers never need per-attempt detail to decide what to do next.
///
/// The sleep between attempts is this call's own `tokio::time::sleep`; it
/// holds no lock, and dropping the returned future cancels it, so callers
/// can abort at any attempt boundary.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 1..=policy.max_attempts {
        if attempt > 1 {
            let delay = policy.backoff_after(attempt - 1);
            warn!(
                "LLM call attempt {} failed, retrying after {}ms...",
                attempt - 1,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(LlmError::Exhausted {
        attempts: policy.max_attempts,
        last: Box::new(last_error.unwrap_or(LlmError::EmptyContent)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overloaded() -> LlmError {
        LlmError::Api {
            status: 529,
            message: "overloaded".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_backend_stops_after_exactly_three_attempts() {
        let policy = RetryPolicy::default();
        let mut calls = 0u32;

        let result: Result<(), LlmError> = run_with_retry(&policy, |_| {
            calls += 1;
            async { Err(overloaded()) }
        })
        .await;

        assert_eq!(calls, 3);
        match result {
            Err(LlmError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, LlmError::Api { status: 529, .. }));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_final_attempt_is_returned() {
        let policy = RetryPolicy::default();
        let mut calls = 0u32;

        let result = run_with_retry(&policy, |attempt| {
            calls += 1;
            async move {
                if attempt < 3 {
                    Err(overloaded())
                } else {
                    Ok("tailored")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "tailored");
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_after_one_failure_makes_no_further_attempts() {
        let policy = RetryPolicy::default();
        let mut calls = 0u32;

        let result = run_with_retry(&policy, |attempt| {
            calls += 1;
            async move {
                if attempt == 1 {
                    Err(LlmError::EmptyContent)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_aborts_on_first_attempt() {
        let policy = RetryPolicy::default();
        let mut calls = 0u32;

        let result: Result<(), LlmError> = run_with_retry(&policy, |_| {
            calls += 1;
            async {
                Err(LlmError::Api {
                    status: 401,
                    message: "invalid x-api-key".to_string(),
                })
            }
        })
        .await;

        assert_eq!(calls, 1);
        assert!(matches!(result, Err(LlmError::Api { status: 401, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_absent_before_first_attempt_and_doubles_between_retries() {
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();
        let mut stamps: Vec<Duration> = Vec::new();

        let _: Result<(), LlmError> = run_with_retry(&policy, |_| {
            stamps.push(start.elapsed());
            async { Err(overloaded()) }
        })
        .await;

        assert_eq!(stamps.len(), 3);
        assert_eq!(stamps[0], Duration::ZERO);

        let before_second = stamps[1] - stamps[0];
        let before_third = stamps[2] - stamps[1];
        assert_eq!(before_second, Duration::from_secs(2));
        assert_eq!(before_third, Duration::from_secs(4));
        assert!(before_second < before_third);
    }

    #[test]
    fn test_backoff_schedule_is_exponential() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_after(3), Duration::from_secs(8));
    }
}
