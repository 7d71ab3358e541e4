use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::domain::DomainError;

/// Timeout and retry rules around a single external model call.
///
/// Each attempt is bounded by `attempt_timeout`. Transient failures (see
/// [`DomainError::is_transient`]) are retried up to `max_retries` times, each
/// after `base_delay` plus a random jitter in `0..=max_jitter`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    attempt_timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(20),
            max_retries: 1,
            base_delay: Duration::from_millis(250),
            max_jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempt_timeout: Duration, max_retries: u32) -> Self {
        Self {
            attempt_timeout,
            max_retries,
            ..Self::default()
        }
    }

    /// Single attempt, no retry.
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self::new(attempt_timeout, 0)
    }

    pub fn with_backoff(mut self, base_delay: Duration, max_jitter: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_jitter = max_jitter;
        self
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Longest time [`run`](Self::run) can take: every attempt timing out,
    /// each retry waiting the full backoff.
    pub fn worst_case(&self) -> Duration {
        let attempts = self.max_retries + 1;
        self.attempt_timeout * attempts + (self.base_delay + self.max_jitter) * self.max_retries
    }

    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut retries = 0;
        loop {
            let outcome = match tokio::time::timeout(self.attempt_timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(DomainError::ModelTimeout(self.attempt_timeout)),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && retries < self.max_retries => {
                    retries += 1;
                    let delay = self.backoff_delay();
                    warn!(
                        "Model call failed ({}), retry {}/{} in {}ms",
                        e,
                        retries,
                        self.max_retries,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn backoff_delay(&self) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ms)
        };
        self.base_delay + Duration::from_millis(jitter)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(100), max_retries)
            .with_backoff(Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn worst_case_covers_every_attempt_and_backoff() {
        let policy = RetryPolicy::new(Duration::from_secs(20), 1)
            .with_backoff(Duration::from_millis(250), Duration::from_millis(250));
        assert_eq!(policy.worst_case(), Duration::from_millis(40_500));

        assert_eq!(
            RetryPolicy::no_retry(Duration::from_secs(5)).worst_case(),
            Duration::from_secs(5)
        );
    }

    #[tokio::test]
    async fn success_is_returned_without_retry() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = fast_policy(1)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, DomainError>("hello")
            })
            .await;

        assert_eq!(result.unwrap(), "hello");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result = fast_policy(1)
            .run(move || async move {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt == 0 {
                    Err(DomainError::transport("connection reset"))
                } else {
                    Ok("recovered")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = fast_policy(1)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::ModelRejected {
                    status: 503,
                    message: "overloaded".into(),
                })
            })
            .await;

        assert!(matches!(result, Err(DomainError::ModelRejected { status: 503, .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permanent_failure_is_not_retried() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let result: Result<(), _> = fast_policy(3)
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(DomainError::EmptyModelResponse)
            })
            .await;

        assert!(matches!(result, Err(DomainError::EmptyModelResponse)));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_attempt_times_out() {
        let policy = RetryPolicy::no_retry(Duration::from_millis(20));
        let result = policy
            .run(move || async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, DomainError>(())
            })
            .await;

        assert!(matches!(result, Err(DomainError::ModelTimeout(_))));
    }

    #[test]
    fn backoff_stays_within_jitter_bounds() {
        let policy = RetryPolicy::default()
            .with_backoff(Duration::from_millis(100), Duration::from_millis(50));
        for _ in 0..50 {
            let delay = policy.backoff_delay();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(150));
        }
    }
}
