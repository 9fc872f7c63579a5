/// Retry handling for job execution
///
/// Implements exponential backoff with a bounded attempt budget.
use std::time::Duration;
use tokio::time::sleep;

use crate::config::RetrySettings;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Initial delay between retries
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Maximum number of attempts (first try included)
    pub max_attempts: usize,
    /// Backoff multiplier (2.0 for exponential)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: 5,
            backoff_multiplier: 2.0,
        }
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_secs(settings.max_delay_secs),
            max_attempts: settings.max_attempts,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Calculate delay for a given attempt number
    pub fn calculate_delay(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(0);
        }

        let delay_ms = (self.initial_delay.as_millis() as f64)
            * self.backoff_multiplier.powi((attempt - 1) as i32);

        let delay = Duration::from_millis(delay_ms as u64);

        // Cap at max delay
        if delay > self.max_delay {
            self.max_delay
        } else {
            delay
        }
    }
}

/// Retry handler for async operations
pub struct RetryHandler {
    config: RetryConfig,
}

/// Outcome of a retried operation: the error that ended it plus how many
/// attempts were spent.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub error: E,
    pub attempts: usize,
}

impl RetryHandler {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Execute `operation` until it succeeds, returns a non-retryable
    /// error, or the attempt budget runs out. `retryable` classifies
    /// errors; a non-retryable error stops immediately.
    pub async fn execute<F, Fut, T, E>(
        &self,
        operation: F,
        retryable: fn(&E) -> bool,
    ) -> Result<T, Exhausted<E>>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let attempt_budget = self.config.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 0..attempt_budget {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let stop = !retryable(&e);
                    last_error = Some(e);

                    if stop {
                        return Err(Exhausted {
                            error: last_error.unwrap(),
                            attempts: attempt + 1,
                        });
                    }

                    // Don't delay after the last attempt
                    if attempt < attempt_budget - 1 {
                        let delay = self.config.calculate_delay(attempt + 1);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_attempts = attempt_budget,
                            delay_ms = delay.as_millis() as u64,
                            "Job attempt failed; backing off"
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(Exhausted {
            error: last_error.expect("at least one attempt was made"),
            attempts: attempt_budget,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn always_retryable(_: &String) -> bool {
        true
    }

    #[test]
    fn test_calculate_delay_exponential() {
        let config = RetryConfig {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            max_attempts: 3,
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.calculate_delay(1), Duration::from_millis(100));
        assert_eq!(config.calculate_delay(2), Duration::from_millis(200));
        assert_eq!(config.calculate_delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_calculate_delay_caps_at_max() {
        let config = RetryConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            max_attempts: 10,
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.calculate_delay(10), Duration::from_secs(5));
    }

    fn fast_handler(max_attempts: usize) -> RetryHandler {
        RetryHandler::new(RetryConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            max_attempts,
            backoff_multiplier: 2.0,
        })
    }

    #[tokio::test]
    async fn test_succeeds_first_attempt() {
        let handler = fast_handler(3);
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();

        let result = handler
            .execute(
                move || {
                    let count = count.clone();
                    async move {
                        count.fetch_add(1, Ordering::SeqCst);
                        Ok::<i32, String>(42)
                    }
                },
                always_retryable,
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let handler = fast_handler(5);
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();

        let result = handler
            .execute(
                move || {
                    let count = count.clone();
                    async move {
                        let current = count.fetch_add(1, Ordering::SeqCst) + 1;
                        if current < 3 {
                            Err("temporary error".to_string())
                        } else {
                            Ok(42)
                        }
                    }
                },
                always_retryable,
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let handler = fast_handler(3);
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();

        let result = handler
            .execute(
                move || {
                    let count = count.clone();
                    async move {
                        count.fetch_add(1, Ordering::SeqCst);
                        Err::<i32, String>("permanent error".to_string())
                    }
                },
                always_retryable,
            )
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.error, "permanent error");
        assert_eq!(exhausted.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let handler = fast_handler(5);
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();

        let result = handler
            .execute(
                move || {
                    let count = count.clone();
                    async move {
                        count.fetch_add(1, Ordering::SeqCst);
                        Err::<i32, String>("bad address".to_string())
                    }
                },
                |_| false,
            )
            .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
