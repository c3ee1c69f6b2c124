use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Indicates whether an error should be retried or treated as final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retry,
    Stop,
}

/// Why an operation run under the retry policy gave up.
#[derive(Debug, PartialEq)]
pub enum RetryError<E> {
    /// The error was classified as not retryable.
    Fatal(E),
    /// The error was retryable, but the configured attempts were exhausted.
    AttemptsExceeded(E),
}

impl<E> RetryError<E> {
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Fatal(err) | RetryError::AttemptsExceeded(err) => err,
        }
    }
}

/// Final result of [`RetryPolicy::run`] and the number of attempts it took.
#[derive(Debug)]
pub struct Retried<T, E> {
    pub result: Result<T, RetryError<E>>,
    pub attempts: usize,
}

impl<T, E> Retried<T, E> {
    pub fn retries(&self) -> usize {
        self.attempts.saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: if max_delay.is_zero() {
                base_delay
            } else {
                max_delay
            },
        }
    }

    /// Exactly one attempt, no backoff.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff starting at `base_delay`, capped at 32x the base.
    pub fn exponential(max_attempts: usize, base_delay: Duration) -> Self {
        Self::new(max_attempts, base_delay, base_delay.saturating_mul(32))
    }

    /// Executes the operation with the configured retry policy.
    pub async fn run<F, Fut, T, E, Classifier>(
        &self,
        mut op: F,
        classify: Classifier,
    ) -> Retried<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Classifier: Fn(&E) -> RetryDisposition,
    {
        let mut attempt = 0;

        loop {
            let result = op().await;
            let attempts = attempt + 1;

            let err = match result {
                Ok(value) => {
                    return Retried {
                        result: Ok(value),
                        attempts,
                    };
                }
                Err(err) => err,
            };

            match classify(&err) {
                RetryDisposition::Stop => {
                    return Retried {
                        result: Err(RetryError::Fatal(err)),
                        attempts,
                    };
                }
                RetryDisposition::Retry if attempts >= self.max_attempts => {
                    return Retried {
                        result: Err(RetryError::AttemptsExceeded(err)),
                        attempts,
                    };
                }
                RetryDisposition::Retry => {
                    sleep(self.backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    fn backoff_delay(&self, attempt: usize) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::from_millis(0);
        }

        let factor = 1u128 << attempt.min(6);
        let base_ms = self.base_delay.as_millis();
        let delay_ms = base_ms.saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis());
        Duration::from_millis(capped as u64)
    }
}
