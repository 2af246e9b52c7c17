// Retry - Fixed-delay re-invocation of fallible operations
//
// Attempts run strictly one after another. The delay is only slept between a
// failure and the next attempt, so one attempt never waits and `n` failing
// attempts cost exactly `(n - 1) * delay`.

use crate::logger::Logger;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts (one try plus one retry)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default delay between attempts (500ms)
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// How many times to attempt an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` of zero is treated as one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no delay.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number. Returns the first success,
    /// or the error of the last attempt.
    pub async fn run<T, E, F, Fut>(&self, logger: &dyn Logger, label: &str, op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_counted(logger, label, op).await.0
    }

    /// Like [`RetryPolicy::run`], also returning how many attempts were made.
    pub async fn run_counted<T, E, F, Fut>(
        &self,
        logger: &dyn Logger,
        label: &str,
        mut op: F,
    ) -> (Result<T, E>, u32)
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut attempt = 1;
        loop {
            logger.debug(&format!(
                "{}: attempt {}/{}",
                label, attempt, self.max_attempts
            ));

            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        logger.info(&format!("{}: succeeded on attempt {}", label, attempt));
                    }
                    return (Ok(value), attempt);
                }
                Err(e) => {
                    if attempt >= self.max_attempts {
                        if self.max_attempts > 1 {
                            logger.warn(&format!(
                                "{}: all {} attempts failed, last error: {}",
                                label, self.max_attempts, e
                            ));
                        }
                        return (Err(e), attempt);
                    }
                    logger.warn(&format!(
                        "{}: attempt {} failed: {}; retrying in {:?}",
                        label, attempt, e, self.delay
                    ));
                }
            }

            tokio::time::sleep(self.delay).await;
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}
