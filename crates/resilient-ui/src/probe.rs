// Probe - Bounded condition checks against the target
//
// A probe polls the target until a condition holds or its timeout expires.
// Expiry is an ordinary `found: false` result, never an error: on a page that
// renders asynchronously, "not yet" and "broken" must stay distinguishable.
//
// Every poll is itself bounded by `max(remaining, quantum)`, so a probe
// returns within `timeout + quantum` even if the target stops answering.

use crate::error::{Error, Result};
use crate::logger::{Logger, NullLogger};
use crate::target::{Locator, Target};
use regex::Regex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// State an element is awaited to reach
#[derive(Debug, Clone)]
pub enum Condition {
    /// Attached and rendered with a non-empty box
    Visible,
    /// Not visible, including detached
    Hidden,
    /// Present in the DOM, visible or not
    Attached,
    /// Absent from the DOM
    Detached,
    /// Visible and enabled
    Enabled,
    /// Text content contains the string (case-insensitive)
    TextContains(String),
    /// Text content matches the pattern
    TextMatches(Regex),
}

impl Condition {
    /// Builds a [`Condition::TextMatches`] from a pattern string.
    pub fn text_matches(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Condition::TextMatches)
            .map_err(|e| Error::InvalidArgument(format!("Invalid regex: {}", e)))
    }

    /// Queries the target once.
    pub async fn holds(&self, target: &dyn Target, selector: &str) -> Result<bool> {
        match self {
            Condition::Visible => target.is_visible(selector).await,
            Condition::Hidden => target.is_visible(selector).await.map(|v| !v),
            Condition::Attached => target.count(selector).await.map(|n| n > 0),
            Condition::Detached => target.count(selector).await.map(|n| n == 0),
            Condition::Enabled => {
                Ok(target.is_visible(selector).await? && target.is_enabled(selector).await?)
            }
            Condition::TextContains(expected) => {
                let text = target.text_content(selector).await?.unwrap_or_default();
                Ok(text.to_lowercase().contains(&expected.to_lowercase()))
            }
            Condition::TextMatches(re) => {
                let text = target.text_content(selector).await?.unwrap_or_default();
                Ok(re.is_match(text.trim()))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Condition::Visible => "visible".to_string(),
            Condition::Hidden => "hidden".to_string(),
            Condition::Attached => "attached".to_string(),
            Condition::Detached => "detached".to_string(),
            Condition::Enabled => "enabled".to_string(),
            Condition::TextContains(text) => format!("containing text '{}'", text),
            Condition::TextMatches(re) => format!("matching /{}/", re.as_str()),
        }
    }
}

/// Polling schedule: fixed interval or multiplicative backoff up to a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polling {
    initial: Duration,
    factor: u32,
    max: Duration,
}

impl Polling {
    /// Polls every `interval`.
    pub const fn fixed(interval: Duration) -> Self {
        Self {
            initial: interval,
            factor: 1,
            max: interval,
        }
    }

    /// Starts at `initial`, multiplies by `factor` after each poll, never exceeds `max`.
    pub fn backoff(initial: Duration, factor: u32, max: Duration) -> Self {
        Self {
            initial,
            factor: factor.max(1),
            max: max.max(initial),
        }
    }

    pub fn initial(&self) -> Duration {
        self.initial
    }

    /// Longest single pause between polls; the overshoot bound of a probe.
    pub fn quantum(&self) -> Duration {
        self.max
    }

    pub fn next(&self, current: Duration) -> Duration {
        current.saturating_mul(self.factor).min(self.max)
    }
}

impl Default for Polling {
    fn default() -> Self {
        Self::fixed(DEFAULT_POLL_INTERVAL)
    }
}

/// Outcome of one bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    pub found: bool,
    pub elapsed: Duration,
}

impl ProbeResult {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

/// Bounded, non-throwing condition checks against a target.
#[derive(Clone)]
pub struct Probe {
    target: Arc<dyn Target>,
    polling: Polling,
    logger: Arc<dyn Logger>,
}

impl Probe {
    pub fn new(target: Arc<dyn Target>) -> Self {
        Self {
            target,
            polling: Polling::default(),
            logger: Arc::new(NullLogger),
        }
    }

    pub fn with_polling(mut self, polling: Polling) -> Self {
        self.polling = polling;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn polling(&self) -> Polling {
        self.polling
    }

    pub fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    /// Waits until `condition` holds for `locator` or `timeout` elapses.
    pub async fn check(
        &self,
        locator: &Locator,
        condition: &Condition,
        timeout: Duration,
    ) -> ProbeResult {
        let target = &self.target;
        let selector = locator.selector();
        let result = self
            .until(timeout, move || condition.holds(target.as_ref(), selector))
            .await;

        if result.found {
            self.logger.debug(&format!(
                "{} became {} after {}ms",
                locator,
                condition.describe(),
                result.elapsed_ms()
            ));
        } else {
            self.logger.debug(&format!(
                "{} not {} within {:?}",
                locator,
                condition.describe(),
                timeout
            ));
        }
        result
    }

    /// Polls an arbitrary predicate with the same bounds as [`Probe::check`].
    ///
    /// Predicate errors count as "not yet".
    pub async fn until<F, Fut>(&self, timeout: Duration, mut predicate: F) -> ProbeResult
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        let start = Instant::now();
        let quantum = self.polling.quantum();
        let mut interval = self.polling.initial();

        loop {
            let remaining = timeout.saturating_sub(start.elapsed());
            let holds = match tokio::time::timeout(remaining.max(quantum), predicate()).await {
                Ok(Ok(holds)) => holds,
                Ok(Err(e)) => {
                    self.logger.debug(&format!("poll failed, treating as not ready: {}", e));
                    false
                }
                Err(_) => false,
            };

            if holds {
                return ProbeResult {
                    found: true,
                    elapsed: start.elapsed(),
                };
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return ProbeResult {
                    found: false,
                    elapsed,
                };
            }

            // Wait before next poll
            tokio::time::sleep(interval.min(timeout - elapsed)).await;
            interval = self.polling.next(interval);
        }
    }
}
