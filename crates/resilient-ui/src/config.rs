// Settings - Run configuration with environment overrides
//
// Every option has a default; each may be overridden by an environment
// variable. Lookups go through a closure so tests never touch the process
// environment.

use crate::error::{Error, Result};
use crate::probe::{DEFAULT_POLL_INTERVAL, Polling};
use crate::retry::{DEFAULT_RETRY_DELAY, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default target origin
pub const DEFAULT_BASE_URL: &str = "https://demoqa.com";

/// Default bound for actions and navigation in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default directory for screenshots and traces
pub const DEFAULT_ARTIFACT_DIR: &str = "screenshots";

/// Options for a test run
///
/// Serialized field names are camelCase (`baseUrl`, `timeoutMs`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Target origin; relative navigation paths are joined onto it
    pub base_url: String,
    /// Default bound for actions, in milliseconds
    pub timeout_ms: u64,
    /// Default retry policy attempt count
    pub retries: u32,
    /// Run the browser without a display
    pub headless: bool,
    /// Artificial delay before every mutating action, in milliseconds
    pub slow_mo_ms: u64,
    /// Where screenshots and traces are written
    pub artifact_dir: PathBuf,
    /// Probe polling interval, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: 1,
            headless: true,
            slow_mo_ms: 0,
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl Settings {
    /// Creates Settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `BASE_URL`, `TIMEOUT`, `RETRIES`, `HEADLESS`,
    /// `SLOW_MO`, `SCREENSHOT_DIR` and `POLL_INTERVAL` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(base_url) = lookup("BASE_URL") {
            Url::parse(&base_url).map_err(|e| Error::Config {
                key: "BASE_URL".to_string(),
                message: e.to_string(),
            })?;
            settings.base_url = base_url;
        }
        if let Some(value) = lookup("TIMEOUT") {
            settings.timeout_ms = parse_number("TIMEOUT", &value)?;
        }
        if let Some(value) = lookup("RETRIES") {
            settings.retries = parse_number("RETRIES", &value)?;
        }
        if let Some(value) = lookup("HEADLESS") {
            settings.headless = parse_flag("HEADLESS", &value)?;
        }
        if let Some(value) = lookup("SLOW_MO") {
            settings.slow_mo_ms = parse_number("SLOW_MO", &value)?;
        }
        if let Some(dir) = lookup("SCREENSHOT_DIR") {
            settings.artifact_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("POLL_INTERVAL") {
            settings.poll_interval_ms = parse_number("POLL_INTERVAL", &value)?;
        }

        Ok(settings)
    }

    /// Set the target origin
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the default action bound
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the default attempt count
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the per-action artificial delay
    pub fn slow_mo(mut self, slow_mo: Duration) -> Self {
        self.slow_mo_ms = slow_mo.as_millis() as u64;
        self
    }

    /// Set the artifact directory
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn slow_mo_delay(&self) -> Duration {
        Duration::from_millis(self.slow_mo_ms)
    }

    pub fn polling(&self) -> Polling {
        Polling::fixed(Duration::from_millis(self.poll_interval_ms.max(1)))
    }

    /// Default retry policy: `retries` attempts, 500ms apart
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retries, DEFAULT_RETRY_DELAY)
    }

    /// Resolves `path` against `base_url`; absolute URLs pass through.
    pub fn resolve_url(&self, path: &str) -> Result<String> {
        if let Ok(absolute) = Url::parse(path) {
            return Ok(absolute.to_string());
        }
        let base = Url::parse(&self.base_url).map_err(|e| Error::Config {
            key: "base_url".to_string(),
            message: e.to_string(),
        })?;
        base.join(path)
            .map(|url| url.to_string())
            .map_err(|e| Error::InvalidArgument(format!("Cannot join '{}': {}", path, e)))
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| Error::Config {
        key: key.to_string(),
        message: format!("'{}' is not a number: {}", value, e),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::Config {
            key: key.to_string(),
            message: format!("'{}' is not a boolean", value),
        }),
    }
}
