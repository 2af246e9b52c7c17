//! resilient-ui: Bounded probes, retries and fallback selectors for UI automation
//!
//! Drives a slow or flaky web page through a small capability interface
//! ([`Target`]) without ever blocking forever and without throwing on the
//! ordinary "element not there yet" case.
//!
//! # Examples
//!
//! ## Tolerant action with retry
//!
//! ```ignore
//! use resilient_ui::{Action, Executor, Locator, RetryPolicy, Settings};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run(target: Arc<dyn resilient_ui::Target>) {
//! let executor = Executor::new(target, Settings::from_env().unwrap_or_default());
//! let add = Locator::new("#addNewRecordButton");
//!
//! let outcome = executor
//!     .perform_with_retry(&add, &Action::Click, Duration::from_secs(3), RetryPolicy::default())
//!     .await;
//! if !outcome.succeeded {
//!     println!("gave up after {} attempts: {:?}", outcome.attempts, outcome.last_error);
//! }
//! # }
//! ```
//!
//! ## Page objects and test cases
//!
//! ```ignore
//! use resilient_ui::harness::{CaseOptions, run_case};
//! use resilient_ui::pages::WebTablesPage;
//! use resilient_ui::{DataFactory, Executor, PlaywrightTarget, Settings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> resilient_ui::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let target = Arc::new(PlaywrightTarget::launch(&settings).await?);
//!     let executor = Arc::new(Executor::new(target, settings));
//!     let factory = DataFactory::new();
//!
//!     run_case(executor, "add user", CaseOptions::default(), |executor| async move {
//!         let page = WebTablesPage::new(executor);
//!         page.navigate().await;
//!         let user = factory.random_user();
//!         page.add_user(&user).await;
//!         page.search(&user.first_name).await;
//!         let found = page.contains_user(&user.search_terms()).await;
//!         println!("user found: {}", found);
//!         Ok(())
//!     })
//!     .await
//!     .into_result()?;
//!     Ok(())
//! }
//! ```

mod action;
mod artifacts;
mod config;
mod data;
mod error;
mod executor;
pub mod harness;
mod logger;
pub mod pages;
mod probe;
mod resolver;
mod retry;
mod target;

#[cfg(feature = "playwright")]
mod playwright;

// Re-export error types
pub use error::{Error, ErrorInfo, ErrorKind, Result};

// Re-export the capability interface
pub use target::{Locator, Target, WaitUntil};

// Re-export probing, actions and retry
pub use action::{Action, ActionOutcome, DEFAULT_TYPE_DELAY};
pub use probe::{Condition, DEFAULT_POLL_INTERVAL, Polling, Probe, ProbeResult};
pub use resolver::{check_all, resolve_any, resolve_first_matching};
pub use retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, RetryPolicy};

// Re-export the executor and its configuration
pub use config::{DEFAULT_ARTIFACT_DIR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, Settings};
pub use executor::Executor;

// Re-export logging
pub use logger::{Logger, MemoryLogger, NullLogger, TracingLogger};

// Re-export test data and artifacts
pub use artifacts::{
    artifact_timestamp, save_screenshot, save_trace, screenshot_file_name, trace_file_name,
};
pub use data::{
    ClockIds, Credentials, DEPARTMENTS, DataFactory, IdSource, SequentialIds, UserRecord,
    UserUpdate, ValidationSet,
};

#[cfg(feature = "playwright")]
pub use playwright::PlaywrightTarget;
