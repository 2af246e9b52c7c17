// Executor - Resilient actions against one target session
//
// Composes the probe, the action wrapper, retry and fallback resolution over a
// single `Target`. Helpers here never return transient or interaction errors
// to the caller: they return plain values (`bool`, `Option`, `ActionOutcome`)
// and append what went wrong to the executor's diagnostics.
//
// Mutating actions are serialized through an async gate, so two actions are
// never in flight against the same page even if callers join futures. Each
// action is bounded by its timeout, so a hung target releases the gate.
// Probes are read-only and may run concurrently.

use crate::action::{Action, ActionOutcome};
use crate::artifacts;
use crate::config::Settings;
use crate::error::{Error, ErrorInfo, Result};
use crate::logger::{Logger, TracingLogger};
use crate::probe::{Condition, Polling, Probe, ProbeResult};
use crate::resolver;
use crate::retry::RetryPolicy;
use crate::target::{Locator, Target, WaitUntil};
use futures_util::future::join_all;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const READY_STATE: &str = "document.readyState";

const PAGE_READY: &str = "document.readyState === 'complete' && document.body !== null && \
     !document.querySelector('.loading, .spinner, [class*=\"loading\"]')";

/// Performs UI actions against an unreliable, asynchronously rendering target.
pub struct Executor {
    target: Arc<dyn Target>,
    settings: Settings,
    logger: Arc<dyn Logger>,
    probe: Probe,
    action_gate: tokio::sync::Mutex<()>,
    diagnostics: Mutex<Vec<ErrorInfo>>,
}

impl Executor {
    /// Creates an executor logging through `tracing`.
    pub fn new(target: Arc<dyn Target>, settings: Settings) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger::default());
        let probe = Probe::new(Arc::clone(&target))
            .with_polling(settings.polling())
            .with_logger(Arc::clone(&logger));
        Self {
            target,
            settings,
            logger,
            probe,
            action_gate: tokio::sync::Mutex::new(()),
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.probe = self.probe.with_logger(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    pub fn with_polling(mut self, polling: Polling) -> Self {
        self.probe = self.probe.with_polling(polling);
        self
    }

    pub fn target(&self) -> &Arc<dyn Target> {
        &self.target
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    pub fn probe_handle(&self) -> &Probe {
        &self.probe
    }

    /// Default action bound from settings
    pub fn timeout(&self) -> Duration {
        self.settings.action_timeout()
    }

    // ------------------------------------------------------------------
    // Diagnostics and assertions
    // ------------------------------------------------------------------

    /// Records a non-fatal error and logs it at `warn`.
    pub fn record(&self, err: &Error) {
        self.logger.warn(&err.to_string());
        self.diagnostics.lock().push(err.info());
    }

    /// Snapshot of every non-fatal error recorded so far
    pub fn diagnostics(&self) -> Vec<ErrorInfo> {
        self.diagnostics.lock().clone()
    }

    /// Fails with an assertion error when `condition` is false.
    pub fn assert_that(&self, condition: bool, message: impl Into<String>) -> Result<()> {
        if condition {
            Ok(())
        } else {
            let message = message.into();
            self.logger.error(&format!("assertion failed: {}", message));
            Err(Error::Assertion(message))
        }
    }

    // ------------------------------------------------------------------
    // Navigation and page state
    // ------------------------------------------------------------------

    /// Navigates to `path` (joined onto `base_url` unless absolute).
    pub async fn navigate(&self, path: &str, wait_until: WaitUntil) -> Result<()> {
        self.navigate_with_timeout(path, wait_until, self.timeout())
            .await
    }

    pub async fn navigate_with_timeout(
        &self,
        path: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<()> {
        let url = self.settings.resolve_url(path)?;
        self.logger.info(&format!("Navigating to {}", url));
        self.target
            .navigate(&url, wait_until, timeout)
            .await
            .map_err(|e| e.context(format!("navigate to {}", url)))
    }

    /// Waits for the document to reach `state`; `false` on expiry.
    pub async fn wait_for_load(&self, state: WaitUntil, timeout: Duration) -> bool {
        let target = &self.target;
        let result = self
            .probe
            .until(timeout, move || async move {
                let ready_state = target.evaluate(READY_STATE).await?;
                Ok::<_, Error>(state.satisfied_by(&ready_state))
            })
            .await;

        if result.found {
            self.logger.info("Page loaded");
        } else {
            self.record(&Error::Timeout(format!(
                "page did not reach {:?} within {:?}, continuing",
                state, timeout
            )));
        }
        result.found
    }

    /// Document complete, body present, no loading indicators.
    pub async fn is_page_ready(&self) -> bool {
        match self.target.evaluate(PAGE_READY).await {
            Ok(value) => {
                let ready = value == "true";
                self.logger.info(&format!("Page ready: {}", ready));
                ready
            }
            Err(e) => {
                self.record(&e.context("page readiness check"));
                false
            }
        }
    }

    /// Current URL, or an empty string if the target cannot report it.
    pub async fn current_url(&self) -> String {
        match self.target.current_url().await {
            Ok(url) => url,
            Err(e) => {
                self.record(&e.context("read current url"));
                String::new()
            }
        }
    }

    /// Waits until the current URL matches a glob such as `**/login`.
    pub async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<bool> {
        let glob = glob::Pattern::new(pattern)
            .map_err(|e| Error::InvalidArgument(format!("Invalid URL pattern '{}': {}", pattern, e)))?;
        let target = &self.target;
        let glob = &glob;
        let result = self
            .probe
            .until(timeout, move || async move {
                Ok::<_, Error>(glob.matches(&target.current_url().await?))
            })
            .await;
        Ok(result.found)
    }

    pub async fn log_page_info(&self) {
        let url = self.current_url().await;
        match self.target.title().await {
            Ok(title) => self
                .logger
                .info(&format!("Page Info - Title: \"{}\", URL: \"{}\"", title, url)),
            Err(e) => self.record(&e.context("read page title")),
        }
    }

    // ------------------------------------------------------------------
    // Probes
    // ------------------------------------------------------------------

    pub async fn probe(
        &self,
        locator: &Locator,
        condition: &Condition,
        timeout: Duration,
    ) -> ProbeResult {
        self.probe.check(locator, condition, timeout).await
    }

    pub async fn is_visible(&self, locator: &Locator, timeout: Duration) -> bool {
        self.probe
            .check(locator, &Condition::Visible, timeout)
            .await
            .found
    }

    /// Probes every locator for `condition` concurrently.
    pub async fn wait_for_all(
        &self,
        locators: &[Locator],
        condition: &Condition,
        timeout: Duration,
    ) -> Vec<ProbeResult> {
        join_all(
            locators
                .iter()
                .map(|locator| self.probe.check(locator, condition, timeout)),
        )
        .await
    }

    /// Concurrent visibility check; results are in input order.
    pub async fn check_visibility(
        &self,
        locators: &[Locator],
        timeout: Duration,
    ) -> Vec<(Locator, bool)> {
        let visible =
            resolver::check_all(&self.probe, locators, &Condition::Visible, timeout).await;
        let count = visible.iter().filter(|v| **v).count();
        self.logger.info(&format!(
            "Element check: {}/{} elements visible",
            count,
            locators.len()
        ));
        locators.iter().cloned().zip(visible).collect()
    }

    /// First candidate, in list order, that becomes visible within `timeout`.
    pub async fn resolve_first_matching(
        &self,
        candidates: &[Locator],
        timeout: Duration,
    ) -> Option<Locator> {
        let found =
            resolver::resolve_first_matching(&self.probe, candidates, &Condition::Visible, timeout)
                .await;
        match &found {
            Some(locator) => self.logger.info(&format!("Found element: {}", locator)),
            None => self.logger.info("No elements found from list"),
        }
        found
    }

    /// Whichever locator satisfies `condition` first.
    pub async fn wait_for_any(
        &self,
        locators: &[Locator],
        condition: &Condition,
        timeout: Duration,
    ) -> Option<Locator> {
        resolver::resolve_any(&self.probe, locators, condition, timeout).await
    }

    /// All fields visible and enabled, checked concurrently.
    pub async fn validate_fields(&self, fields: &[(&str, Locator)], timeout: Duration) -> bool {
        let locators: Vec<Locator> = fields.iter().map(|(_, l)| l.clone()).collect();
        let ready = resolver::check_all(&self.probe, &locators, &Condition::Enabled, timeout).await;

        for ((name, _), ok) in fields.iter().zip(&ready) {
            self.logger
                .debug(&format!("Field {}: ready={}", name, ok));
        }
        let all_ready = ready.iter().all(|ok| *ok);
        self.logger.info(if all_ready {
            "Form validation: all fields ready"
        } else {
            "Form validation: some fields unavailable"
        });
        all_ready
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Text of `locator` once attached, or `None`.
    pub async fn text_of(&self, locator: &Locator, timeout: Duration) -> Option<String> {
        if !self
            .probe
            .check(locator, &Condition::Attached, timeout)
            .await
            .found
        {
            self.record(&Error::Transient {
                selector: locator.selector().to_string(),
                waited: timeout,
            });
            return None;
        }
        match self.target.text_content(locator.selector()).await {
            Ok(text) => text,
            Err(e) => {
                self.record(&Error::interaction(locator.selector(), e));
                None
            }
        }
    }

    /// Case-insensitive containment check, polled up to `timeout`.
    pub async fn has_text(&self, locator: &Locator, expected: &str, timeout: Duration) -> bool {
        let found = self
            .probe
            .check(
                locator,
                &Condition::TextContains(expected.to_string()),
                timeout,
            )
            .await
            .found;
        self.logger.info(&format!(
            "Text check on {} for \"{}\": {}",
            locator,
            expected,
            if found { "found" } else { "not found" }
        ));
        found
    }

    pub async fn count(&self, locator: &Locator) -> usize {
        match self.target.count(locator.selector()).await {
            Ok(n) => n,
            Err(e) => {
                self.record(&Error::interaction(locator.selector(), e));
                0
            }
        }
    }

    pub async fn texts(&self, locator: &Locator) -> Vec<String> {
        match self.target.all_text_contents(locator.selector()).await {
            Ok(texts) => texts,
            Err(e) => {
                self.record(&Error::interaction(locator.selector(), e));
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Probes `locator` for visibility, then applies `action` once.
    ///
    /// The UI is only touched if the probe succeeded. Never returns an error.
    pub async fn perform(&self, locator: &Locator, action: &Action, timeout: Duration) -> ActionOutcome {
        match self.attempt(locator, action, timeout).await {
            Ok(()) => {
                self.logger
                    .info(&format!("{} on {}", action.name(), locator));
                ActionOutcome::success(1)
            }
            Err(e) => {
                self.record(&e);
                ActionOutcome::failure(1, &e)
            }
        }
    }

    /// [`Executor::perform`] under a retry policy.
    pub async fn perform_with_retry(
        &self,
        locator: &Locator,
        action: &Action,
        timeout: Duration,
        policy: RetryPolicy,
    ) -> ActionOutcome {
        let label = format!("{} on {}", action.name(), locator);
        let (result, attempts) = policy
            .run_counted(self.logger.as_ref(), &label, move |_| {
                self.attempt(locator, action, timeout)
            })
            .await;

        match result {
            Ok(()) => ActionOutcome::success(attempts),
            Err(e) => {
                self.record(&e);
                ActionOutcome::failure(attempts, &e)
            }
        }
    }

    /// Applies `action` to the first candidate that becomes visible.
    pub async fn perform_first_matching(
        &self,
        candidates: &[Locator],
        action: &Action,
        timeout: Duration,
    ) -> ActionOutcome {
        match self.resolve_first_matching(candidates, timeout).await {
            Some(locator) => self.perform(&locator, action, timeout).await,
            None => {
                let selectors: Vec<&str> = candidates.iter().map(|c| c.selector()).collect();
                let err = Error::Transient {
                    selector: selectors.join(" | "),
                    waited: timeout,
                };
                self.record(&err);
                ActionOutcome::failure(1, &err)
            }
        }
    }

    async fn attempt(&self, locator: &Locator, action: &Action, timeout: Duration) -> Result<()> {
        let probe = self
            .probe
            .check(locator, &Condition::Visible, timeout)
            .await;
        if !probe.found {
            return Err(Error::Transient {
                selector: locator.selector().to_string(),
                waited: probe.elapsed,
            });
        }

        let _gate = self.action_gate.lock().await;
        let slow_mo = self.settings.slow_mo_delay();
        if !slow_mo.is_zero() {
            tokio::time::sleep(slow_mo).await;
        }

        // Execution gets the same bound as the probe, never less than one quantum
        let bound = timeout.max(self.probe.polling().quantum());
        match tokio::time::timeout(bound, action.apply(self.target.as_ref(), locator.selector()))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::interaction(
                locator.selector(),
                format!("{} did not complete within {:?}", action.name(), bound),
            )),
        }
    }

    // ------------------------------------------------------------------
    // Artifacts
    // ------------------------------------------------------------------

    /// Full-page screenshot named after `name`; `None` if capture failed.
    pub async fn screenshot(&self, name: &str) -> Option<PathBuf> {
        match artifacts::save_screenshot(self.target.as_ref(), &self.settings.artifact_dir, name)
            .await
        {
            Ok(path) => {
                self.logger
                    .info(&format!("Screenshot saved: {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.logger.warn(&format!("Screenshot failed: {}", e));
                None
            }
        }
    }
}
