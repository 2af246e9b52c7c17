// Harness - Runs one test case and classifies how it ended
//
// Assertion and setup errors fail a case. Transient and interaction errors
// that escape the body are expected on an unreliable target: they are
// recorded as diagnostics and the case still passes, unless the case is
// strict. A failed case leaves a screenshot and a JSON trace behind.

use crate::artifacts;
use crate::error::{Error, ErrorInfo, ErrorKind, Result};
use crate::executor::Executor;
use serde::Serialize;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;

/// Per-case options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseOptions {
    /// Fail on transient and interaction errors too
    pub strict: bool,
}

impl CaseOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// How a case ended
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub name: String,
    pub passed: bool,
    pub elapsed_ms: u64,
    /// Non-fatal errors observed while the case ran
    pub diagnostics: Vec<ErrorInfo>,
    /// Screenshot and trace files written for a failed case
    pub artifacts: Vec<PathBuf>,
    pub failure: Option<ErrorInfo>,
    #[serde(skip)]
    error: Option<Error>,
}

impl CaseReport {
    /// The report if the case passed, otherwise the error that failed it.
    pub fn into_result(self) -> Result<Self> {
        match self.error {
            None => Ok(self),
            Some(error) => Err(error.context(format!("test '{}' failed", self.name))),
        }
    }
}

/// Runs `body` against `executor` as the test case `name`.
pub async fn run_case<F, Fut>(
    executor: Arc<Executor>,
    name: &str,
    options: CaseOptions,
    body: F,
) -> CaseReport
where
    F: FnOnce(Arc<Executor>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let logger = executor.logger();
    logger.info(&format!("Starting test: {}", name));

    let start = Instant::now();
    let seen = executor.diagnostics().len();

    let error = match body(Arc::clone(&executor)).await {
        Ok(()) => None,
        Err(e) => match e.kind() {
            ErrorKind::Transient | ErrorKind::Interaction if !options.strict => {
                executor.record(&e);
                None
            }
            _ => Some(e),
        },
    };

    let mut report = CaseReport {
        name: name.to_string(),
        passed: error.is_none(),
        elapsed_ms: start.elapsed().as_millis() as u64,
        diagnostics: executor.diagnostics().into_iter().skip(seen).collect(),
        artifacts: Vec::new(),
        failure: error.as_ref().map(Error::info),
        error,
    };

    match &report.failure {
        None => logger.info(&format!(
            "Test passed: {} ({} diagnostics)",
            name,
            report.diagnostics.len()
        )),
        Some(failure) => {
            logger.error(&format!("Test failed: {}: {}", name, failure));

            if let Some(path) = executor.screenshot(name).await {
                report.artifacts.push(path);
            }
            match artifacts::save_trace(&executor.settings().artifact_dir, name, &report).await {
                Ok(path) => {
                    logger.info(&format!("Trace saved: {}", path.display()));
                    report.artifacts.push(path);
                }
                Err(e) => logger.warn(&format!("Trace failed: {}", e)),
            }
        }
    }

    report
}
