// Integration tests for the test-case runner
//
// Tests cover:
// - Transient and interaction errors escaping a body are diagnostics, not failures
// - Strict cases fail on them
// - Assertion and setup errors fail the case and leave artifacts behind


use fake_target::{ElementSpec, FakeTarget};
use resilient_ui::harness::{CaseOptions, run_case};
use resilient_ui::{Action, Error, ErrorKind, Executor, Locator, Settings};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn executor_in(dir: &TempDir, fake: &Arc<FakeTarget>) -> Arc<Executor> {
    let settings = Settings::default()
        .artifact_dir(dir.path().join("screenshots"))
        .timeout(Duration::from_millis(200));
    Arc::new(Executor::new(fake.clone(), settings))
}

#[tokio::test]
async fn test_passing_case() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTarget::new().with("#login", ElementSpec::visible()));
    let executor = executor_in(&dir, &fake);

    let report = run_case(executor, "login", CaseOptions::default(), |executor| async move {
        executor
            .perform(&Locator::new("#login"), &Action::Click, executor.timeout())
            .await
            .ensure("click login")
    })
    .await;

    assert!(report.passed);
    assert!(report.failure.is_none());
    assert!(report.artifacts.is_empty());
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_transient_error_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTarget::new());
    let executor = executor_in(&dir, &fake);

    let report = run_case(executor, "search", CaseOptions::default(), |executor| async move {
        let outcome = executor
            .perform(&Locator::new("#searchBox"), &Action::Click, executor.timeout())
            .await;
        if !outcome.succeeded {
            return Err(Error::Transient {
                selector: "#searchBox".into(),
                waited: executor.timeout(),
            });
        }
        Ok(())
    })
    .await;

    assert!(report.passed);
    // One from perform, one for the error that escaped the body
    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.diagnostics.iter().all(|d| d.kind == ErrorKind::Transient));
    assert!(report.artifacts.is_empty());
}

#[tokio::test]
async fn test_strict_case_fails_on_interaction_error() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTarget::new());
    let executor = executor_in(&dir, &fake);

    let report = run_case(executor, "strict", CaseOptions::strict(), |_| async {
        Err::<(), _>(Error::interaction("#submit", "detached from DOM"))
    })
    .await;

    assert!(!report.passed);
    assert_eq!(
        report.failure.as_ref().map(|f| f.kind),
        Some(ErrorKind::Interaction)
    );
}

#[tokio::test]
async fn test_assertion_failure_writes_screenshot_and_trace() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTarget::new());
    let executor = executor_in(&dir, &fake);

    let report = run_case(executor, "user-delete", CaseOptions::default(), |executor| async move {
        executor.assert_that(false, "row count decreased")
    })
    .await;

    assert!(!report.passed);
    assert_eq!(report.artifacts.len(), 2);
    assert!(
        report.artifacts[0]
            .to_string_lossy()
            .ends_with(".png")
    );
    assert!(
        report.artifacts[1]
            .to_string_lossy()
            .ends_with(".trace.json")
    );

    let trace: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&report.artifacts[1]).unwrap()).unwrap();
    assert_eq!(trace["name"], "user-delete");
    assert_eq!(trace["passed"], false);
    assert_eq!(trace["failure"]["kind"], "assertion");

    let err = report.into_result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Assertion);
    assert!(err.to_string().contains("test 'user-delete' failed"));
}

#[tokio::test]
async fn test_setup_error_fails_even_when_tolerant() {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(FakeTarget::new().failing_screenshots());
    let executor = executor_in(&dir, &fake);

    let report = run_case(executor, "config", CaseOptions::default(), |_| async {
        Settings::from_lookup(|key| (key == "TIMEOUT").then(|| "soon".to_string()))?;
        Ok::<(), Error>(())
    })
    .await;

    assert!(!report.passed);
    assert_eq!(report.failure.as_ref().map(|f| f.kind), Some(ErrorKind::Setup));
    // Screenshot failed, the trace was still written
    assert_eq!(report.artifacts.len(), 1);
}
