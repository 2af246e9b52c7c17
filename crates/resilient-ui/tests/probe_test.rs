// Integration tests for bounded probes
//
// Tests cover:
// - A condition that never holds returns `found: false` close to the timeout
// - Elements rendering late are found on the next poll
// - A target that stops answering cannot stretch a probe past timeout + quantum
// - Backoff polling schedule
// - Text and negative conditions


use fake_target::{ElementSpec, FakeTarget, init_tracing};
use resilient_ui::{Condition, Locator, MemoryLogger, Polling, Probe};
use std::sync::Arc;
use std::time::Duration;

fn probe_over(fake: &Arc<FakeTarget>) -> Probe {
    Probe::new(fake.clone()).with_polling(Polling::fixed(Duration::from_millis(100)))
}

// ============================================================================
// Timeout bounds
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_never_visible_returns_false_within_bound() {
    init_tracing();
    let fake = Arc::new(FakeTarget::new().with("#ghost", ElementSpec::never_visible()));
    let probe = probe_over(&fake);

    let result = probe
        .check(
            &Locator::new("#ghost"),
            &Condition::Visible,
            Duration::from_millis(500),
        )
        .await;

    assert!(!result.found);
    assert!(result.elapsed >= Duration::from_millis(500));
    assert!(result.elapsed <= Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_unknown_selector_is_not_an_error() {
    let fake = Arc::new(FakeTarget::new());
    let probe = probe_over(&fake);

    let result = probe
        .check(
            &Locator::new("#missing"),
            &Condition::Attached,
            Duration::from_millis(300),
        )
        .await;

    assert!(!result.found);
    assert_eq!(result.elapsed, Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_hung_target_is_bounded_by_timeout_plus_quantum() {
    let fake = Arc::new(FakeTarget::new().with("#spinner", ElementSpec::visible()));
    fake.hang();
    let probe = probe_over(&fake);

    let result = probe
        .check(
            &Locator::new("#spinner"),
            &Condition::Visible,
            Duration::from_millis(500),
        )
        .await;

    assert!(!result.found);
    assert!(result.elapsed <= Duration::from_millis(600));
}

#[tokio::test(start_paused = true)]
async fn test_zero_timeout_polls_exactly_once() {
    let fake = Arc::new(FakeTarget::new().with("#now", ElementSpec::visible()));
    let probe = probe_over(&fake);

    let result = probe
        .check(&Locator::new("#now"), &Condition::Visible, Duration::ZERO)
        .await;

    assert!(result.found);
    assert_eq!(result.elapsed, Duration::ZERO);
}

// ============================================================================
// Late rendering and polling schedule
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_element_appearing_later_is_found() {
    let fake = Arc::new(
        FakeTarget::new().with("#toast", ElementSpec::appearing_after(Duration::from_millis(250))),
    );
    let logger = Arc::new(MemoryLogger::new());
    let probe = probe_over(&fake).with_logger(logger.clone());

    let result = probe
        .check(
            &Locator::new("#toast").labeled("toast"),
            &Condition::Visible,
            Duration::from_secs(1),
        )
        .await;

    assert!(result.found);
    assert_eq!(result.elapsed, Duration::from_millis(300));
    assert!(logger.contains("toast (#toast) became visible after 300ms"));
}

#[tokio::test(start_paused = true)]
async fn test_backoff_schedule_is_followed() {
    let fake = Arc::new(
        FakeTarget::new().with("#slow", ElementSpec::appearing_after(Duration::from_millis(650))),
    );
    let probe = Probe::new(fake.clone()).with_polling(Polling::backoff(
        Duration::from_millis(100),
        2,
        Duration::from_millis(400),
    ));

    // Polls at 0, 100, 300, 700ms
    let result = probe
        .check(
            &Locator::new("#slow"),
            &Condition::Visible,
            Duration::from_secs(2),
        )
        .await;

    assert!(result.found);
    assert_eq!(result.elapsed, Duration::from_millis(700));
}

// ============================================================================
// Conditions
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_text_conditions() {
    let fake = Arc::new(FakeTarget::new().with(
        "#name",
        ElementSpec::visible().with_text("Invalid username or password!"),
    ));
    let probe = probe_over(&fake);
    let name = Locator::new("#name");

    let contains = probe
        .check(
            &name,
            &Condition::TextContains("INVALID USERNAME".into()),
            Duration::from_millis(200),
        )
        .await;
    assert!(contains.found);

    let matches = probe
        .check(
            &name,
            &Condition::text_matches(r"^Invalid .* password!$").unwrap(),
            Duration::from_millis(200),
        )
        .await;
    assert!(matches.found);

    let absent = probe
        .check(
            &name,
            &Condition::TextContains("welcome".into()),
            Duration::from_millis(200),
        )
        .await;
    assert!(!absent.found);
}

#[tokio::test(start_paused = true)]
async fn test_negative_conditions() {
    let fake = Arc::new(
        FakeTarget::new()
            .with("#modal", ElementSpec::attached_hidden())
            .with("#submit", ElementSpec::visible().disabled()),
    );
    let probe = probe_over(&fake);
    let timeout = Duration::from_millis(300);

    let hidden = probe
        .check(&Locator::new("#modal"), &Condition::Hidden, timeout)
        .await;
    assert!(hidden.found);
    assert_eq!(hidden.elapsed, Duration::ZERO);

    let attached = probe
        .check(&Locator::new("#modal"), &Condition::Attached, timeout)
        .await;
    assert!(attached.found);

    let detached = probe
        .check(&Locator::new("#gone"), &Condition::Detached, timeout)
        .await;
    assert!(detached.found);

    let enabled = probe
        .check(&Locator::new("#submit"), &Condition::Enabled, timeout)
        .await;
    assert!(!enabled.found);
}
