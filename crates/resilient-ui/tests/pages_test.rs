// Integration tests for the demo-site page objects
//
// Tests cover:
// - Login navigation with recovery, login flow, error and success detection
// - Dashboard load, logout redirect and element checks
// - Web table CRUD flows report step outcomes and never fail
// - Submit and close fallbacks, per-row buttons
// - Row counting and table content heuristics


use fake_target::{ElementSpec, FakeTarget, init_tracing};
use resilient_ui::pages::{DashboardChecks, DashboardPage, LoginPage, WebTablesPage};
use resilient_ui::{Credentials, DataFactory, ErrorKind, Executor, MemoryLogger, Settings, UserUpdate};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn executor_over(fake: &Arc<FakeTarget>) -> (Arc<Executor>, Arc<MemoryLogger>) {
    let logger = Arc::new(MemoryLogger::new());
    let executor = Executor::new(fake.clone(), Settings::default()).with_logger(logger.clone());
    (Arc::new(executor), logger)
}

fn login_form() -> FakeTarget {
    FakeTarget::new()
        .with("#userName", ElementSpec::visible())
        .with("#password", ElementSpec::visible())
        .with("#login", ElementSpec::visible())
}

// ============================================================================
// LoginPage
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_login_navigate_first_try() {
    init_tracing();
    let fake = Arc::new(login_form());
    let (executor, _) = executor_over(&fake);

    LoginPage::new(executor).navigate().await.unwrap();

    assert_eq!(fake.actions(), vec!["navigate:https://demoqa.com/login"]);
}

#[tokio::test(start_paused = true)]
async fn test_login_navigate_recovers_through_home_page() {
    let fake = Arc::new(login_form().failing_navigations(1));
    let (executor, _) = executor_over(&fake);

    LoginPage::new(executor.clone()).navigate().await.unwrap();

    assert_eq!(
        fake.actions(),
        vec![
            "navigate:https://demoqa.com/login",
            "navigate:https://demoqa.com/",
            "navigate:https://demoqa.com/login",
        ]
    );
    assert_eq!(executor.diagnostics()[0].kind, ErrorKind::Interaction);
}

#[tokio::test(start_paused = true)]
async fn test_login_navigate_fails_when_form_never_renders() {
    let fake = Arc::new(FakeTarget::new());
    let (executor, _) = executor_over(&fake);

    let err = LoginPage::new(executor).navigate().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Assertion);
    assert_eq!(fake.actions().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_successful_login() {
    let fake = Arc::new(
        login_form()
            .at_url("https://demoqa.com/login")
            .navigate_on_click("#login", "https://demoqa.com/profile"),
    );
    let (executor, _) = executor_over(&fake);
    let page = LoginPage::new(executor);

    let report = page.login(&Credentials::new("testuser", "Test@123")).await;

    assert!(report.completed(), "{:?}", report);
    assert_eq!(report.steps.len(), 3);
    assert_eq!(fake.value("#userName"), "testuser");
    assert_eq!(fake.value("#password"), "Test@123");
    assert!(page.is_logged_in().await);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_login_is_detected() {
    let fake = Arc::new(
        login_form()
            .at_url("https://demoqa.com/login")
            .with(
                "#name",
                ElementSpec::never_visible().with_text("Invalid username or password!"),
            )
            .show_on_click("#login", "#name"),
    );
    let (executor, logger) = executor_over(&fake);
    let page = LoginPage::new(executor);

    let report = page.login(&Credentials::new("invaliduser", "wrongpassword")).await;
    assert!(report.completed());

    assert!(page.verify_login_error().await);
    assert!(logger.contains("Error found: Invalid username or password!"));
    assert!(!page.is_logged_in().await);
}

#[tokio::test(start_paused = true)]
async fn test_visible_error_indicator_is_reported_without_waiting() {
    let fake = Arc::new(
        FakeTarget::new()
            .at_url("https://demoqa.com/login")
            .with("#name", ElementSpec::visible().with_text("Invalid username or password!")),
    );
    let (executor, logger) = executor_over(&fake);
    let page = LoginPage::new(executor);

    let start = Instant::now();
    assert!(page.verify_login_error().await);

    // Earlier, absent indicators in the list do not delay the answer
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert!(logger.contains("Error found: Invalid username or password!"));
}

#[tokio::test(start_paused = true)]
async fn test_login_flow_stops_at_missing_field() {
    let fake = Arc::new(FakeTarget::new().with("#userName", ElementSpec::visible()));
    let (executor, _) = executor_over(&fake);

    let report = LoginPage::new(executor)
        .login(&Credentials::new("testuser", "Test@123"))
        .await;

    assert!(!report.completed());
    assert_eq!(report.steps.len(), 2);
    assert_eq!(report.aborted.as_deref(), Some("fill password failed"));
    assert!(fake.clicks().is_empty());
}

// ============================================================================
// DashboardPage
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_dashboard_load_and_logout() {
    let fake = Arc::new(
        FakeTarget::new()
            .at_url("https://demoqa.com/profile")
            .with(".left-pannel", ElementSpec::visible())
            .with("text=Profile", ElementSpec::visible())
            .with("body", ElementSpec::visible())
            .with("#userName-value", ElementSpec::visible().with_text(" testuser "))
            .with("#submit", ElementSpec::visible())
            .navigate_on_click("#submit", "https://demoqa.com/login"),
    );
    let (executor, _) = executor_over(&fake);
    let dashboard = DashboardPage::new(executor);

    assert!(dashboard.wait_for_load().await);
    assert_eq!(dashboard.user_info().await.as_deref(), Some("testuser"));
    assert_eq!(
        dashboard.verify_elements().await,
        DashboardChecks {
            profile_visible: true,
            navigation_visible: true,
            page_loaded: true,
        }
    );

    let report = dashboard.logout().await;
    assert!(report.completed(), "{:?}", report);
}

#[tokio::test(start_paused = true)]
async fn test_logout_without_redirect_is_reported() {
    let fake = Arc::new(
        FakeTarget::new()
            .at_url("https://demoqa.com/profile")
            .with("#submit", ElementSpec::visible()),
    );
    let (executor, _) = executor_over(&fake);

    let report = DashboardPage::new(executor).logout().await;

    assert!(!report.completed());
    assert!(report.step("click logout").unwrap().outcome.succeeded);
    assert_eq!(
        report.aborted.as_deref(),
        Some("redirect to login not detected")
    );
}

#[tokio::test(start_paused = true)]
async fn test_dashboard_not_loaded() {
    let fake = Arc::new(FakeTarget::new());
    let (executor, _) = executor_over(&fake);
    let dashboard = DashboardPage::new(executor);

    assert!(!dashboard.wait_for_load().await);
    assert_eq!(dashboard.verify_elements().await, DashboardChecks::default());
}

// ============================================================================
// WebTablesPage
// ============================================================================

const SEEDED_TABLE: &str = "First Name Last Name Age Email Salary Department Action \
     Cierra Vega 39 cierra@example.com 10000 Insurance \
     Alden Cantrell 45 alden@example.com 12000 Compliance \
     Kierra Gentry 29 kierra@example.com 2000 Legal";

fn web_tables() -> FakeTarget {
    FakeTarget::new()
        .with("#addNewRecordButton", ElementSpec::visible())
        .with("#searchBox", ElementSpec::visible())
        .with(".rt-table", ElementSpec::visible().with_text(SEEDED_TABLE))
        .with(".modal-content", ElementSpec::never_visible())
        .with("#firstName", ElementSpec::visible())
        .with("#lastName", ElementSpec::visible())
        .with("#userEmail", ElementSpec::visible())
        .with("#age", ElementSpec::visible())
        .with("#salary", ElementSpec::visible())
        .with("#department", ElementSpec::visible())
}

#[tokio::test(start_paused = true)]
async fn test_add_user_fills_every_field() {
    let fake = Arc::new(
        web_tables()
            .with("#submit", ElementSpec::visible())
            .show_on_click("#addNewRecordButton", ".modal-content")
            .hide_on_click("#submit", ".modal-content"),
    );
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);
    let user = DataFactory::seeded(7).random_user();

    assert!(page.navigate().await);
    let report = page.add_user(&user).await;

    assert!(report.completed(), "{:?}", report);
    let names: Vec<&str> = report.steps.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "open form",
            "fill first name",
            "fill last name",
            "fill email",
            "fill age",
            "fill salary",
            "fill department",
            "submit",
        ]
    );
    assert_eq!(fake.value("#userEmail"), user.email);
    assert_eq!(fake.value("#department"), user.department);
}

#[tokio::test(start_paused = true)]
async fn test_add_user_when_form_never_opens() {
    let fake = Arc::new(web_tables());
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);

    let report = page.add_user(&DataFactory::seeded(1).random_user()).await;

    assert!(!report.completed());
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.aborted.as_deref(), Some("record form did not open"));
    assert!(!fake.actions().iter().any(|a| a.starts_with("fill:")));
}

#[tokio::test(start_paused = true)]
async fn test_add_user_uses_submit_and_close_fallbacks() {
    let fake = Arc::new(
        web_tables()
            .with("#submit", ElementSpec::never_visible())
            .with(".btn-primary", ElementSpec::visible())
            .with(".close", ElementSpec::visible())
            .show_on_click("#addNewRecordButton", ".modal-content")
            .hide_on_click(".close", ".modal-content"),
    );
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor.clone());

    let report = page.add_user(&DataFactory::seeded(3).random_user()).await;

    assert!(report.completed(), "{:?}", report);
    assert!(report.step("submit").unwrap().outcome.succeeded);
    assert!(report.step("close form").unwrap().outcome.succeeded);
    assert_eq!(
        fake.clicks(),
        vec!["#addNewRecordButton", ".btn-primary", ".close"]
    );
    // The unavailable primary submit button is still on record
    assert!(
        executor
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("'#submit'"))
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_clears_then_types() {
    let fake = Arc::new(web_tables());
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);

    let report = page.search("Cierra").await;

    assert!(report.completed());
    assert_eq!(
        fake.actions(),
        vec![
            "click:#searchBox",
            "press:Control+A",
            "press:Delete",
            "fill:#searchBox=",
            "type:#searchBox=Cierra",
        ]
    );
    assert_eq!(fake.value("#searchBox"), "Cierra");

    let cleared = page.search("   ").await;
    assert_eq!(cleared.steps.len(), 1);
    assert_eq!(fake.value("#searchBox"), "");
}

#[tokio::test(start_paused = true)]
async fn test_edit_user_targets_requested_row() {
    let fake = Arc::new(
        web_tables()
            .with("#submit", ElementSpec::visible())
            .with("[title=\"Edit\"]", ElementSpec::visible().with_count(3))
            .show_on_click("[title=\"Edit\"] >> nth=1", ".modal-content")
            .hide_on_click("#submit", ".modal-content"),
    );
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);
    let update = UserUpdate {
        first_name: Some("Jane000001".into()),
        salary: Some("75000".into()),
        ..UserUpdate::default()
    };

    let report = page.edit_user(1, &update).await;

    assert!(report.completed(), "{:?}", report);
    assert_eq!(
        fake.clicks(),
        vec!["[title=\"Edit\"] >> nth=1", "#submit"]
    );
    assert_eq!(fake.value("#firstName"), "Jane000001");
    assert_eq!(fake.value("#salary"), "75000");
    assert!(report.step("fill last name").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_delete_user_row_bounds() {
    let fake = Arc::new(
        web_tables().with("[title=\"Delete\"]", ElementSpec::visible().with_count(3)),
    );
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);

    let missing = page.delete_user(5).await;
    assert!(!missing.completed());
    assert_eq!(missing.aborted.as_deref(), Some("no delete button for row 5"));
    assert!(fake.clicks().is_empty());

    let deleted = page.delete_user(0).await;
    assert!(deleted.completed());
    assert_eq!(fake.clicks(), vec!["[title=\"Delete\"] >> nth=0"]);
}

#[tokio::test(start_paused = true)]
async fn test_data_row_count_skips_padding_rows() {
    let padding = "\u{200b}".repeat(10);
    let fake = Arc::new(web_tables().with(
        ".rt-tbody .rt-tr-group",
        ElementSpec::visible().with_texts(&[
            "Cierra Vega 39 cierra@example.com 10000 Insurance",
            "Alden Cantrell 45 alden@example.com 12000 Compliance",
            "                         ",
            padding.as_str(),
        ]),
    ));
    let (executor, _) = executor_over(&fake);

    assert_eq!(WebTablesPage::new(executor).data_row_count().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_data_row_count_falls_back_to_table_text() {
    let populated = Arc::new(
        FakeTarget::new().with(".rt-table", ElementSpec::visible().with_text("x".repeat(250))),
    );
    let (executor, _) = executor_over(&populated);
    assert_eq!(WebTablesPage::new(executor).data_row_count().await, 3);

    let empty = Arc::new(
        FakeTarget::new().with(".rt-table", ElementSpec::visible().with_text("No rows found")),
    );
    let (executor, _) = executor_over(&empty);
    assert_eq!(WebTablesPage::new(executor).data_row_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_contains_user_matches_any_term() {
    let fake = Arc::new(web_tables());
    let (executor, _) = executor_over(&fake);
    let page = WebTablesPage::new(executor);

    assert!(page.contains_user(&["nobody", "ALDEN"]).await);
    assert!(!page.contains_user(&["nobody"]).await);
    assert!(!page.contains_user(&[]).await);
    assert!(!page.contains_user(&["  "]).await);
}

#[tokio::test(start_paused = true)]
async fn test_no_data_detection() {
    let message = Arc::new(
        web_tables().with("text=No rows found", ElementSpec::visible()),
    );
    let (executor, _) = executor_over(&message);
    assert!(WebTablesPage::new(executor).is_no_data_visible().await);

    let populated = Arc::new(web_tables());
    let (executor, _) = executor_over(&populated);
    assert!(!WebTablesPage::new(executor).is_no_data_visible().await);

    let short = Arc::new(
        FakeTarget::new().with(".rt-table", ElementSpec::visible().with_text("Action")),
    );
    let (executor, _) = executor_over(&short);
    assert!(WebTablesPage::new(executor).is_no_data_visible().await);
}

#[tokio::test(start_paused = true)]
async fn test_ensure_stability_with_attached_landmarks() {
    let fake = Arc::new(web_tables());
    let (executor, logger) = executor_over(&fake);

    WebTablesPage::new(executor).ensure_stability().await;

    assert!(!logger.contains("not attached"));
}
