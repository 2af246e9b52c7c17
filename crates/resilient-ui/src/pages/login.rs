// LoginPage - Book store login form

use super::FlowReport;
use crate::action::Action;
use crate::data::Credentials;
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::probe::Condition;
use crate::target::{Locator, WaitUntil};
use std::sync::Arc;
use std::time::Duration;

const LOGIN_PATH: &str = "/login";

const FORM_TIMEOUT: Duration = Duration::from_secs(10);
const RECOVERY_TIMEOUT: Duration = Duration::from_secs(5);
const INDICATOR_TIMEOUT: Duration = Duration::from_secs(3);

/// Where an error message may appear after a rejected login
const ERROR_SELECTORS: [&str; 6] = [
    "text=Invalid username or password!",
    "#name",
    ".alert",
    "[role=\"alert\"]",
    ".error-message",
    "text=Invalid credentials",
];

/// Elements only shown to a logged-in user
const SUCCESS_SELECTORS: [&str; 5] = [
    "text=Profile",
    "#userName-value",
    ".main-header",
    "text=Book Store Application",
    "text=Log out",
];

pub struct LoginPage {
    executor: Arc<Executor>,
    pub username_input: Locator,
    pub password_input: Locator,
    pub login_button: Locator,
    pub error_message: Locator,
    pub page_title: Locator,
}

impl LoginPage {
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            username_input: Locator::new("#userName").labeled("username"),
            password_input: Locator::new("#password").labeled("password"),
            login_button: Locator::new("#login").labeled("login button"),
            error_message: Locator::new("#name").labeled("login error"),
            page_title: Locator::new(".main-header").labeled("page title"),
        }
    }

    /// Opens the login page.
    ///
    /// If the form does not show up, goes through the home page once and
    /// tries again. Fails only if the form is still missing after that.
    pub async fn navigate(&self) -> Result<()> {
        let logger = self.executor.logger();
        logger.info("Navigating to login page");

        let form = [
            self.username_input.clone(),
            self.password_input.clone(),
            self.login_button.clone(),
        ];
        if self.open(&form, FORM_TIMEOUT).await {
            logger.info("Login page loaded");
            return Ok(());
        }

        logger.warn("Login page failed to load, retrying through the home page");
        self.executor.navigate("/", WaitUntil::DomContentLoaded).await?;
        self.executor
            .wait_for_load(WaitUntil::Load, RECOVERY_TIMEOUT)
            .await;

        if self.open(&form[..1], RECOVERY_TIMEOUT).await {
            logger.info("Login page loaded on second attempt");
            Ok(())
        } else {
            Err(Error::Assertion(
                "login form not visible after recovery navigation".to_string(),
            ))
        }
    }

    async fn open(&self, required: &[Locator], timeout: Duration) -> bool {
        if let Err(e) = self
            .executor
            .navigate(LOGIN_PATH, WaitUntil::DomContentLoaded)
            .await
        {
            self.executor.record(&e);
            return false;
        }
        self.executor
            .check_visibility(required, timeout)
            .await
            .iter()
            .all(|(_, visible)| *visible)
    }

    /// Fills and submits the form, then waits for the page to react.
    pub async fn login(&self, credentials: &Credentials) -> FlowReport {
        let executor = &self.executor;
        executor.logger().info(&format!(
            "Attempting login with username: {}",
            credentials.username
        ));

        let mut report = FlowReport::new("login");
        let steps = [
            (
                "fill username",
                &self.username_input,
                Action::ClearAndFill(credentials.username.clone()),
            ),
            (
                "fill password",
                &self.password_input,
                Action::ClearAndFill(credentials.password.clone()),
            ),
            ("submit", &self.login_button, Action::Click),
        ];
        for (name, locator, action) in steps {
            if !report.record(name, executor.perform(locator, &action, FORM_TIMEOUT).await) {
                report.abort(format!("{} failed", name));
                return report;
            }
        }

        // Either the redirect happens or the error message shows up
        let target = executor.target();
        let error_selector = self.error_message.selector();
        let settled = executor
            .probe_handle()
            .until(INDICATOR_TIMEOUT, move || async move {
                if !target.current_url().await?.contains(LOGIN_PATH) {
                    return Ok(true);
                }
                target.is_visible(error_selector).await
            })
            .await;
        executor.logger().info(&format!(
            "Login form submitted (page reacted: {})",
            settled.found
        ));
        report
    }

    /// Whether the page shows that the last login was rejected.
    ///
    /// Looks for a visible error message first; if there is none, staying on
    /// the login URL counts as rejection.
    pub async fn verify_login_error(&self) -> bool {
        let executor = &self.executor;
        executor.logger().info("Checking for login error messages");

        // Any indicator will do, so the first one shown wins
        let candidates: Vec<Locator> = ERROR_SELECTORS.iter().map(|s| Locator::new(*s)).collect();
        if let Some(found) = executor
            .wait_for_any(&candidates, &Condition::Visible, INDICATOR_TIMEOUT)
            .await
        {
            let text = executor
                .text_of(&found, INDICATOR_TIMEOUT)
                .await
                .unwrap_or_default();
            executor
                .logger()
                .info(&format!("Error found: {}", text.trim()));
            return true;
        }

        let still_on_login = executor.current_url().await.contains(LOGIN_PATH);
        executor.logger().info(if still_on_login {
            "No error message found, but still on login page"
        } else {
            "No error message found and login page left"
        });
        still_on_login
    }

    /// Whether the user appears to be logged in.
    pub async fn is_logged_in(&self) -> bool {
        let executor = &self.executor;
        let url = executor.current_url().await;
        executor
            .logger()
            .info(&format!("Checking login status, current URL: {}", url));

        if !url.is_empty()
            && (url.contains("/profile") || url.contains("/books") || !url.contains(LOGIN_PATH))
        {
            executor.logger().info("Redirected away from login page");
            return true;
        }

        let indicators: Vec<Locator> = SUCCESS_SELECTORS.iter().map(|s| Locator::new(*s)).collect();
        match executor
            .wait_for_any(&indicators, &Condition::Visible, INDICATOR_TIMEOUT)
            .await
        {
            Some(found) => {
                executor
                    .logger()
                    .info(&format!("Success indicator found: {}", found));
                true
            }
            None => {
                executor.logger().info("No success indicators found");
                false
            }
        }
    }
}
