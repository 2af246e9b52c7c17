// DashboardPage - Profile area shown after login

use super::FlowReport;
use crate::action::Action;
use crate::executor::Executor;
use crate::probe::Condition;
use crate::target::Locator;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const LOAD_TIMEOUT: Duration = Duration::from_secs(10);
const LOGOUT_TIMEOUT: Duration = Duration::from_secs(5);
const USER_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Glob the URL must match once logged out
const LOGGED_OUT_URL: &str = "**/login";

/// Instantaneous visibility of the main dashboard areas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardChecks {
    pub profile_visible: bool,
    pub navigation_visible: bool,
    pub page_loaded: bool,
}

pub struct DashboardPage {
    executor: Arc<Executor>,
    pub profile_link: Locator,
    pub logout_button: Locator,
    pub welcome_message: Locator,
    pub navigation_menu: Locator,
    pub user_info: Locator,
}

impl DashboardPage {
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            profile_link: Locator::new("text=Profile").labeled("profile link"),
            logout_button: Locator::new("#submit").labeled("logout button"),
            welcome_message: Locator::new(".main-header").labeled("header"),
            navigation_menu: Locator::new(".left-pannel").labeled("navigation"),
            user_info: Locator::new("#userName-value").labeled("user name"),
        }
    }

    /// Whether any of profile link, header or navigation becomes visible.
    pub async fn wait_for_load(&self) -> bool {
        let logger = self.executor.logger();
        logger.info("Waiting for dashboard to load");

        let markers = [
            self.profile_link.clone(),
            self.welcome_message.clone(),
            self.navigation_menu.clone(),
        ];
        let loaded = self
            .executor
            .wait_for_any(&markers, &Condition::Visible, LOAD_TIMEOUT)
            .await
            .is_some();

        logger.info(if loaded {
            "Dashboard loaded"
        } else {
            "Dashboard did not load, login likely unsuccessful"
        });
        loaded
    }

    /// Displayed user name, if shown.
    pub async fn user_info(&self) -> Option<String> {
        self.executor
            .text_of(&self.user_info, USER_INFO_TIMEOUT)
            .await
            .map(|text| text.trim().to_string())
    }

    /// Clicks log out and waits for the redirect to the login page.
    pub async fn logout(&self) -> FlowReport {
        let executor = &self.executor;
        executor.logger().info("Logging out");

        let mut report = FlowReport::new("logout");
        if !report.record(
            "click logout",
            executor
                .perform(&self.logout_button, &Action::Click, LOGOUT_TIMEOUT)
                .await,
        ) {
            report.abort("logout button unavailable");
            return report;
        }

        match executor.wait_for_url(LOGGED_OUT_URL, LOGOUT_TIMEOUT).await {
            Ok(true) => executor.logger().info("Logout successful"),
            Ok(false) => {
                executor
                    .logger()
                    .warn("Logout redirect not detected");
                report.abort("redirect to login not detected");
            }
            Err(e) => {
                executor.record(&e);
                report.abort(e.to_string());
            }
        }
        report
    }

    /// Checks each dashboard area once, without waiting.
    pub async fn verify_elements(&self) -> DashboardChecks {
        let areas = [
            self.profile_link.clone(),
            self.navigation_menu.clone(),
            Locator::new("body"),
        ];
        let visible = self
            .executor
            .check_visibility(&areas, Duration::ZERO)
            .await;

        let checks = DashboardChecks {
            profile_visible: visible[0].1,
            navigation_visible: visible[1].1,
            page_loaded: visible[2].1,
        };
        self.executor
            .logger()
            .info(&format!("Dashboard verification results: {:?}", checks));
        checks
    }
}
