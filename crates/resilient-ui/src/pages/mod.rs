// Page objects for the demoqa.com demo site
//
// Page objects hold locators and an `Arc<Executor>`. Multi-step flows never
// return `Err`: each step's `ActionOutcome` lands in a `FlowReport`, and the
// caller decides whether an incomplete flow fails the test.

pub mod dashboard;
pub mod login;
pub mod web_tables;

pub use dashboard::{DashboardChecks, DashboardPage};
pub use login::LoginPage;
pub use web_tables::WebTablesPage;

use crate::action::ActionOutcome;
use crate::error::{Error, Result};
use serde::Serialize;

/// One named step of a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStep {
    pub name: String,
    pub outcome: ActionOutcome,
}

/// Ordered step outcomes of a multi-step UI flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReport {
    pub flow: String,
    pub steps: Vec<FlowStep>,
    /// Set when the flow stopped early
    pub aborted: Option<String>,
}

impl FlowReport {
    pub fn new(flow: impl Into<String>) -> Self {
        Self {
            flow: flow.into(),
            steps: Vec::new(),
            aborted: None,
        }
    }

    /// Appends a step; returns whether it succeeded.
    pub fn record(&mut self, name: impl Into<String>, outcome: ActionOutcome) -> bool {
        let succeeded = outcome.succeeded;
        self.steps.push(FlowStep {
            name: name.into(),
            outcome,
        });
        succeeded
    }

    pub fn abort(&mut self, reason: impl Into<String>) {
        self.aborted = Some(reason.into());
    }

    /// Ran to the end and every step succeeded.
    pub fn completed(&self) -> bool {
        self.aborted.is_none() && self.steps.iter().all(|s| s.outcome.succeeded)
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &FlowStep> {
        self.steps.iter().filter(|s| !s.outcome.succeeded)
    }

    pub fn step(&self, name: &str) -> Option<&FlowStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Converts an incomplete flow into an assertion failure.
    pub fn ensure_completed(&self) -> Result<()> {
        if let Some(step) = self.failed_steps().next() {
            return step
                .outcome
                .ensure(&format!("{}: {}", self.flow, step.name));
        }
        match &self.aborted {
            Some(reason) => Err(Error::Assertion(format!(
                "{} stopped early: {}",
                self.flow, reason
            ))),
            None => Ok(()),
        }
    }
}
