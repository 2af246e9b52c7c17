// Action - UI mutations and their non-throwing outcomes

use crate::error::{Error, ErrorInfo, ErrorKind, Result};
use crate::target::Target;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-key delay for [`Action::Type`] (50ms)
pub const DEFAULT_TYPE_DELAY: Duration = Duration::from_millis(50);

/// A single mutation of the target UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    Fill(String),
    Clear,
    /// Clear, then fill
    ClearAndFill(String),
    /// Type key by key with a delay between keys
    Type { text: String, delay: Duration },
    /// Press a key chord on the focused element
    Press(String),
    /// Click, select all, delete, fill, then read the value back.
    /// A read-back mismatch is an interaction error.
    Replace(String),
}

impl Action {
    /// Type with the default per-key delay.
    pub fn type_text(text: impl Into<String>) -> Self {
        Action::Type {
            text: text.into(),
            delay: DEFAULT_TYPE_DELAY,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Click => "click",
            Action::Fill(_) => "fill",
            Action::Clear => "clear",
            Action::ClearAndFill(_) => "clear and fill",
            Action::Type { .. } => "type",
            Action::Press(_) => "press",
            Action::Replace(_) => "replace",
        }
    }

    /// Applies the action to `selector`. Errors are reported as interaction errors.
    pub(crate) async fn apply(&self, target: &dyn Target, selector: &str) -> Result<()> {
        let result: Result<()> = async {
            match self {
                Action::Click => target.click(selector).await,
                Action::Fill(text) => target.fill(selector, text).await,
                Action::Clear => target.clear(selector).await,
                Action::ClearAndFill(text) => {
                    target.clear(selector).await?;
                    target.fill(selector, text).await
                }
                Action::Type { text, delay } => target.type_text(selector, text, *delay).await,
                Action::Press(key) => {
                    target.click(selector).await?;
                    target.press_key(key).await
                }
                Action::Replace(text) => {
                    target.click(selector).await?;
                    target.press_key("Control+A").await?;
                    target.press_key("Delete").await?;
                    target.fill(selector, text).await?;
                    let actual = target.input_value(selector).await?;
                    if actual != *text {
                        return Err(Error::interaction(
                            selector,
                            format!("expected value '{}', read back '{}'", text, actual),
                        ));
                    }
                    Ok(())
                }
            }
        }
        .await;

        result.map_err(|e| match e {
            Error::Interaction { .. } => e,
            other => Error::interaction(selector, other),
        })
    }
}

/// Result of an attempted UI mutation; always a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub succeeded: bool,
    pub attempts: u32,
    pub last_error: Option<ErrorInfo>,
}

impl ActionOutcome {
    pub fn success(attempts: u32) -> Self {
        Self {
            succeeded: true,
            attempts,
            last_error: None,
        }
    }

    pub fn failure(attempts: u32, error: &Error) -> Self {
        Self {
            succeeded: false,
            attempts,
            last_error: Some(error.info()),
        }
    }

    /// Kind of the last recorded error, if any
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.last_error.as_ref().map(|e| e.kind)
    }

    /// Converts a failed outcome into an assertion failure naming `what`.
    pub fn ensure(&self, what: &str) -> Result<()> {
        if self.succeeded {
            return Ok(());
        }
        let reason = self
            .last_error
            .as_ref()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "no error recorded".to_string());
        Err(Error::Assertion(format!(
            "{} did not succeed after {} attempt(s): {}",
            what, self.attempts, reason
        )))
    }
}
