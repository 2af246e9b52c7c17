// Error types for resilient-ui
//
// Three kinds of failure matter to a test run: elements that are not there
// yet (transient), actions that raised while executing (interaction), and
// explicit checks that did not hold (assertion). Only the last one should
// fail a test; the other two are recorded and reported.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for resilient-ui operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a target UI
#[derive(Debug, Error)]
pub enum Error {
    /// Element did not reach the awaited state within its bound
    ///
    /// Expected on slow or asynchronously rendering pages; recovered by
    /// probing again, retrying, or falling back to another selector.
    #[error("Element not ready: '{selector}' after {waited:?}")]
    Transient { selector: String, waited: Duration },

    /// An action raised while executing against the target
    #[error("Interaction failed on '{selector}': {message}")]
    Interaction { selector: String, message: String },

    /// Error raised by the capability itself (navigation, evaluation, I/O with the browser)
    #[error("Target error: {0}")]
    Target(String),

    /// Bounded wait on something other than an element expired
    #[error("Timeout: {0}")]
    Timeout(String),

    /// An explicit invariant check failed
    #[error("Assertion failed: {0}")]
    Assertion(String),

    /// Invalid configuration value
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

/// Classification of an [`Error`] for reporting and pass/fail decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Element not yet present or not yet in the awaited state
    Transient,
    /// Action raised while executing
    Interaction,
    /// Explicit check failed
    Assertion,
    /// Configuration, filesystem or serialization problem outside the UI
    Setup,
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Shorthand for an interaction error on `selector`.
    pub fn interaction(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Error::Interaction {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transient { .. } | Error::Timeout(_) => ErrorKind::Transient,
            Error::Interaction { .. } | Error::Target(_) => ErrorKind::Interaction,
            Error::Assertion(_) => ErrorKind::Assertion,
            Error::Config { .. } | Error::InvalidArgument(_) | Error::Io(_) | Error::Json(_) => {
                ErrorKind::Setup
            }
            Error::Context(_, inner) => inner.kind(),
        }
    }

    /// Returns a cloneable record of this error.
    pub fn info(&self) -> ErrorInfo {
        ErrorInfo {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Cloneable, serializable snapshot of an [`Error`].
///
/// Carried by [`ActionOutcome`](crate::ActionOutcome) and collected as
/// diagnostics, so information about swallowed failures is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(err: &Error) -> Self {
        err.info()
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let transient = Error::Transient {
            selector: "#add".to_string(),
            waited: Duration::from_millis(3000),
        };
        assert_eq!(transient.kind(), ErrorKind::Transient);
        assert_eq!(Error::Timeout("url".into()).kind(), ErrorKind::Transient);
        assert_eq!(
            Error::interaction("#submit", "detached").kind(),
            ErrorKind::Interaction
        );
        assert_eq!(Error::Target("crashed".into()).kind(), ErrorKind::Interaction);
        assert_eq!(Error::Assertion("x".into()).kind(), ErrorKind::Assertion);
        assert_eq!(
            Error::InvalidArgument("bad regex".into()).kind(),
            ErrorKind::Setup
        );
    }

    #[test]
    fn test_context_keeps_inner_kind() {
        let err = Error::Assertion("row missing".into()).context("add user");
        assert_eq!(err.kind(), ErrorKind::Assertion);
        assert_eq!(err.to_string(), "add user: Assertion failed: row missing");
    }

    #[test]
    fn test_error_info_message() {
        let info = Error::interaction("#login", "element is detached").info();
        assert_eq!(info.kind, ErrorKind::Interaction);
        assert_eq!(
            info.message,
            "Interaction failed on '#login': element is detached"
        );
        assert_eq!(
            serde_json::to_value(&info).unwrap()["kind"],
            serde_json::json!("interaction")
        );
    }
}
