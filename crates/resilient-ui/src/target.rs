// Target - Capability interface of the browser-automation engine
//
// This crate never drives a browser itself. Everything it needs from one is
// expressed by the `Target` trait; the `playwright` feature provides an
// implementation over playwright-rs, tests provide scripted fakes.
//
// Locators are lightweight, lazy selector values. Chaining follows
// Playwright's selector engine syntax (`a >> nth=0`, `a >> b`).

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// When to consider a navigation or load wait finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    /// The `load` event fired
    Load,
    /// The `DOMContentLoaded` event fired
    #[default]
    DomContentLoaded,
    /// No network connections for at least 500 ms
    NetworkIdle,
    /// Response received and document started loading
    Commit,
}

impl WaitUntil {
    /// Whether a `document.readyState` value satisfies this load state.
    ///
    /// `NetworkIdle` cannot be observed from the document alone and is
    /// treated like `Load`.
    pub fn satisfied_by(self, ready_state: &str) -> bool {
        match self {
            WaitUntil::Commit => true,
            WaitUntil::DomContentLoaded => {
                matches!(ready_state, "interactive" | "complete")
            }
            WaitUntil::Load | WaitUntil::NetworkIdle => ready_state == "complete",
        }
    }
}

/// The operations this crate consumes from a browser page.
///
/// Every method may fail; callers in this crate decide whether a failure is
/// transient, an interaction problem, or fatal.
#[async_trait]
pub trait Target: Send + Sync {
    /// Navigates the page and waits for `wait_until`, bounded by `timeout`.
    async fn navigate(&self, url: &str, wait_until: WaitUntil, timeout: Duration) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    async fn title(&self) -> Result<String>;

    /// Evaluates a JavaScript expression and returns its value as a string.
    async fn evaluate(&self, expression: &str) -> Result<String>;

    /// Number of elements matching `selector` (zero when detached).
    async fn count(&self, selector: &str) -> Result<usize>;

    async fn is_visible(&self, selector: &str) -> Result<bool>;

    async fn is_enabled(&self, selector: &str) -> Result<bool>;

    async fn text_content(&self, selector: &str) -> Result<Option<String>>;

    /// Text content of every element matching `selector`, in document order.
    async fn all_text_contents(&self, selector: &str) -> Result<Vec<String>>;

    async fn input_value(&self, selector: &str) -> Result<String>;

    async fn click(&self, selector: &str) -> Result<()>;

    async fn fill(&self, selector: &str, text: &str) -> Result<()>;

    async fn clear(&self, selector: &str) -> Result<()>;

    /// Focuses `selector` and types `text` key by key.
    async fn type_text(&self, selector: &str, text: &str, delay: Duration) -> Result<()>;

    /// Presses a key chord on the page keyboard (e.g. `Control+A`).
    async fn press_key(&self, key: &str) -> Result<()>;

    /// Captures a PNG screenshot of the page.
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>>;
}

/// Abstract reference to an element of the target UI.
///
/// A locator never queries the target by itself; it is resolved each time
/// an operation uses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
    label: Option<String>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            label: None,
        }
    }

    /// Attaches a human-readable name used in log messages.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the selector string for this locator
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Label if set, otherwise the selector
    pub fn name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.selector)
    }

    /// Creates a locator for the first matching element.
    pub fn first(&self) -> Locator {
        self.derive(format!("{} >> nth=0", self.selector))
    }

    /// Creates a locator for the last matching element.
    pub fn last(&self) -> Locator {
        self.derive(format!("{} >> nth=-1", self.selector))
    }

    /// Creates a locator for the nth matching element (0-indexed).
    pub fn nth(&self, index: i32) -> Locator {
        self.derive(format!("{} >> nth={}", self.selector, index))
    }

    /// Creates a sub-locator within this locator's subtree.
    pub fn locator(&self, selector: &str) -> Locator {
        self.derive(format!("{} >> {}", self.selector, selector))
    }

    fn derive(&self, selector: String) -> Locator {
        Locator {
            selector,
            label: self.label.clone(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", label, self.selector),
            None => f.write_str(&self.selector),
        }
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Locator::new(selector)
    }
}

impl From<String> for Locator {
    fn from(selector: String) -> Self {
        Locator::new(selector)
    }
}
