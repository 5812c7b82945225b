// Error types for scooter-e2e

use thiserror::Error;

/// Result type alias for page, service and driver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the scooter site
#[derive(Debug, Error)]
pub enum Error {
    /// Caller contract violation (bad index, blank id, zero timeout).
    ///
    /// Always raised before any browser interaction and never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A waited-for condition did not hold within the configured horizon
    ///
    /// Contains the selector (or probe description), the condition that was
    /// expected and the horizon that elapsed.
    #[error("Timeout after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    /// The browser invalidated a previously resolved element
    ///
    /// Raised by drivers when the DOM was re-rendered between resolution and
    /// action. Page code recovers from it once through `wait::retry_on_stale`.
    #[error("Stale element reference: {0}")]
    StaleReference(String),

    /// A navigation's follow-through could not be confirmed
    #[error("Navigation failed while {action}: {source}")]
    NavigationFailed {
        action: String,
        #[source]
        source: Box<Error>,
    },

    /// Operation is not valid in the current session or window state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A required element was resolved but the expected entry was missing
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Generic failure reported by a browser driver backend
    #[error("Driver error: {0}")]
    Driver(String),

    /// Suite configuration could not be built
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error surfaced by the Playwright backend that has no closer mapping
    #[cfg(feature = "playwright")]
    #[error("Playwright error: {0}")]
    Playwright(#[from] playwright_rs::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// Wraps the error as a failed navigation
    pub fn navigation(self, action: impl Into<String>) -> Self {
        Error::NavigationFailed {
            action: action.into(),
            source: Box::new(self),
        }
    }

    /// Returns true for timeouts, looking through `Context` wrappers.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Context(_, inner) => inner.is_timeout(),
            _ => false,
        }
    }

    /// Returns true for stale element references, looking through `Context` wrappers.
    pub fn is_stale(&self) -> bool {
        match self {
            Error::StaleReference(_) => true,
            Error::Context(_, inner) => inner.is_stale(),
            _ => false,
        }
    }
}
