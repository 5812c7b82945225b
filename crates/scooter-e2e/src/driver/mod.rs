// Driver - the boundary between page objects and a live browser
//
// Everything the page layer does to the browser goes through this trait:
// navigation, element lookup, the interaction primitives, script-level value
// injection and window handling. Backends are injected; page objects never
// know which one they talk to.

#[cfg(feature = "playwright")]
pub mod playwright;

use crate::error::Result;
use crate::selector::Selector;
use async_trait::async_trait;
use std::fmt;

/// Reference to one element resolved from a selector.
///
/// `index` is the element's position among the selector's matches at
/// resolution time. `token` is backend-defined and lets a backend detect that
/// the element it referred to has since been re-rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    selector: Selector,
    index: usize,
    token: u64,
}

impl ElementRef {
    pub fn new(selector: Selector, index: usize, token: u64) -> Self {
        Self {
            selector,
            index,
            token,
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.selector, self.index)
    }
}

/// Opaque identifier of a browser window or tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keys the page objects need to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

impl Key {
    /// Key name as understood by Playwright's `press`.
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
            Key::Escape => "Escape",
        }
    }
}

/// Remote browser session as seen by the page layer.
///
/// Element operations return [`Error::StaleReference`](crate::Error::StaleReference)
/// when the referenced element is no longer attached to the document.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Navigates the active window to `url`.
    async fn goto(&self, url: &str) -> Result<()>;

    /// URL of the active window.
    async fn current_url(&self) -> Result<String>;

    /// Resolves every element currently matching `selector`, in document order.
    ///
    /// Returns an empty list when nothing matches; never waits.
    async fn find_all(&self, selector: &Selector) -> Result<Vec<ElementRef>>;

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool>;

    async fn click(&self, element: &ElementRef) -> Result<()>;

    async fn clear(&self, element: &ElementRef) -> Result<()>;

    /// Types `text` into the element.
    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()>;

    async fn press_key(&self, element: &ElementRef, key: Key) -> Result<()>;

    /// Rendered text of the element.
    async fn text(&self, element: &ElementRef) -> Result<String>;

    /// Assigns `value` to the element's `value` property from script,
    /// bypassing simulated keystrokes.
    async fn set_value(&self, element: &ElementRef, value: &str) -> Result<()>;

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<()>;

    /// Handles of all open windows, in no particular order.
    async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

    async fn current_window(&self) -> Result<WindowHandle>;

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()>;

    /// Closes the active window. The caller must switch to another handle
    /// before issuing further commands.
    async fn close_window(&self) -> Result<()>;

    /// Shuts the browser down. Further calls are invalid.
    async fn quit(&self) -> Result<()>;
}
