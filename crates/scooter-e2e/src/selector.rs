// Selector - symbolic reference to one or more elements on the page
//
// Page objects declare their selectors as constants; dynamic selectors (FAQ
// panels by index) are built at call time. Drivers translate a Selector into
// whatever their backend understands.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Strategy used to interpret a selector value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
    /// Element `id` attribute
    Id,
    /// Single CSS class name
    ClassName,
}

/// A named way of locating elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    strategy: Strategy,
    value: Cow<'static, str>,
}

impl Selector {
    pub const fn css(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Css,
            value: Cow::Borrowed(value),
        }
    }

    pub const fn xpath(value: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            value: Cow::Borrowed(value),
        }
    }

    pub const fn id(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            value: Cow::Borrowed(value),
        }
    }

    pub const fn class_name(value: &'static str) -> Self {
        Self {
            strategy: Strategy::ClassName,
            value: Cow::Borrowed(value),
        }
    }

    /// Builds a selector from a runtime value.
    pub fn dynamic(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: Cow::Owned(value.into()),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the selector in Playwright's selector syntax.
    ///
    /// CSS passes through unchanged, XPath gets the `xpath=` engine prefix and
    /// id/class are expanded to attribute/class CSS selectors.
    pub fn to_playwright(&self) -> String {
        match self.strategy {
            Strategy::Css => self.value.to_string(),
            Strategy::XPath => format!("xpath={}", self.value),
            Strategy::Id => format!("[id=\"{}\"]", self.value.replace('"', "\\\"")),
            Strategy::ClassName => format!(".{}", self.value),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.strategy {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
            Strategy::Id => "id",
            Strategy::ClassName => "class",
        };
        write!(f, "{} '{}'", kind, self.value)
    }
}
