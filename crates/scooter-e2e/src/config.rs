// Suite configuration
//
// Everything a session needs to know before the first navigation: where the
// site lives, which browser to drive and how long waits may take. Values come
// from the builder, optionally overridden by SCOOTER_* environment variables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Production address of the site under test.
pub const DEFAULT_BASE_URL: &str = "https://qa-scooter.praktikum-services.ru/";

/// Default wait horizon (15 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default polling interval for waits (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const ENV_BASE_URL: &str = "SCOOTER_BASE_URL";
pub const ENV_BROWSER: &str = "SCOOTER_BROWSER";
pub const ENV_HEADLESS: &str = "SCOOTER_HEADLESS";
pub const ENV_TIMEOUT_SECS: &str = "SCOOTER_TIMEOUT_SECS";

/// Browser engine to launch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserKind::Chromium),
            "firefox" => Ok(BrowserKind::Firefox),
            "webkit" | "safari" => Ok(BrowserKind::Webkit),
            other => Err(Error::Config(format!(
                "unknown browser '{}', expected chromium, firefox or webkit",
                other
            ))),
        }
    }
}

/// Settings shared by every session of a test run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteConfig {
    /// Normalised base URL of the site (always ends with `/`)
    pub base_url: String,
    pub browser: BrowserKind,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// Wait horizon in milliseconds
    pub timeout_ms: u64,
    /// Wait polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Extra arguments passed to the browser process
    pub args: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            browser: BrowserKind::default(),
            headless: true,
            window_width: 1920,
            window_height: 1080,
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            args: vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
        }
    }
}

impl SuiteConfig {
    pub fn builder() -> SuiteConfigBuilder {
        SuiteConfigBuilder::default()
    }

    /// Defaults overridden by the `SCOOTER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::builder().env_overrides(|key| std::env::var(key).ok()).build()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Builder for SuiteConfig
///
/// Unset fields keep their defaults. `build()` validates the base URL and the
/// timing values.
#[derive(Debug, Clone, Default)]
pub struct SuiteConfigBuilder {
    base_url: Option<String>,
    browser: Option<BrowserKind>,
    headless: Option<bool>,
    window_size: Option<(u32, u32)>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    args: Option<Vec<String>>,
    errors: Vec<String>,
}

impl SuiteConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn browser(mut self, browser: BrowserKind) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = Some(headless);
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    /// Applies `SCOOTER_*` overrides looked up through `lookup`.
    ///
    /// Taking a lookup function keeps tests independent of the process
    /// environment.
    pub fn env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
        if let Some(browser) = lookup(ENV_BROWSER) {
            match browser.parse() {
                Ok(kind) => self.browser = Some(kind),
                Err(e) => self.errors.push(e.to_string()),
            }
        }
        if let Some(headless) = lookup(ENV_HEADLESS) {
            match headless.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.headless = Some(true),
                "0" | "false" | "no" => self.headless = Some(false),
                other => self
                    .errors
                    .push(format!("{} must be a boolean, got '{}'", ENV_HEADLESS, other)),
            }
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.timeout = Some(Duration::from_secs(secs)),
                Err(_) => self.errors.push(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_TIMEOUT_SECS, secs
                )),
            }
        }
        self
    }

    pub fn build(self) -> Result<SuiteConfig> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(Error::Config(first));
        }

        let defaults = SuiteConfig::default();

        let base_url = match self.base_url {
            Some(raw) => {
                let parsed = url::Url::parse(raw.trim())
                    .map_err(|e| Error::Config(format!("invalid base URL '{}': {}", raw, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(Error::Config(format!(
                        "base URL must be http(s), got '{}'",
                        parsed.scheme()
                    )));
                }
                parsed.to_string()
            }
            None => defaults.base_url,
        };

        // Stored in whole milliseconds; anything that rounds down to 0 is rejected
        let timeout_ms = self.timeout.unwrap_or(DEFAULT_TIMEOUT).as_millis() as u64;
        if timeout_ms == 0 {
            return Err(Error::Config(
                "timeout must be at least 1ms".to_string(),
            ));
        }
        let poll_interval_ms = self
            .poll_interval
            .unwrap_or(DEFAULT_POLL_INTERVAL)
            .as_millis() as u64;
        if poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll interval must be at least 1ms".to_string(),
            ));
        }

        let (window_width, window_height) = self
            .window_size
            .unwrap_or((defaults.window_width, defaults.window_height));

        Ok(SuiteConfig {
            base_url,
            browser: self.browser.unwrap_or(defaults.browser),
            headless: self.headless.unwrap_or(defaults.headless),
            window_width,
            window_height,
            timeout_ms,
            poll_interval_ms,
            args: self.args.unwrap_or(defaults.args),
        })
    }
}
