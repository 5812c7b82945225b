// PlaywrightDriver - Driver backend on top of playwright-rs
//
// Element references are (selector, nth) locators re-evaluated on every call.
// A reference whose index no longer exists, or that Playwright reports as
// detached, surfaces as StaleReference so the page layer can re-resolve it.
// Window handles are the GUIDs of the pages of the single browser context.
// The context keeps closed pages in its list, so closed GUIDs are tracked here
// and filtered out.

use super::{Driver, ElementRef, Key, WindowHandle};
use crate::config::{BrowserKind, SuiteConfig};
use crate::error::{Error, Result};
use crate::selector::{Selector, Strategy};
use async_trait::async_trait;
use parking_lot::Mutex;
use playwright_rs::server::channel_owner::ChannelOwner;
use playwright_rs::{
    Browser, BrowserContext, BrowserContextOptions, ClickOptions, FillOptions, LaunchOptions,
    Locator, Page, Playwright, PressOptions, Viewport,
};
use serde_json::json;
use std::collections::HashSet;

// Resolves the element an ElementRef points at, in page context.
const RESOLVE_JS: &str = r#"
const resolve = ({ strategy, query, index }) => {
    if (strategy === 'xpath') {
        const snapshot = document.evaluate(query, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null);
        return snapshot.snapshotItem(index);
    }
    return document.querySelectorAll(query)[index] || null;
};
"#;

const SET_VALUE_JS: &str = r#"
(arg) => {
    const el = resolve(arg);
    if (!el) return false;
    const setter = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value')?.set;
    if (setter) { setter.call(el, arg.text); } else { el.value = arg.text; }
    el.dispatchEvent(new Event('input', { bubbles: true }));
    el.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}
"#;

const SCROLL_JS: &str = r#"
(arg) => {
    const el = resolve(arg);
    if (!el) return false;
    el.scrollIntoView({ block: 'center' });
    return true;
}
"#;

/// Browser session driven through the Playwright server
pub struct PlaywrightDriver {
    playwright: Playwright,
    browser: Browser,
    context: BrowserContext,
    active: Mutex<Page>,
    closed: Mutex<HashSet<String>>,
    action_timeout_ms: f64,
}

impl PlaywrightDriver {
    /// Starts the Playwright server, launches the configured browser and opens one page.
    pub async fn launch(config: &SuiteConfig) -> Result<Self> {
        tracing::info!(
            "Launching {:?} (headless: {}, {}x{})",
            config.browser,
            config.headless,
            config.window_width,
            config.window_height
        );

        let playwright = Playwright::launch().await?;
        let browser_type = match config.browser {
            BrowserKind::Chromium => playwright.chromium(),
            BrowserKind::Firefox => playwright.firefox(),
            BrowserKind::Webkit => playwright.webkit(),
        };

        let mut launch = LaunchOptions::new().headless(config.headless);
        if config.browser == BrowserKind::Chromium {
            let mut args = config.args.clone();
            args.push(format!(
                "--window-size={},{}",
                config.window_width, config.window_height
            ));
            launch = launch.args(args);
        }
        let browser = browser_type.launch_with_options(launch).await?;

        let context = browser
            .new_context_with_options(
                BrowserContextOptions::builder()
                    .viewport(Viewport {
                        width: config.window_width,
                        height: config.window_height,
                    })
                    .build(),
            )
            .await?;
        let page = context.new_page().await?;

        Ok(Self {
            playwright,
            browser,
            context,
            active: Mutex::new(page),
            closed: Mutex::new(HashSet::new()),
            action_timeout_ms: config.timeout_ms as f64,
        })
    }

    fn page(&self) -> Page {
        self.active.lock().clone()
    }

    /// Locator for `element`, or StaleReference when its index is gone.
    async fn locate(&self, element: &ElementRef) -> Result<Locator> {
        let all = self
            .page()
            .locator(&element.selector().to_playwright())
            .await;
        let count = all.count().await.map_err(|e| self.map_error(element, e))?;
        if element.index() >= count {
            return Err(Error::StaleReference(format!(
                "{} (only {} matches now)",
                element, count
            )));
        }
        Ok(all.nth(element.index() as i32))
    }

    async fn run_script(&self, body: &str, element: &ElementRef, text: Option<&str>) -> Result<()> {
        let selector = element.selector();
        let (strategy, query) = match selector.strategy() {
            Strategy::XPath => ("xpath", selector.value().to_string()),
            _ => ("css", selector.to_playwright()),
        };
        let arg = json!({
            "strategy": strategy,
            "query": query,
            "index": element.index(),
            "text": text,
        });
        let expression = format!("(arg) => {{ {} return ({})(arg); }}", RESOLVE_JS, body.trim());

        let applied: bool = self
            .page()
            .evaluate(&expression, Some(&arg))
            .await
            .map_err(|e| self.map_error(element, e))?;
        if !applied {
            return Err(Error::StaleReference(element.to_string()));
        }
        Ok(())
    }

    fn map_error(&self, element: &ElementRef, err: playwright_rs::Error) -> Error {
        match err {
            playwright_rs::Error::Timeout(msg) => Error::Timeout {
                what: format!("{} ({})", element, msg),
                timeout_ms: self.action_timeout_ms as u64,
            },
            playwright_rs::Error::ElementNotFound(_) => Error::StaleReference(element.to_string()),
            other if other.to_string().contains("not attached to the DOM") => {
                Error::StaleReference(format!("{}: {}", element, other))
            }
            other => Error::Playwright(other),
        }
    }

    /// Pages of the context that have not been closed through this driver.
    fn open_pages(&self) -> Vec<Page> {
        let closed = self.closed.lock();
        self.context
            .pages()
            .into_iter()
            .filter(|page| !closed.contains(page.guid()))
            .collect()
    }

    fn find_page(&self, handle: &WindowHandle) -> Option<Page> {
        self.open_pages()
            .into_iter()
            .find(|page| page.guid() == handle.as_str())
    }
}

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page().goto(url, None).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page().url())
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<ElementRef>> {
        let count = self
            .page()
            .locator(&selector.to_playwright())
            .await
            .count()
            .await?;
        Ok((0..count)
            .map(|index| ElementRef::new(selector.clone(), index, 0))
            .collect())
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        let locator = self.locate(element).await?;
        locator
            .is_visible()
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn is_enabled(&self, element: &ElementRef) -> Result<bool> {
        let locator = self.locate(element).await?;
        locator
            .is_enabled()
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        let locator = self.locate(element).await?;
        let options = ClickOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        locator
            .click(Some(options))
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        let locator = self.locate(element).await?;
        let options = FillOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        locator
            .clear(Some(options))
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn type_text(&self, element: &ElementRef, text: &str) -> Result<()> {
        let locator = self.locate(element).await?;
        let options = FillOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        locator
            .fill(text, Some(options))
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn press_key(&self, element: &ElementRef, key: Key) -> Result<()> {
        let locator = self.locate(element).await?;
        let options = PressOptions::builder()
            .timeout(self.action_timeout_ms)
            .build();
        locator
            .press(key.name(), Some(options))
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        let locator = self.locate(element).await?;
        locator
            .inner_text()
            .await
            .map_err(|e| self.map_error(element, e))
    }

    async fn set_value(&self, element: &ElementRef, value: &str) -> Result<()> {
        self.run_script(SET_VALUE_JS, element, Some(value)).await
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<()> {
        self.run_script(SCROLL_JS, element, None).await
    }

    async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        Ok(self
            .open_pages()
            .iter()
            .map(|page| WindowHandle::new(page.guid()))
            .collect())
    }

    async fn current_window(&self) -> Result<WindowHandle> {
        Ok(WindowHandle::new(self.page().guid()))
    }

    async fn switch_to_window(&self, handle: &WindowHandle) -> Result<()> {
        let page = self
            .find_page(handle)
            .ok_or_else(|| Error::InvalidState(format!("no open window {}", handle)))?;
        *self.active.lock() = page;
        Ok(())
    }

    async fn close_window(&self) -> Result<()> {
        let page = self.page();
        page.close().await?;
        self.closed.lock().insert(page.guid().to_string());
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        tracing::debug!("Closing browser");
        self.browser.close().await?;
        self.playwright.shutdown().await?;
        Ok(())
    }
}
