// Landing page - entry points, FAQ accordion and window handling
//
// The landing page is where every flow starts: the cookie notice, the two
// "order" buttons, the order status button in the header and the FAQ
// accordion. Clicking the Yandex logo opens a second tab, so window handling
// lives here too.

use super::{FAQ_COUNT, OrderFormPage, OrderStatusPage, check_faq_index, click_when_clickable};
use crate::driver::WindowHandle;
use crate::error::{Error, Result};
use crate::order::EntryPoint;
use crate::session::Session;
use crate::wait::{self, Condition, Outcome};
use std::time::Duration;

/// Longest time spent looking for the cookie notice.
///
/// The notice renders with the page, so a short look is enough to tell
/// "absent" from "not rendered yet".
pub const COOKIE_NOTICE_HORIZON: Duration = Duration::from_secs(5);

pub mod locators {
    use crate::selector::{Selector, Strategy};

    pub const COOKIE_BANNER: Selector = Selector::class_name("App_CookieConsent__1yUIN");
    pub const COOKIE_ACCEPT: Selector = Selector::id("rcc-confirm-button");
    pub const ORDER_TOP: Selector = Selector::xpath(
        ".//button[text()='Заказать' and contains(@class, 'Button_Button__ra12g')]",
    );
    pub const ORDER_BOTTOM: Selector =
        Selector::xpath(".//div[contains(@class, 'Home_FinishButton')]/button[text()='Заказать']");
    pub const ORDER_STATUS: Selector = Selector::xpath(".//button[text()='Статус заказа']");
    pub const YANDEX_LOGO: Selector = Selector::class_name("Header_LogoYandex__3TSOI");
    pub const FAQ_HEADINGS: Selector = Selector::css("[id^='accordion__heading-']");

    /// Answer panel of FAQ entry `index`.
    pub fn faq_panel(index: usize) -> Selector {
        Selector::dynamic(Strategy::Id, format!("accordion__panel-{}", index))
    }
}

/// Handle to the landing page
#[derive(Debug, Clone)]
pub struct LandingPage {
    session: Session,
    origin_window: Option<WindowHandle>,
}

impl LandingPage {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            origin_window: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Accepts the cookie notice if it is shown.
    ///
    /// Never fails: `NotShown` when there was no notice, `Unknown` when the
    /// notice could not be inspected or dismissed (logged).
    pub async fn dismiss_cookie_notice(&self) -> Outcome {
        let driver = match self.session.driver() {
            Ok(driver) => driver,
            Err(e) => {
                tracing::warn!("Cannot look for cookie notice: {}", e);
                return Outcome::Unknown;
            }
        };

        let horizon = self.session.timeout().min(COOKIE_NOTICE_HORIZON);
        let banner = self
            .session
            .wait_for(locators::COOKIE_BANNER, Condition::Visible)
            .with_timeout(horizon);

        match banner.observe(driver).await {
            Outcome::Shown => match click_when_clickable(&self.session, locators::COOKIE_ACCEPT).await {
                Ok(()) => {
                    tracing::debug!("Cookie notice dismissed");
                    Outcome::Shown
                }
                Err(e) => {
                    tracing::warn!("Cookie notice shown but could not be dismissed: {}", e);
                    Outcome::Unknown
                }
            },
            Outcome::NotShown => {
                tracing::debug!("Cookie notice not shown or already dismissed");
                Outcome::NotShown
            }
            Outcome::Unknown => Outcome::Unknown,
        }
    }

    /// Starts the order flow through the chosen "order" button.
    pub async fn start_order(&self, entry: EntryPoint) -> Result<OrderFormPage> {
        let selector = match entry {
            EntryPoint::Top => locators::ORDER_TOP,
            EntryPoint::Bottom => locators::ORDER_BOTTOM,
        };
        tracing::debug!("Starting order through {:?} entry point", entry);
        click_when_clickable(&self.session, selector).await?;
        Ok(OrderFormPage::new(self.session.clone()))
    }

    /// Opens the order status lookup from the header.
    pub async fn open_order_status_lookup(&self) -> Result<OrderStatusPage> {
        click_when_clickable(&self.session, locators::ORDER_STATUS).await?;
        Ok(OrderStatusPage::new(self.session.clone()))
    }

    /// Clicks the Yandex logo, which opens yandex.ru in a new tab.
    pub async fn open_yandex_home(&self) -> Result<()> {
        click_when_clickable(&self.session, locators::YANDEX_LOGO).await
    }

    /// Expands FAQ entry `index` (0-7).
    ///
    /// Collapsing the previously open entry re-renders the accordion, so a
    /// stale heading is re-resolved from the full list once.
    pub async fn open_faq_panel(&self, index: usize) -> Result<()> {
        check_faq_index(index)?;

        let driver = self.session.driver()?;
        let headings = self
            .session
            .wait_for(locators::FAQ_HEADINGS, Condition::AllPresent);
        let headings = &headings;

        wait::retry_on_stale(
            &format!("opening FAQ entry {}", index),
            move || async move {
                let all = headings.resolve(driver).await?;
                let count = all.len();
                all.into_iter().nth(index).ok_or_else(|| {
                    Error::ElementNotFound(format!(
                        "FAQ heading {} (page shows {} of {})",
                        index, count, FAQ_COUNT
                    ))
                })
            },
            move |heading| async move {
                driver.scroll_into_view(&heading).await?;
                driver.click(&heading).await
            },
        )
        .await
    }

    /// Waits for the answer of FAQ entry `index` (0-7) and returns its text, trimmed.
    pub async fn read_faq_answer(&self, index: usize) -> Result<String> {
        check_faq_index(index)?;

        let driver = self.session.driver()?;
        let panel = self
            .session
            .wait_for(locators::faq_panel(index), Condition::Visible);
        let panel = &panel;

        let text = wait::retry_on_stale(
            &format!("reading FAQ answer {}", index),
            move || panel.resolve_one(driver),
            move |element| async move { driver.text(&element).await },
        )
        .await?;

        Ok(text.trim().to_string())
    }

    pub async fn current_url(&self) -> Result<String> {
        self.session.driver()?.current_url().await
    }

    pub async fn current_window(&self) -> Result<WindowHandle> {
        self.session.driver()?.current_window().await
    }

    pub async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
        self.session.driver()?.window_handles().await
    }

    /// Waits until exactly `count` windows are open.
    pub async fn wait_for_window_count(&self, count: usize) -> Result<()> {
        let driver = self.session.driver()?;
        wait::poll_until(
            &format!("{} open windows", count),
            self.session.timeout(),
            self.session.poll_interval(),
            move || async move { Ok(driver.window_handles().await?.len() == count) },
        )
        .await
    }

    /// Switches to the one window that is not the current one.
    ///
    /// The window switched away from is remembered and restored by
    /// [`close_current_window`](Self::close_current_window).
    ///
    /// # Errors
    ///
    /// `Error::InvalidState` unless exactly one other window is open.
    pub async fn switch_to_other_window(&mut self) -> Result<WindowHandle> {
        let driver = self.session.driver()?;
        let current = driver.current_window().await?;
        let others: Vec<WindowHandle> = driver
            .window_handles()
            .await?
            .into_iter()
            .filter(|handle| *handle != current)
            .collect();

        match others.as_slice() {
            [other] => {
                driver.switch_to_window(other).await?;
                tracing::debug!("Switched from window {} to {}", current, other);
                self.origin_window = Some(current);
                Ok(other.clone())
            }
            [] => Err(Error::InvalidState(
                "no window other than the current one is open".to_string(),
            )),
            many => Err(Error::InvalidState(format!(
                "{} other windows are open; cannot tell which one to switch to",
                many.len()
            ))),
        }
    }

    /// Closes the current window and returns to the remembered one, if any.
    pub async fn close_current_window(&mut self) -> Result<()> {
        let driver = self.session.driver()?;
        driver.close_window().await?;
        if let Some(origin) = self.origin_window.take() {
            driver.switch_to_window(&origin).await?;
            tracing::debug!("Returned to window {}", origin);
        }
        Ok(())
    }
}
