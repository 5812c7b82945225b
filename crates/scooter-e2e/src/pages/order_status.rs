// Order status - track an order by its number

use super::{LandingPage, click_when_clickable};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::wait::{self, Condition, Outcome};

pub mod locators {
    use crate::selector::Selector;

    pub const ORDER_ID: Selector = Selector::xpath("//input[@placeholder='Введите номер заказа']");
    pub const GO: Selector = Selector::xpath("//button[text()='Go!']");
    pub const NOT_FOUND: Selector = Selector::class_name("Track_NotFound__6oaoY");
    pub const SCOOTER_LOGO: Selector = Selector::class_name("Header_LogoScooter__3lsAR");
}

/// Handle to the order status lookup
#[derive(Debug, Clone)]
pub struct OrderStatusPage {
    session: Session,
}

impl OrderStatusPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Enters `order_id` and submits the lookup.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` for a blank id, before the browser is touched.
    pub async fn lookup_order(&self, order_id: &str) -> Result<&Self> {
        if order_id.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "order id must not be blank".to_string(),
            ));
        }

        let driver = self.session.driver()?;
        let field = &self.session.wait_for(locators::ORDER_ID, Condition::Visible);
        wait::retry_on_stale(
            "entering order id",
            move || field.resolve_one(driver),
            move |element| async move { driver.set_value(&element, order_id).await },
        )
        .await?;

        let go = &self.session.wait_for(locators::GO, Condition::Present);
        wait::retry_on_stale(
            "submitting order lookup",
            move || go.resolve_one(driver),
            move |element| async move {
                driver.scroll_into_view(&element).await?;
                driver.click(&element).await
            },
        )
        .await?;

        tracing::debug!("Looked up order '{}'", order_id);
        Ok(self)
    }

    /// Whether the "no such order" picture is shown.
    pub async fn not_found_indicator(&self) -> Outcome {
        match self.session.driver() {
            Ok(driver) => {
                self.session
                    .wait_for(locators::NOT_FOUND, Condition::Visible)
                    .observe(driver)
                    .await
            }
            Err(e) => {
                tracing::warn!("Cannot check the not-found indicator: {}", e);
                Outcome::Unknown
            }
        }
    }

    pub async fn is_not_found_indicator_shown(&self) -> bool {
        self.not_found_indicator().await.is_shown()
    }

    /// Clicks the scooter logo and waits until the landing page URL is loaded.
    ///
    /// # Errors
    ///
    /// `Error::NavigationFailed` wrapping whatever went wrong.
    pub async fn return_to_landing(self) -> Result<LandingPage> {
        const ACTION: &str = "returning to the landing page";

        click_when_clickable(&self.session, locators::SCOOTER_LOGO)
            .await
            .map_err(|e| e.navigation(ACTION))?;

        let driver = self.session.driver().map_err(|e| e.navigation(ACTION))?;
        let base_url = self.session.base_url();
        wait::poll_until(
            &format!("URL to become {}", base_url),
            self.session.timeout(),
            self.session.poll_interval(),
            move || async move { Ok(driver.current_url().await? == base_url) },
        )
        .await
        .map_err(|e| e.navigation(ACTION))?;

        Ok(LandingPage::new(self.session))
    }
}
