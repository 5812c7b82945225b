// Page handles
//
// Each handle is bound to one logical page of the site and to the shared
// Session. Operations that navigate return the handle of the page they lead
// to. Locators are public so that fakes and diagnostics can refer to the same
// elements the handles use.

pub mod landing;
pub mod order_form;
pub mod order_status;

pub use landing::LandingPage;
pub use order_form::OrderFormPage;
pub use order_status::OrderStatusPage;

use crate::error::{Error, Result};
use crate::selector::Selector;
use crate::session::Session;
use crate::wait::{self, Condition};

/// Number of entries in the landing page FAQ accordion
pub const FAQ_COUNT: usize = 8;

/// Rejects FAQ indices outside `0..FAQ_COUNT`.
pub(crate) fn check_faq_index(index: usize) -> Result<()> {
    if index >= FAQ_COUNT {
        return Err(Error::InvalidArgument(format!(
            "FAQ index must be between 0 and {}, got {}",
            FAQ_COUNT - 1,
            index
        )));
    }
    Ok(())
}

/// Waits until `selector` is clickable, scrolls it into view and clicks it.
pub(crate) async fn click_when_clickable(session: &Session, selector: Selector) -> Result<()> {
    let driver = session.driver()?;
    let what = format!("clicking {}", selector);
    let spec = session.wait_for(selector, Condition::Clickable);
    let spec = &spec;

    wait::retry_on_stale(
        &what,
        move || spec.resolve_one(driver),
        move |element| async move {
            driver.scroll_into_view(&element).await?;
            driver.click(&element).await
        },
    )
    .await
}

/// Replaces the text of the field at `selector`, unless `value` is empty.
///
/// An empty value leaves the field untouched so that the site's own
/// validation can be exercised.
pub(crate) async fn fill_if_given(session: &Session, selector: Selector, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    let driver = session.driver()?;
    let what = format!("filling {}", selector);
    let spec = session.wait_for(selector, Condition::Present);
    let spec = &spec;

    wait::retry_on_stale(
        &what,
        move || spec.resolve_one(driver),
        move |element| async move {
            driver.clear(&element).await?;
            driver.type_text(&element, value).await
        },
    )
    .await
}
