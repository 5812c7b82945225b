// Order form - the two-step "who is it for" / "about rental" form
//
// Blank values leave their field untouched so negative scenarios can submit
// an incomplete form and count the validation messages the site shows.

use super::{click_when_clickable, fill_if_given};
use crate::driver::{ElementRef, Key};
use crate::error::{Error, Result};
use crate::order::{Color, RentalPeriod};
use crate::session::Session;
use crate::wait::{self, Condition, Outcome};

pub mod locators {
    use crate::selector::Selector;

    pub const NAME: Selector = Selector::xpath("//input[@placeholder='* Имя']");
    pub const SURNAME: Selector = Selector::xpath("//input[@placeholder='* Фамилия']");
    pub const ADDRESS: Selector =
        Selector::xpath("//input[@placeholder='* Адрес: куда привезти заказ']");
    pub const METRO: Selector = Selector::xpath("//input[@placeholder='* Станция метро']");
    pub const METRO_LIST: Selector = Selector::css(".select-search__select");
    pub const METRO_OPTIONS: Selector = Selector::css(".select-search__option");
    pub const PHONE: Selector =
        Selector::xpath("//input[@placeholder='* Телефон: на него позвонит курьер']");
    pub const NEXT: Selector = Selector::xpath("//button[text()='Далее']");

    pub const RENTAL_HEADER: Selector = Selector::xpath("//div[text()='Про аренду']");
    pub const DATE: Selector = Selector::xpath("//input[@placeholder='* Когда привезти самокат']");
    pub const PERIOD_DROPDOWN: Selector = Selector::class_name("Dropdown-placeholder");
    pub const PERIOD_OPTIONS: Selector = Selector::css(".Dropdown-option");
    pub const COLOR_BLACK: Selector = Selector::id("black");
    pub const COLOR_GREY: Selector = Selector::id("grey");
    pub const COMMENT: Selector = Selector::xpath("//input[@placeholder='Комментарий для курьера']");
    pub const SUBMIT: Selector =
        Selector::xpath("//button[contains(@class, 'Button_Middle') and text()='Заказать']");
    pub const CONFIRM: Selector = Selector::xpath("//button[text()='Да']");

    pub const SUCCESS_HEADER: Selector = Selector::class_name("Order_ModalHeader__3FDaJ");
    pub const VALIDATION_ERRORS: Selector = Selector::css(".Input_ErrorMessage__3HvIb");
}

/// Handle to the order form
#[derive(Debug, Clone)]
pub struct OrderFormPage {
    session: Session,
}

impl OrderFormPage {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Fills the first step and moves on with "next".
    ///
    /// Empty values (and a `None` station) leave their field blank.
    pub async fn fill_contact_step(
        &self,
        name: &str,
        surname: &str,
        address: &str,
        metro_station: Option<&str>,
        phone: &str,
    ) -> Result<()> {
        tracing::debug!("Filling contact step");
        fill_if_given(&self.session, locators::NAME, name).await?;
        fill_if_given(&self.session, locators::SURNAME, surname).await?;
        fill_if_given(&self.session, locators::ADDRESS, address).await?;
        if let Some(station) = metro_station.filter(|s| !s.is_empty()) {
            self.select_metro_station(station).await?;
        }
        fill_if_given(&self.session, locators::PHONE, phone).await?;
        click_when_clickable(&self.session, locators::NEXT).await
    }

    /// Types `station` into the metro type-ahead and picks a suggestion.
    ///
    /// Picks the first suggestion containing `station`, else the first one
    /// shown. Ambiguous names are not disambiguated.
    pub async fn select_metro_station(&self, station: &str) -> Result<()> {
        fill_if_given(&self.session, locators::METRO, station).await?;

        let driver = self.session.driver()?;
        self.session
            .wait_for(locators::METRO_LIST, Condition::Visible)
            .resolve(driver)
            .await?;

        let options = &self.session.wait_for(locators::METRO_OPTIONS, Condition::AllPresent);
        wait::retry_on_stale(
            &format!("choosing metro station '{}'", station),
            move || async move {
                let suggestions = match options.resolve(driver).await {
                    Ok(found) => found,
                    Err(e) if e.is_timeout() => {
                        return Err(Error::ElementNotFound(format!(
                            "no metro suggestions for '{}'",
                            station
                        )));
                    }
                    Err(e) => return Err(e),
                };
                pick_suggestion(driver, suggestions, station).await
            },
            move |suggestion| async move {
                driver.scroll_into_view(&suggestion).await?;
                driver.click(&suggestion).await
            },
        )
        .await
    }

    /// Fills the second step, submits the order and confirms it.
    ///
    /// `None` and empty values leave their control untouched.
    pub async fn fill_delivery_step(
        &self,
        date: &str,
        rental_period: Option<RentalPeriod>,
        color: Option<Color>,
        comment: Option<&str>,
    ) -> Result<()> {
        let driver = self.session.driver()?;
        self.session
            .wait_for(locators::RENTAL_HEADER, Condition::Visible)
            .resolve(driver)
            .await
            .map_err(|e| e.context("waiting for the rental step"))?;
        tracing::debug!("Filling delivery step");

        if !date.is_empty() {
            self.set_delivery_date(date).await?;
        }
        if let Some(period) = rental_period {
            self.choose_rental_period(period).await?;
        }
        if let Some(color) = color {
            let swatch = match color {
                Color::Black => locators::COLOR_BLACK,
                Color::Grey => locators::COLOR_GREY,
            };
            click_when_clickable(&self.session, swatch).await?;
        }
        if let Some(comment) = comment {
            fill_if_given(&self.session, locators::COMMENT, comment).await?;
        }

        click_when_clickable(&self.session, locators::SUBMIT).await?;
        click_when_clickable(&self.session, locators::CONFIRM).await
    }

    // The date picker swallows typed input, so the value is assigned directly
    // and committed with Enter.
    async fn set_delivery_date(&self, date: &str) -> Result<()> {
        let driver = self.session.driver()?;
        let field = &self.session.wait_for(locators::DATE, Condition::Visible);
        wait::retry_on_stale(
            "setting delivery date",
            move || field.resolve_one(driver),
            move |element| async move {
                driver.set_value(&element, date).await?;
                driver.press_key(&element, Key::Enter).await
            },
        )
        .await
    }

    async fn choose_rental_period(&self, period: RentalPeriod) -> Result<()> {
        click_when_clickable(&self.session, locators::PERIOD_DROPDOWN).await?;

        let driver = self.session.driver()?;
        let options = &self.session.wait_for(locators::PERIOD_OPTIONS, Condition::AllPresent);
        let label = period.label();
        wait::retry_on_stale(
            &format!("choosing rental period '{}'", label),
            move || async move {
                for option in options.resolve(driver).await? {
                    if driver.text(&option).await?.trim() == label {
                        return Ok(option);
                    }
                }
                Err(Error::ElementNotFound(format!(
                    "rental period option '{}'",
                    label
                )))
            },
            move |option| async move {
                driver.scroll_into_view(&option).await?;
                driver.click(&option).await
            },
        )
        .await
    }

    /// Whether the "order placed" dialog appeared within the wait horizon.
    pub async fn order_confirmation(&self) -> Outcome {
        match self.session.driver() {
            Ok(driver) => {
                self.session
                    .wait_for(locators::SUCCESS_HEADER, Condition::Visible)
                    .observe(driver)
                    .await
            }
            Err(e) => {
                tracing::warn!("Cannot check order confirmation: {}", e);
                Outcome::Unknown
            }
        }
    }

    pub async fn is_order_confirmed(&self) -> bool {
        self.order_confirmation().await.is_shown()
    }

    /// Number of validation messages on screen; 0 when none appear in time.
    pub async fn count_validation_errors(&self) -> Result<usize> {
        let driver = self.session.driver()?;
        match self
            .session
            .wait_for(locators::VALIDATION_ERRORS, Condition::AllPresent)
            .resolve(driver)
            .await
        {
            Ok(errors) => {
                tracing::debug!("{} validation messages shown", errors.len());
                Ok(errors.len())
            }
            Err(e) if e.is_timeout() => Ok(0),
            Err(e) => Err(e),
        }
    }
}

async fn pick_suggestion(
    driver: &dyn crate::driver::Driver,
    suggestions: Vec<ElementRef>,
    station: &str,
) -> Result<ElementRef> {
    for suggestion in &suggestions {
        if driver.text(suggestion).await?.contains(station) {
            return Ok(suggestion.clone());
        }
    }

    tracing::debug!("No metro suggestion contains '{}', taking the first", station);
    suggestions
        .into_iter()
        .next()
        .ok_or_else(|| Error::ElementNotFound(format!("no metro suggestions for '{}'", station)))
}
