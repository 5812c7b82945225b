// Order data - what a scenario asks the order form to submit
//
// OrderRequest is deliberately unvalidated: rejecting bad input is the site's
// job and negative scenarios rely on submitting blank fields. Only the values
// the form offers as fixed choices (entry point, rental period, color) are
// closed enums.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two landing-page "order" controls starts the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    /// Button in the page header
    Top,
    /// Button below the "how it works" section
    Bottom,
}

/// Scooter color swatch on the delivery step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Grey,
}

impl Color {
    /// Value of the swatch checkbox's `id` attribute.
    pub fn element_id(&self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Grey => "grey",
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "black" => Ok(Color::Black),
            "grey" => Ok(Color::Grey),
            other => Err(Error::InvalidArgument(format!(
                "unknown color '{}', expected black or grey",
                other
            ))),
        }
    }
}

/// Rental period options of the delivery step dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalPeriod {
    OneDay,
    TwoDays,
    ThreeDays,
    FourDays,
    FiveDays,
    SixDays,
    SevenDays,
}

impl RentalPeriod {
    pub const ALL: [RentalPeriod; 7] = [
        RentalPeriod::OneDay,
        RentalPeriod::TwoDays,
        RentalPeriod::ThreeDays,
        RentalPeriod::FourDays,
        RentalPeriod::FiveDays,
        RentalPeriod::SixDays,
        RentalPeriod::SevenDays,
    ];

    /// Visible label of the dropdown option.
    pub fn label(&self) -> &'static str {
        match self {
            RentalPeriod::OneDay => "сутки",
            RentalPeriod::TwoDays => "двое суток",
            RentalPeriod::ThreeDays => "трое суток",
            RentalPeriod::FourDays => "четверо суток",
            RentalPeriod::FiveDays => "пятеро суток",
            RentalPeriod::SixDays => "шестеро суток",
            RentalPeriod::SevenDays => "семеро суток",
        }
    }

    /// Parses a dropdown label; the empty label means "no selection".
    pub fn from_label(label: &str) -> Result<Option<Self>> {
        if label.is_empty() {
            return Ok(None);
        }
        Self::ALL
            .into_iter()
            .find(|period| period.label() == label)
            .map(Some)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown rental period '{}'", label)))
    }
}

impl fmt::Display for RentalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The nine values of one order, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub surname: String,
    pub address: String,
    pub metro_station: Option<String>,
    pub phone: String,
    pub delivery_date: String,
    pub rental_period: Option<RentalPeriod>,
    pub color: Option<Color>,
    pub comment: Option<String>,
}

impl OrderRequest {
    pub fn builder() -> OrderRequestBuilder {
        OrderRequestBuilder::default()
    }

    /// A request with every field left blank.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Builder for OrderRequest
///
/// Fields that are never set stay blank, which the form treats as "leave
/// untouched".
#[derive(Debug, Clone, Default)]
pub struct OrderRequestBuilder {
    request: OrderRequest,
}

impl OrderRequestBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.request.name = name.into();
        self
    }

    pub fn surname(mut self, surname: impl Into<String>) -> Self {
        self.request.surname = surname.into();
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.request.address = address.into();
        self
    }

    pub fn metro_station(mut self, station: impl Into<String>) -> Self {
        self.request.metro_station = Some(station.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.request.phone = phone.into();
        self
    }

    pub fn delivery_date(mut self, date: impl Into<String>) -> Self {
        self.request.delivery_date = date.into();
        self
    }

    pub fn rental_period(mut self, period: RentalPeriod) -> Self {
        self.request.rental_period = Some(period);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.request.color = Some(color);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.request.comment = Some(comment.into());
        self
    }

    pub fn build(self) -> OrderRequest {
        self.request
    }
}
