//! scooter-e2e: Page objects and service façades for the scooter rental site
//!
//! The crate drives the site through an injected [`Driver`]: the pages wait for
//! elements, recover once from DOM re-renders and absorb the timeouts of
//! indicators whose absence is a legitimate answer. Scenarios normally talk
//! to the [`OrderService`] and [`FaqService`] façades.
//!
//! # Examples
//!
//! ```ignore
//! use scooter_e2e::{
//!     Color, EntryPoint, OrderRequest, OrderService, RentalPeriod, Session, SuiteConfig,
//!     UiOrderService, driver::playwright::PlaywrightDriver,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SuiteConfig::from_env()?;
//!     let driver = Arc::new(PlaywrightDriver::launch(&config).await?);
//!
//!     let confirmed = Session::scoped(driver, &config, |session| async move {
//!         let orders = UiOrderService::new(session);
//!         let request = OrderRequest::builder()
//!             .name("Иван")
//!             .surname("Иванов")
//!             .address("Москва, Красная площадь")
//!             .metro_station("Театральная")
//!             .phone("89031234567")
//!             .delivery_date("15.08.2025")
//!             .rental_period(RentalPeriod::OneDay)
//!             .color(Color::Black)
//!             .build();
//!         orders.create_order(&request, EntryPoint::Top).await
//!     })
//!     .await?;
//!
//!     assert!(confirmed);
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `playwright`: the [`driver::playwright::PlaywrightDriver`] backend.

pub mod config;
pub mod driver;
pub mod error;
pub mod order;
pub mod pages;
pub mod selector;
pub mod services;
pub mod session;
pub mod wait;

pub use config::{BrowserKind, SuiteConfig, SuiteConfigBuilder};
pub use driver::{Driver, ElementRef, Key, WindowHandle};
pub use error::{Error, Result};
pub use order::{Color, EntryPoint, OrderRequest, OrderRequestBuilder, RentalPeriod};
pub use pages::{FAQ_COUNT, LandingPage, OrderFormPage, OrderStatusPage};
pub use selector::{Selector, Strategy};
pub use services::{FaqService, OrderService, UiFaqService, UiOrderService};
pub use session::Session;
pub use wait::{Condition, Outcome, WaitSpec};
