// Service façades - scenario-level operations over the page handles
//
// Scenarios talk to these traits rather than to pages, so a scenario reads as
// "create an order" instead of a sequence of clicks. The UI implementations
// are the only ones shipped; the traits are object safe so scenarios can hold
// a `Box<dyn OrderService>`.

pub mod faq;
pub mod order;

pub use faq::UiFaqService;
pub use order::UiOrderService;

use crate::error::Result;
use crate::order::{EntryPoint, OrderRequest};
use async_trait::async_trait;
use std::time::Duration;

/// Order placement and order status checks
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Runs the whole order flow and reports whether the site confirmed it.
    ///
    /// Starts from the landing page and leaves the browser where the flow
    /// ends. Errors from the flow itself (for example the rental step never
    /// appearing because the contact step was rejected) are returned.
    async fn create_order(&self, request: &OrderRequest, entry: EntryPoint) -> Result<bool>;

    /// Whether the "order placed" dialog is shown.
    async fn is_order_confirmed(&self) -> bool;

    /// Number of validation messages on the order form; 0 when none appear.
    async fn count_validation_errors(&self) -> Result<usize>;

    /// Looks `order_id` up and reports whether the site says it does not exist.
    async fn check_order_is_unknown(&self, order_id: &str) -> Result<bool>;

    /// Changes the wait horizon for every later operation in the session.
    fn set_timeout(&self, timeout: Duration) -> Result<()>;
}

/// Questions about important things
#[async_trait]
pub trait FaqService: Send + Sync {
    /// Expands question `index` (0-7).
    async fn open_question(&self, index: usize) -> Result<()>;

    /// Text of the answer to question `index` (0-7); the question must be open.
    async fn get_answer(&self, index: usize) -> Result<String>;
}
