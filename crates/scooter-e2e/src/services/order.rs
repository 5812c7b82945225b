// UI implementation of OrderService

use super::OrderService;
use crate::error::{Error, Result};
use crate::order::{EntryPoint, OrderRequest};
use crate::pages::OrderFormPage;
use crate::session::Session;
use async_trait::async_trait;
use std::time::Duration;

/// Drives the order pages of one session
#[derive(Debug, Clone)]
pub struct UiOrderService {
    session: Session,
}

impl UiOrderService {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn order_form(&self) -> OrderFormPage {
        OrderFormPage::new(self.session.clone())
    }
}

#[async_trait]
impl OrderService for UiOrderService {
    async fn create_order(&self, request: &OrderRequest, entry: EntryPoint) -> Result<bool> {
        let _flow = self.session.begin_order()?;
        tracing::info!("Creating order through {:?} entry point", entry);

        let form = self
            .session
            .open_landing()
            .await?
            .start_order(entry)
            .await?;

        form.fill_contact_step(
            &request.name,
            &request.surname,
            &request.address,
            request.metro_station.as_deref(),
            &request.phone,
        )
        .await?;

        form.fill_delivery_step(
            &request.delivery_date,
            request.rental_period,
            request.color,
            request.comment.as_deref(),
        )
        .await?;

        let confirmed = form.is_order_confirmed().await;
        tracing::info!("Order confirmed: {}", confirmed);
        Ok(confirmed)
    }

    async fn is_order_confirmed(&self) -> bool {
        self.order_form().is_order_confirmed().await
    }

    async fn count_validation_errors(&self) -> Result<usize> {
        self.order_form().count_validation_errors().await
    }

    async fn check_order_is_unknown(&self, order_id: &str) -> Result<bool> {
        if order_id.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "order id must not be blank".to_string(),
            ));
        }
        tracing::info!("Checking status of order '{}'", order_id);

        let status = self
            .session
            .open_landing()
            .await?
            .open_order_status_lookup()
            .await?;
        status.lookup_order(order_id).await?;

        let unknown = status.is_not_found_indicator_shown().await;
        tracing::info!("Order '{}' unknown: {}", order_id, unknown);
        Ok(unknown)
    }

    fn set_timeout(&self, timeout: Duration) -> Result<()> {
        self.session.set_timeout(timeout)
    }
}
