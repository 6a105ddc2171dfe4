use crate::abstract_trait::email::{EmailServiceTrait, OrderConfirmation};
use async_trait::async_trait;
use shared::errors::ServiceError;
use tracing::info;

/// Writes confirmations to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogEmailService;

#[async_trait]
impl EmailServiceTrait for LogEmailService {
    async fn send_order_confirmation(&self, mail: &OrderConfirmation) -> Result<(), ServiceError> {
        info!(
            "📧 Order confirmation to {} <{}>: order #{} with {} item(s), total {}",
            mail.customer_name,
            mail.to,
            mail.order_id,
            mail.items.len(),
            mail.total_price
        );
        Ok(())
    }
}
