use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynPaymentGateway = Arc<dyn PaymentGatewayTrait + Send + Sync>;

/// Hosted payment page the customer is sent to for online-paid orders.
///
/// Verifying the gateway's signed callback belongs to the gateway integration,
/// not to this trait.
#[async_trait]
pub trait PaymentGatewayTrait {
    async fn create_payment_url(&self, order_id: i32, amount: Decimal)
    -> Result<String, ServiceError>;
}
