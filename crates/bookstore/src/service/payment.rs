use crate::abstract_trait::payment::PaymentGatewayTrait;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use tracing::info;

/// Builds a VNPay-style redirect to the configured payment page.
///
/// The amount is sent in minor units (`vnp_Amount` = amount × 100). Request
/// signing is left to the gateway integration.
#[derive(Debug, Clone)]
pub struct RedirectPaymentGateway {
    payment_url: String,
}

impl RedirectPaymentGateway {
    pub fn new(payment_url: impl Into<String>) -> Self {
        Self {
            payment_url: payment_url.into(),
        }
    }
}

#[async_trait]
impl PaymentGatewayTrait for RedirectPaymentGateway {
    async fn create_payment_url(
        &self,
        order_id: i32,
        amount: Decimal,
    ) -> Result<String, ServiceError> {
        if amount.is_sign_negative() {
            return Err(ServiceError::Internal(format!(
                "Order {order_id} has a negative amount {amount}"
            )));
        }

        let minor_units = (amount * Decimal::ONE_HUNDRED).round();
        let url = format!(
            "{}?vnp_TxnRef={order_id}&vnp_Amount={minor_units}&vnp_OrderInfo=Order%20{order_id}",
            self.payment_url
        );

        info!("💳 Payment page for order {order_id}: {url}");
        Ok(url)
    }
}
