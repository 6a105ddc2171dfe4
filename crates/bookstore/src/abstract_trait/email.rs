use crate::domain::response::order::OrderItemResponse;
use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynEmailService = Arc<dyn EmailServiceTrait + Send + Sync>;

#[derive(Debug, Clone)]
pub struct OrderConfirmation {
    pub to: String,
    pub customer_name: String,
    pub order_id: i32,
    pub total_price: Decimal,
    pub items: Vec<OrderItemResponse>,
}

#[async_trait]
pub trait EmailServiceTrait {
    async fn send_order_confirmation(&self, mail: &OrderConfirmation) -> Result<(), ServiceError>;
}
