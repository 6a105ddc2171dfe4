use crate::model::{OrderStatus, PaymentMethod};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 50, message = "Promo code must be 1 to 50 characters"))]
    #[schema(example = "SAVE10")]
    pub promo_code: Option<String>,

    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CancelOrderRequest {
    #[validate(range(min = 1, message = "Order ID is required"))]
    #[schema(example = 1)]
    pub order_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(range(min = 1, message = "Order ID is required"))]
    #[schema(example = 1)]
    pub order_id: i32,

    pub status: OrderStatus,
}

/// Row written to `orders` by checkout.
#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub user_id: i32,
    pub promo_code_id: Option<i32>,
    pub total_price: Decimal,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
}
