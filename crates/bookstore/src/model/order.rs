use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;

/// Lifecycle of an order.
///
/// ```text
/// processing ──(dwell)──> shipped ──(dwell)──> delivered
///      │                     │
///      └──── cancel ─────────┴──> cancelled
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Processing | OrderStatus::Shipped)
    }

    /// The status the scheduler moves an order to once its dwell time is over.
    pub fn next_automatic(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cod,
    Vnpay,
}

/// Who caused a status change, kept in the order's history.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "status_actor", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatusActor {
    Checkout,
    Customer,
    Admin,
    Scheduler,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub order_id: i32,
    pub user_id: i32,
    pub promo_code_id: Option<i32>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub order_date: DateTime<Utc>,
    pub status_updated_at: DateTime<Utc>,
}

/// Per-status aggregate used by the admin dashboard.
#[derive(Debug, Clone, FromRow)]
pub struct StatusBucket {
    pub status: OrderStatus,
    pub count: i64,
    pub total: Decimal,
}
