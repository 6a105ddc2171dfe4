use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartItem {
    pub cart_item_id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart row joined with the book it points at, as read during checkout.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CartLine {
    pub cart_item_id: i32,
    pub book_id: i32,
    pub title: String,
    pub price: Decimal,
    pub stock: i32,
    pub quantity: i32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}
