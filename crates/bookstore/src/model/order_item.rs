use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub book_id: i32,
    pub quantity: i32,
    pub price: Decimal,
}
