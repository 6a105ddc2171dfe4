use crate::model::CartLine;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub book_id: i32,
    pub title: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub quantity: i32,
    pub stock: i32,
    #[schema(value_type = String)]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    #[schema(value_type = String, example = "37.50")]
    pub subtotal: Decimal,
}

impl From<Vec<CartLine>> for CartResponse {
    fn from(lines: Vec<CartLine>) -> Self {
        let subtotal = lines.iter().map(CartLine::line_total).sum();
        let items = lines
            .into_iter()
            .map(|line| CartItemResponse {
                line_total: line.line_total(),
                book_id: line.book_id,
                title: line.title,
                price: line.price,
                quantity: line.quantity,
                stock: line.stock,
            })
            .collect();

        CartResponse { items, subtotal }
    }
}
