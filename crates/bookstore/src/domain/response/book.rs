use crate::model::Book;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: i32,
    pub title: String,
    pub author: String,
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        BookResponse {
            id: value.book_id,
            title: value.title,
            author: value.author,
            price: value.price,
            stock: value.stock,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
