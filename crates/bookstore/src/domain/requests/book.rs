use super::validate_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
pub struct FindAllBooks {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: i32,

    #[serde(default)]
    pub search: String,
}

impl Default for FindAllBooks {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            search: String::new(),
        }
    }
}

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    #[schema(example = "Dune")]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    #[schema(example = "Frank Herbert")]
    pub author: String,

    #[validate(custom(function = "validate_money"))]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    #[schema(example = 10)]
    pub stock: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[serde(skip_deserializing)]
    pub book_id: Option<i32>,

    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,

    #[validate(custom(function = "validate_money"))]
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,
}
