use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AddCartItemRequest {
    #[validate(range(min = 1, message = "Book ID is required"))]
    #[schema(example = 1)]
    pub book_id: i32,

    #[validate(range(min = 1, max = 999, message = "Quantity must be between 1 and 999"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, max = 999, message = "Quantity must be between 1 and 999"))]
    #[schema(example = 3)]
    pub quantity: i32,
}
