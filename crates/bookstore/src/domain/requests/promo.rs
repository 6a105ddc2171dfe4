use super::validate_money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Codes are matched exactly, so padding would make a code unusable as typed.
fn validate_promo_code(code: &str) -> Result<(), ValidationError> {
    if code.trim() != code {
        return Err(ValidationError::new("whitespace")
            .with_message("Code must not start or end with whitespace".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePromoCodeRequest {
    #[validate(
        length(min = 1, max = 50, message = "Code must be 1 to 50 characters"),
        custom(function = "validate_promo_code")
    )]
    #[schema(example = "SAVE10")]
    pub code: String,

    #[validate(range(min = 0, max = 100, message = "Discount must be between 0 and 100"))]
    #[schema(example = 10)]
    pub discount_percent: i32,

    #[validate(custom(function = "validate_money"))]
    #[schema(value_type = String, example = "100.00")]
    pub min_amount: Decimal,

    pub expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ApplyPromoRequest {
    #[validate(length(min = 1, max = 50, message = "Code must be 1 to 50 characters"))]
    pub code: String,

    #[validate(custom(function = "validate_money"))]
    #[schema(value_type = String, example = "150.00")]
    pub subtotal: Decimal,
}
