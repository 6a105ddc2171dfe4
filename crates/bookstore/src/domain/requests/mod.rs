pub mod book;
pub mod cart;
pub mod order;
pub mod promo;

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("range").with_message("Amount must not be negative".into()));
    }
    if value.scale() > 2 {
        return Err(ValidationError::new("scale")
            .with_message("Amount must have at most two decimal places".into()));
    }
    Ok(())
}
