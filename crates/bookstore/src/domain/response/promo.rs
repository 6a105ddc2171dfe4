use crate::model::PromoCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromoCodeResponse {
    pub id: i32,
    pub code: String,
    pub discount_percent: i32,
    #[schema(value_type = String)]
    pub min_amount: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<PromoCode> for PromoCodeResponse {
    fn from(value: PromoCode) -> Self {
        PromoCodeResponse {
            id: value.promo_code_id,
            code: value.code,
            discount_percent: value.discount_percent,
            min_amount: value.min_amount,
            expiry_date: value.expiry_date,
            created_at: value.created_at,
        }
    }
}

/// Outcome of checking a promo code against a subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PromoDiscountResponse {
    pub promo_code_id: i32,
    pub code: String,
    pub discount_percent: i32,
    #[schema(value_type = String)]
    pub subtotal: Decimal,
    #[schema(value_type = String)]
    pub discount_amount: Decimal,
    #[schema(value_type = String)]
    pub final_price: Decimal,
}
