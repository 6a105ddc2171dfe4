use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PromoCode {
    pub promo_code_id: i32,
    pub code: String,
    pub discount_percent: i32,
    pub min_amount: Decimal,
    pub expiry_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PromoCode {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }
}
