use crate::{domain::response::promo::PromoDiscountResponse, model::PromoCode};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use shared::errors::ServiceError;

/// Rounds to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Pure promo evaluation shared by checkout and the apply endpoint.
pub struct PromoValidator;

impl PromoValidator {
    /// `promo` is whatever the lookup by code returned. Missing and expired codes
    /// are reported the same way.
    pub fn evaluate(
        promo: Option<&PromoCode>,
        subtotal: Decimal,
        now: DateTime<Utc>,
    ) -> Result<PromoDiscountResponse, ServiceError> {
        let promo = match promo {
            Some(promo) if !promo.is_expired_at(now) => promo,
            _ => return Err(ServiceError::PromoNotFound),
        };

        if subtotal < promo.min_amount {
            return Err(ServiceError::PromoMinimumNotMet {
                min_amount: promo.min_amount,
            });
        }

        let discount_amount =
            round_money(subtotal * Decimal::from(promo.discount_percent) / Decimal::ONE_HUNDRED);
        let final_price = (subtotal - discount_amount).max(Decimal::ZERO);

        Ok(PromoDiscountResponse {
            promo_code_id: promo.promo_code_id,
            code: promo.code.clone(),
            discount_percent: promo.discount_percent,
            subtotal,
            discount_amount,
            final_price,
        })
    }
}
