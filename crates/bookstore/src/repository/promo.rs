use crate::{
    abstract_trait::promo::PromoRepositoryTrait, domain::requests::promo::CreatePromoCodeRequest,
    model::PromoCode,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const PROMO_COLUMNS: &str =
    "promo_code_id, code, discount_percent, min_amount, expiry_date, created_at";

pub struct PromoRepository {
    db: ConnectionPool,
}

impl PromoRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PromoRepositoryTrait for PromoRepository {
    async fn find_all(&self) -> Result<Vec<PromoCode>, RepositoryError> {
        let promos = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes ORDER BY promo_code_id"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(promos)
    }

    async fn find_active_by_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError> {
        let promo = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM promo_codes WHERE code = $1 AND expiry_date >= $2"
        ))
        .bind(code)
        .bind(now)
        .fetch_optional(&self.db)
        .await?;

        Ok(promo)
    }

    async fn create_promo(
        &self,
        req: &CreatePromoCodeRequest,
    ) -> Result<PromoCode, RepositoryError> {
        let promo = sqlx::query_as::<_, PromoCode>(&format!(
            "INSERT INTO promo_codes (code, discount_percent, min_amount, expiry_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {PROMO_COLUMNS}"
        ))
        .bind(&req.code)
        .bind(req.discount_percent)
        .bind(req.min_amount)
        .bind(req.expiry_date)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to create promo code {}: {err:?}", req.code);
            RepositoryError::unique_violation(err, format!("Promo code {} already exists", req.code))
        })?;

        info!("✅ Created promo code {}", promo.code);
        Ok(promo)
    }
}
