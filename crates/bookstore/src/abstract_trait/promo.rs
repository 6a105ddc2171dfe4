use crate::{
    domain::{
        requests::promo::{ApplyPromoRequest, CreatePromoCodeRequest},
        response::promo::{PromoCodeResponse, PromoDiscountResponse},
    },
    model::PromoCode,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    domain::ApiResponse,
    errors::{RepositoryError, ServiceError},
};
use std::sync::Arc;

pub type DynPromoRepository = Arc<dyn PromoRepositoryTrait + Send + Sync>;
pub type DynPromoService = Arc<dyn PromoServiceTrait + Send + Sync>;

#[async_trait]
pub trait PromoRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<PromoCode>, RepositoryError>;
    async fn find_active_by_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError>;
    async fn create_promo(&self, req: &CreatePromoCodeRequest)
    -> Result<PromoCode, RepositoryError>;
}

#[async_trait]
pub trait PromoServiceTrait {
    async fn find_all(&self) -> Result<ApiResponse<Vec<PromoCodeResponse>>, ServiceError>;
    async fn create_promo(
        &self,
        req: &CreatePromoCodeRequest,
    ) -> Result<ApiResponse<PromoCodeResponse>, ServiceError>;
    async fn apply_promo(
        &self,
        req: &ApplyPromoRequest,
    ) -> Result<ApiResponse<PromoDiscountResponse>, ServiceError>;
}
