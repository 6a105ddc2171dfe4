use crate::domain::response::order::{OrderResponse, OrderStatsResponse};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::ServiceError,
};
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_my_orders(
        &self,
        user: &AuthUser,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn find_all(&self) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError>;
    async fn stats(&self) -> Result<ApiResponse<OrderStatsResponse>, ServiceError>;
}
