use crate::domain::{
    requests::order::{CancelOrderRequest, CreateOrderRequest, UpdateOrderStatusRequest},
    response::order::OrderResponse,
};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::ServiceError,
};
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        user: &AuthUser,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn cancel_order(
        &self,
        user: &AuthUser,
        req: &CancelOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_status(
        &self,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
