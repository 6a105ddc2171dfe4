use crate::model::{Order, OrderItem, OrderStatusHistory, StatusBucket};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderQueryRepository = Arc<dyn OrderQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryRepositoryTrait {
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;
    async fn find_by_id(&self, order_id: i32) -> Result<Option<Order>, RepositoryError>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Order>, RepositoryError>;
    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>, RepositoryError>;
    async fn find_history(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderStatusHistory>, RepositoryError>;
    async fn status_buckets(&self) -> Result<Vec<StatusBucket>, RepositoryError>;
}
