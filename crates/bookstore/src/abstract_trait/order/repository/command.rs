use crate::model::{Order, OrderStatus, StatusActor};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    /// Moves one order to `status` and appends a history row in the same statement.
    ///
    /// With `expected` set, the write only happens if the order is still in that
    /// status. Returns `None` when the order is missing or the guard did not match.
    async fn update_status(
        &self,
        order_id: i32,
        expected: Option<OrderStatus>,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Moves every order that has sat in `from` since at least `entered_before`
    /// to `to`, recording a scheduler history row for each. Returns the ids moved.
    async fn advance_dwelled(
        &self,
        from: OrderStatus,
        to: OrderStatus,
        entered_before: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepositoryError>;
}
