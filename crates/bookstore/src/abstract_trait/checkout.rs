use crate::{
    domain::requests::order::CreateOrderRecordRequest,
    model::{CartLine, Order, OrderItem, OrderStatus, OrderStatusHistory, PromoCode, StatusActor},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynCheckoutRepository = Arc<dyn CheckoutRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CheckoutRepositoryTrait {
    async fn begin(&self) -> Result<Box<dyn CheckoutTransaction>, RepositoryError>;
}

/// One checkout unit of work. Nothing is visible to other readers until
/// [`CheckoutTransaction::commit`] succeeds; dropping the value without
/// committing discards every write made through it.
#[async_trait]
pub trait CheckoutTransaction: Send {
    /// Reads the user's cart joined with current book data, locking the book
    /// rows until the transaction ends.
    async fn lock_cart(&mut self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError>;

    async fn find_active_promo(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError>;

    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<Order, RepositoryError>;

    async fn insert_order_item(
        &mut self,
        order_id: i32,
        line: &CartLine,
    ) -> Result<OrderItem, RepositoryError>;

    /// Returns `false` when the book no longer has `quantity` copies left.
    async fn decrement_stock(&mut self, book_id: i32, quantity: i32)
    -> Result<bool, RepositoryError>;

    async fn clear_cart(&mut self, user_id: i32) -> Result<u64, RepositoryError>;

    async fn record_status(
        &mut self,
        order_id: i32,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<OrderStatusHistory, RepositoryError>;

    async fn commit(&mut self) -> Result<(), RepositoryError>;
}
