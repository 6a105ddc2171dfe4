use crate::{
    abstract_trait::checkout::{CheckoutRepositoryTrait, CheckoutTransaction},
    domain::requests::order::CreateOrderRecordRequest,
    model::{CartLine, Order, OrderItem, OrderStatus, OrderStatusHistory, PromoCode, StatusActor},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{PgConnection, Postgres, Transaction};
use tracing::{error, info};

pub struct CheckoutRepository {
    db: ConnectionPool,
}

impl CheckoutRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CheckoutRepositoryTrait for CheckoutRepository {
    async fn begin(&self) -> Result<Box<dyn CheckoutTransaction>, RepositoryError> {
        let tx = self.db.begin().await.map_err(|err| {
            error!("❌ Failed to open checkout transaction: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(Box::new(PgCheckoutTransaction { tx: Some(tx) }))
    }
}

/// Postgres-backed checkout. Rolled back by sqlx when dropped uncommitted.
struct PgCheckoutTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgCheckoutTransaction {
    fn conn(&mut self) -> Result<&mut PgConnection, RepositoryError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| RepositoryError::Custom("checkout transaction already finished".into()))
    }
}

#[async_trait]
impl CheckoutTransaction for PgCheckoutTransaction {
    async fn lock_cart(&mut self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.cart_item_id, c.book_id, b.title, b.price, b.stock, c.quantity
            FROM cart_items c
            JOIN books b ON b.book_id = c.book_id
            WHERE c.user_id = $1
            ORDER BY c.book_id
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_all(self.conn()?)
        .await?;

        Ok(lines)
    }

    async fn find_active_promo(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError> {
        let promo = sqlx::query_as::<_, PromoCode>(
            r#"
            SELECT promo_code_id, code, discount_percent, min_amount, expiry_date, created_at
            FROM promo_codes
            WHERE code = $1 AND expiry_date >= $2
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(promo)
    }

    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (user_id, promo_code_id, total_price, status, payment_method,
                 order_date, status_updated_at)
            VALUES ($1, $2, $3, 'processing', $4, $5, $5)
            RETURNING order_id, user_id, promo_code_id, total_price, status,
                      payment_method, order_date, status_updated_at
            "#,
        )
        .bind(req.user_id)
        .bind(req.promo_code_id)
        .bind(req.total_price)
        .bind(req.payment_method)
        .bind(req.order_date)
        .fetch_one(self.conn()?)
        .await?;

        info!(
            "✅ Inserted order ID {} for user {}",
            order.order_id, order.user_id
        );
        Ok(order)
    }

    async fn insert_order_item(
        &mut self,
        order_id: i32,
        line: &CartLine,
    ) -> Result<OrderItem, RepositoryError> {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, book_id, quantity, price)
            VALUES ($1, $2, $3, $4)
            RETURNING order_item_id, order_id, book_id, quantity, price
            "#,
        )
        .bind(order_id)
        .bind(line.book_id)
        .bind(line.quantity)
        .bind(line.price)
        .fetch_one(self.conn()?)
        .await?;

        Ok(item)
    }

    async fn decrement_stock(
        &mut self,
        book_id: i32,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET stock = stock - $2, updated_at = now()
            WHERE book_id = $1 AND stock >= $2
            "#,
        )
        .bind(book_id)
        .bind(quantity)
        .execute(self.conn()?)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear_cart(&mut self, user_id: i32) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    async fn record_status(
        &mut self,
        order_id: i32,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<OrderStatusHistory, RepositoryError> {
        let entry = sqlx::query_as::<_, OrderStatusHistory>(
            r#"
            INSERT INTO order_status_history (order_id, status, changed_by, changed_at)
            VALUES ($1, $2, $3, $4)
            RETURNING history_id, order_id, status, changed_by, changed_at
            "#,
        )
        .bind(order_id)
        .bind(status)
        .bind(actor)
        .bind(at)
        .fetch_one(self.conn()?)
        .await?;

        Ok(entry)
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| RepositoryError::Custom("checkout transaction already finished".into()))?;

        tx.commit().await.map_err(|err| {
            error!("❌ Failed to commit checkout: {err:?}");
            RepositoryError::from(err)
        })
    }
}
