use crate::{
    abstract_trait::order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
    model::{Order, OrderItem, OrderStatus, OrderStatusHistory, StatusActor, StatusBucket},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const ORDER_COLUMNS: &str = "order_id, user_id, promo_code_id, total_price, status, \
                             payment_method, order_date, status_updated_at";

pub struct OrderQueryRepository {
    db: ConnectionPool,
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC, order_id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    async fn find_by_id(&self, order_id: i32) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(order)
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders \
             WHERE user_id = $1 \
             ORDER BY order_date DESC, order_id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT order_item_id, order_id, book_id, quantity, price
            FROM order_items
            WHERE order_id = ANY($1)
            ORDER BY order_id, order_item_id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn find_history(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderStatusHistory>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        let history = sqlx::query_as::<_, OrderStatusHistory>(
            r#"
            SELECT history_id, order_id, status, changed_by, changed_at
            FROM order_status_history
            WHERE order_id = ANY($1)
            ORDER BY order_id, changed_at, history_id
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.db)
        .await?;

        Ok(history)
    }

    async fn status_buckets(&self) -> Result<Vec<StatusBucket>, RepositoryError> {
        let buckets = sqlx::query_as::<_, StatusBucket>(
            r#"
            SELECT status, COUNT(*) AS count, COALESCE(SUM(total_price), 0) AS total
            FROM orders
            GROUP BY status
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(buckets)
    }
}

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn update_status(
        &self,
        order_id: i32,
        expected: Option<OrderStatus>,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "WITH updated AS ( \
                 UPDATE orders SET status = $3, status_updated_at = $5 \
                 WHERE order_id = $1 AND ($2::order_status IS NULL OR status = $2) \
                 RETURNING {ORDER_COLUMNS} \
             ), logged AS ( \
                 INSERT INTO order_status_history (order_id, status, changed_by, changed_at) \
                 SELECT order_id, $3, $4, $5 FROM updated \
             ) \
             SELECT {ORDER_COLUMNS} FROM updated"
        ))
        .bind(order_id)
        .bind(expected)
        .bind(status)
        .bind(actor)
        .bind(at)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to move order {order_id} to {status}: {err:?}");
            RepositoryError::from(err)
        })?;

        if let Some(order) = &order {
            info!("✅ Order {} is now {}", order.order_id, order.status);
        }

        Ok(order)
    }

    async fn advance_dwelled(
        &self,
        from: OrderStatus,
        to: OrderStatus,
        entered_before: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepositoryError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            WITH advanced AS (
                UPDATE orders SET status = $2, status_updated_at = $4
                WHERE status = $1 AND status_updated_at <= $3
                RETURNING order_id
            )
            INSERT INTO order_status_history (order_id, status, changed_by, changed_at)
            SELECT order_id, $2, 'scheduler', $4 FROM advanced
            RETURNING order_id
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(entered_before)
        .bind(at)
        .fetch_all(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to advance {from} orders to {to}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(ids)
    }
}
