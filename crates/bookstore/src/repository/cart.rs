use crate::{
    abstract_trait::cart::CartRepositoryTrait,
    model::{CartItem, CartLine},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

pub struct CartRepository {
    db: ConnectionPool,
}

impl CartRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartRepositoryTrait for CartRepository {
    async fn find_lines(&self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT c.cart_item_id, c.book_id, b.title, b.price, b.stock, c.quantity
            FROM cart_items c
            JOIN books b ON b.book_id = c.book_id
            WHERE c.user_id = $1
            ORDER BY c.book_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lines)
    }

    async fn add_item(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            INSERT INTO cart_items (user_id, book_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, book_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                          updated_at = now()
            RETURNING cart_item_id, user_id, book_id, quantity, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(quantity)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to add book {book_id} to cart of user {user_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Cart of user {user_id} now holds {} x book {book_id}",
            item.quantity
        );
        Ok(item)
    }

    async fn set_quantity(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r#"
            UPDATE cart_items
            SET quantity = $3, updated_at = now()
            WHERE user_id = $1 AND book_id = $2
            RETURNING cart_item_id, user_id, book_id, quantity, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(quantity)
        .fetch_optional(&self.db)
        .await?;

        Ok(item)
    }

    async fn remove_item(&self, user_id: i32, book_id: i32) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND book_id = $2")
            .bind(user_id)
            .bind(book_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
