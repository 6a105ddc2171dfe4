use crate::{
    abstract_trait::book::BookRepositoryTrait,
    domain::requests::book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
    model::Book,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const BOOK_COLUMNS: &str = "book_id, title, author, price, stock, created_at, updated_at";

pub struct BookRepository {
    db: ConnectionPool,
}

impl BookRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepositoryTrait for BookRepository {
    async fn find_all(&self, req: &FindAllBooks) -> Result<(Vec<Book>, i64), RepositoryError> {
        let limit = i64::from(req.page_size.max(1));
        let offset = i64::from(req.page.max(1) - 1) * limit;
        let pattern = format!("%{}%", req.search.trim());

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books \
             WHERE title ILIKE $1 OR author ILIKE $1 \
             ORDER BY book_id \
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to fetch books: {err:?}");
            RepositoryError::from(err)
        })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE title ILIKE $1 OR author ILIKE $1",
        )
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        info!("✅ Found {} books (total {total})", books.len());
        Ok((books, total))
    }

    async fn find_by_id(&self, book_id: i32) -> Result<Option<Book>, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE book_id = $1"
        ))
        .bind(book_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(book)
    }

    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, RepositoryError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, price, stock) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&req.title)
        .bind(&req.author)
        .bind(req.price)
        .bind(req.stock)
        .fetch_one(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to create book {:?}: {err:?}", req.title);
            RepositoryError::from(err)
        })?;

        info!("✅ Created book ID {}", book.book_id);
        Ok(book)
    }

    async fn update_book(&self, req: &UpdateBookRequest) -> Result<Option<Book>, RepositoryError> {
        let book_id = req
            .book_id
            .ok_or_else(|| RepositoryError::Custom("book_id is required".into()))?;

        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books \
             SET title = $2, author = $3, price = $4, stock = $5, updated_at = now() \
             WHERE book_id = $1 \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(book_id)
        .bind(&req.title)
        .bind(&req.author)
        .bind(req.price)
        .bind(req.stock)
        .fetch_optional(&self.db)
        .await
        .map_err(|err| {
            error!("❌ Failed to update book ID {book_id}: {err:?}");
            RepositoryError::from(err)
        })?;

        Ok(book)
    }
}
