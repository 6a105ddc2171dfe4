use crate::{
    domain::{
        requests::book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
        response::book::BookResponse,
    },
    model::Book,
};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, ApiResponsePagination},
    errors::{RepositoryError, ServiceError},
};
use std::sync::Arc;

pub type DynBookRepository = Arc<dyn BookRepositoryTrait + Send + Sync>;
pub type DynBookService = Arc<dyn BookServiceTrait + Send + Sync>;

#[async_trait]
pub trait BookRepositoryTrait {
    async fn find_all(&self, req: &FindAllBooks) -> Result<(Vec<Book>, i64), RepositoryError>;
    async fn find_by_id(&self, book_id: i32) -> Result<Option<Book>, RepositoryError>;
    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, RepositoryError>;
    async fn update_book(&self, req: &UpdateBookRequest) -> Result<Option<Book>, RepositoryError>;
}

#[async_trait]
pub trait BookServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllBooks,
    ) -> Result<ApiResponsePagination<Vec<BookResponse>>, ServiceError>;
    async fn find_by_id(&self, book_id: i32) -> Result<ApiResponse<BookResponse>, ServiceError>;
    async fn create_book(
        &self,
        req: &CreateBookRequest,
    ) -> Result<ApiResponse<BookResponse>, ServiceError>;
    async fn update_book(
        &self,
        req: &UpdateBookRequest,
    ) -> Result<ApiResponse<BookResponse>, ServiceError>;
}
