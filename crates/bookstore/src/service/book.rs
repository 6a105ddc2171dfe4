use crate::{
    abstract_trait::book::{BookServiceTrait, DynBookRepository},
    domain::{
        requests::book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
        response::book::BookResponse,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::{ApiResponse, ApiResponsePagination, Pagination},
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;

const TRACER: &str = "book-service";

#[derive(Clone)]
pub struct BookService {
    repository: DynBookRepository,
    metrics: Metrics,
}

impl BookService {
    pub fn new(repository: DynBookRepository, registry: &mut Registry) -> Self {
        Self {
            repository,
            metrics: Metrics::registered(registry, "book_service", "BookService"),
        }
    }
}

#[async_trait]
impl BookServiceTrait for BookService {
    async fn find_all(
        &self,
        req: &FindAllBooks,
    ) -> Result<ApiResponsePagination<Vec<BookResponse>>, ServiceError> {
        info!(
            "🔍 Listing books | page: {}, size: {}, search: {:?}",
            req.page, req.page_size, req.search
        );

        let ctx = TracingContext::start(
            TRACER,
            "find_all_books",
            vec![
                KeyValue::new("component", "book"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("search", req.search.clone()),
            ],
        );

        let (books, total) = match self.repository.find_all(req).await {
            Ok(found) => found,
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Get, true, "Books retrieved");

        Ok(ApiResponsePagination {
            status: "success".into(),
            message: "Books retrieved successfully".into(),
            data: books.into_iter().map(BookResponse::from).collect(),
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }

    async fn find_by_id(&self, book_id: i32) -> Result<ApiResponse<BookResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "find_book_by_id",
            vec![KeyValue::new("book.id", book_id.to_string())],
        );

        let book = match self.repository.find_by_id(book_id).await {
            Ok(Some(book)) => book,
            Ok(None) => {
                ctx.complete(&self.metrics, Method::Get, false, "Book not found");
                return Err(ServiceError::NotFound(format!("Book {book_id} not found")));
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Get, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Get, true, "Book retrieved");
        Ok(ApiResponse::success(
            "Book retrieved successfully",
            BookResponse::from(book),
        ))
    }

    async fn create_book(
        &self,
        req: &CreateBookRequest,
    ) -> Result<ApiResponse<BookResponse>, ServiceError> {
        info!("📚 Creating book {:?}", req.title);

        let ctx = TracingContext::start(
            TRACER,
            "create_book",
            vec![KeyValue::new("book.title", req.title.clone())],
        );

        let book = match self.repository.create_book(req).await {
            Ok(book) => book,
            Err(err) => {
                ctx.complete(&self.metrics, Method::Post, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Post, true, "Book created");
        Ok(ApiResponse::success(
            "Book created successfully",
            BookResponse::from(book),
        ))
    }

    async fn update_book(
        &self,
        req: &UpdateBookRequest,
    ) -> Result<ApiResponse<BookResponse>, ServiceError> {
        let book_id = req
            .book_id
            .ok_or_else(|| ServiceError::Validation(vec!["book_id is required".into()]))?;

        info!("✏️ Updating book ID={book_id}");

        let ctx = TracingContext::start(
            TRACER,
            "update_book",
            vec![KeyValue::new("book.id", book_id.to_string())],
        );

        let book = match self.repository.update_book(req).await {
            Ok(Some(book)) => book,
            Ok(None) => {
                ctx.complete(&self.metrics, Method::Put, false, "Book not found");
                return Err(ServiceError::NotFound(format!("Book {book_id} not found")));
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Put, false, &err.to_string());
                return Err(err.into());
            }
        };

        ctx.complete(&self.metrics, Method::Put, true, "Book updated");
        Ok(ApiResponse::success(
            "Book updated successfully",
            BookResponse::from(book),
        ))
    }
}
