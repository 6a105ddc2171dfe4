use crate::{
    abstract_trait::book::DynBookService,
    domain::{
        requests::book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
        response::book::BookResponse,
    },
    middleware::{
        jwt::{auth_middleware, require_admin},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::{
    domain::{ApiResponse, ApiResponsePagination},
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/books",
    tag = "Book",
    params(FindAllBooks),
    responses(
        (status = 200, description = "Paginated list of books", body = ApiResponsePagination<Vec<BookResponse>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_books(
    Extension(service): Extension<DynBookService>,
    Query(params): Query<FindAllBooks>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "Book",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<BookResponse>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    Extension(service): Extension<DynBookService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/books",
    tag = "Book",
    security(("bearer_auth" = [])),
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = ApiResponse<BookResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_book(
    Extension(service): Extension<DynBookService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateBookRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_book(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "Book",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<BookResponse>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    Extension(service): Extension<DynBookService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(mut body): SimpleValidatedJson<UpdateBookRequest>,
) -> Result<impl IntoResponse, HttpError> {
    body.book_id = Some(id);
    let response = service.update_book(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn book_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let public = OpenApiRouter::new()
        .route("/api/books", get(get_books))
        .route("/api/books/{id}", get(get_book));

    let admin = OpenApiRouter::new()
        .route("/api/books", post(create_book))
        .route("/api/books/{id}", put(update_book))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(auth_middleware));

    public
        .merge(admin)
        .layer(Extension(app_state.di_container.book_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
