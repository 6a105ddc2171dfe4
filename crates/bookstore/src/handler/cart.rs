use crate::{
    abstract_trait::cart::DynCartService,
    domain::{
        requests::cart::{AddCartItemRequest, UpdateCartItemRequest},
        response::cart::CartResponse,
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, put},
};
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current cart", body = ApiResponse<CartResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(service): Extension<DynCartService>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.get_cart(&user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = ApiResponse<CartResponse>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<AddCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.add_item(&user, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/cart/{book_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("book_id" = i32, Path, description = "Book ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartResponse>),
        (status = 404, description = "Book is not in the cart")
    )
)]
pub async fn update_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateCartItemRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_item(&user, book_id, &body).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{book_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("book_id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartResponse>),
        (status = 404, description = "Book is not in the cart")
    )
)]
pub async fn remove_cart_item(
    Extension(service): Extension<DynCartService>,
    Extension(user): Extension<AuthUser>,
    Path(book_id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.remove_item(&user, book_id).await?;
    Ok(Json(response))
}

pub fn cart_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/cart", get(get_cart).post(add_cart_item))
        .route(
            "/api/cart/{book_id}",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.cart_service.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
