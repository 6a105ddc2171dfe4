use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        requests::order::{CancelOrderRequest, CreateOrderRequest, UpdateOrderStatusRequest},
        response::order::{OrderResponse, OrderStatsResponse},
    },
    middleware::{
        jwt::{auth_middleware, require_admin},
        validate::SimpleValidatedJson,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::HttpError,
};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created; `vnpay` orders carry a payment_url", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Empty cart, insufficient stock or invalid promo code"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&user, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/my-orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's orders with items and status history", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_my_orders(&user).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/orders/cancel",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CancelOrderRequest,
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Order can no longer be cancelled"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn cancel_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(user): Extension<AuthUser>,
    SimpleValidatedJson(body): SimpleValidatedJson<CancelOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.cancel_order(&user, &body).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/all",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every order", body = ApiResponse<Vec<OrderResponse>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_all_orders(
    Extension(service): Extension<DynOrderQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all().await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/orders/order-status",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status overwritten", body = ApiResponse<OrderResponse>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_status(&body).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/stats",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order counts and revenue", body = ApiResponse<OrderStatsResponse>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_order_stats(
    Extension(service): Extension<DynOrderQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.stats().await?;
    Ok(Json(response))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    let customer = OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/my-orders", get(get_my_orders))
        .route("/api/orders/cancel", put(cancel_order))
        .route_layer(middleware::from_fn(auth_middleware));

    let admin = OpenApiRouter::new()
        .route("/api/orders/all", get(get_all_orders))
        .route("/api/orders/order-status", put(update_order_status))
        .route("/api/orders/stats", get(get_order_stats))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(auth_middleware));

    customer
        .merge(admin)
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
