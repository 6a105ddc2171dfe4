mod book;
mod cart;
mod order;
mod promo;

use crate::{
    domain::{
        requests::{
            book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
            cart::{AddCartItemRequest, UpdateCartItemRequest},
            order::{CancelOrderRequest, CreateOrderRequest, UpdateOrderStatusRequest},
            promo::{ApplyPromoRequest, CreatePromoCodeRequest},
        },
        response::{
            book::BookResponse,
            cart::{CartItemResponse, CartResponse},
            order::{
                OrderItemResponse, OrderResponse, OrderStatsResponse, OrderStatusHistoryResponse,
                StatusCountResponse,
            },
            promo::{PromoCodeResponse, PromoDiscountResponse},
        },
    },
    model::{OrderStatus, PaymentMethod, StatusActor},
    state::AppState,
};
use anyhow::Result;
use axum::{
    Router,
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::{errors::ErrorResponse, utils::shutdown_signal};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::book::book_routes;
pub use self::cart::cart_routes;
pub use self::order::order_routes;
pub use self::promo::promo_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        book::get_books,
        book::get_book,
        book::create_book,
        book::update_book,

        cart::get_cart,
        cart::add_cart_item,
        cart::update_cart_item,
        cart::remove_cart_item,

        promo::get_promo_codes,
        promo::create_promo_code,
        promo::apply_promo_code,

        order::create_order,
        order::get_my_orders,
        order::cancel_order,
        order::get_all_orders,
        order::update_order_status,
        order::get_order_stats,
    ),
    components(schemas(
        FindAllBooks, CreateBookRequest, UpdateBookRequest, BookResponse,
        AddCartItemRequest, UpdateCartItemRequest, CartResponse, CartItemResponse,
        CreatePromoCodeRequest, ApplyPromoRequest, PromoCodeResponse, PromoDiscountResponse,
        CreateOrderRequest, CancelOrderRequest, UpdateOrderStatusRequest,
        OrderResponse, OrderItemResponse, OrderStatusHistoryResponse,
        OrderStatsResponse, StatusCountResponse,
        OrderStatus, PaymentMethod, StatusActor, ErrorResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Book", description = "Catalog endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Promo", description = "Promo code endpoints"),
        (name = "Order", description = "Checkout and order lifecycle endpoints"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )
        .body(Body::from(buffer))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

pub struct AppRouter;

impl AppRouter {
    /// Full application router, Swagger UI included.
    pub fn build(app_state: Arc<AppState>) -> Router {
        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(app_state.clone())
            .merge(book_routes(app_state.clone()))
            .merge(cart_routes(app_state.clone()))
            .merge(promo_routes(app_state.clone()))
            .merge(order_routes(app_state.clone()));

        let router_with_layers = api_router
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(1024 * 1024))
            .layer(TraceLayer::new_for_http());

        let (app_router, api) = router_with_layers.split_for_parts();

        app_router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
    }

    pub async fn serve(port: u16, app_state: Arc<AppState>) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
