use crate::{
    abstract_trait::{
        book::DynBookRepository,
        cart::{CartServiceTrait, DynCartRepository},
    },
    domain::{
        requests::cart::{AddCartItemRequest, UpdateCartItemRequest},
        response::cart::CartResponse,
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::info;

const TRACER: &str = "cart-service";

#[derive(Clone)]
pub struct CartService {
    cart: DynCartRepository,
    books: DynBookRepository,
    metrics: Metrics,
}

impl CartService {
    pub fn new(cart: DynCartRepository, books: DynBookRepository, registry: &mut Registry) -> Self {
        Self {
            cart,
            books,
            metrics: Metrics::registered(registry, "cart_service", "CartService"),
        }
    }

    async fn snapshot(&self, user_id: i32) -> Result<CartResponse, ServiceError> {
        let lines = self.cart.find_lines(user_id).await?;
        Ok(CartResponse::from(lines))
    }

    fn finish(
        &self,
        ctx: TracingContext,
        method: Method,
        result: Result<CartResponse, ServiceError>,
        message: &'static str,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        match result {
            Ok(cart) => {
                ctx.complete(&self.metrics, method, true, message);
                Ok(ApiResponse::success(message, cart))
            }
            Err(err) => {
                ctx.complete(&self.metrics, method, false, &err.to_string());
                Err(err)
            }
        }
    }
}

#[async_trait]
impl CartServiceTrait for CartService {
    async fn get_cart(&self, user: &AuthUser) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "get_cart",
            vec![KeyValue::new("user.id", user.user_id.to_string())],
        );

        let result = self.snapshot(user.user_id).await;
        self.finish(ctx, Method::Get, result, "Cart retrieved")
    }

    async fn add_item(
        &self,
        user: &AuthUser,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        info!(
            "🛒 User {} adds {} x book {}",
            user.user_id, req.quantity, req.book_id
        );

        let ctx = TracingContext::start(
            TRACER,
            "add_cart_item",
            vec![
                KeyValue::new("user.id", user.user_id.to_string()),
                KeyValue::new("book.id", req.book_id.to_string()),
            ],
        );

        let result = async {
            self.books
                .find_by_id(req.book_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Book {} not found", req.book_id)))?;

            self.cart
                .add_item(user.user_id, req.book_id, req.quantity)
                .await?;

            self.snapshot(user.user_id).await
        }
        .await;

        self.finish(ctx, Method::Post, result, "Item added to cart")
    }

    async fn update_item(
        &self,
        user: &AuthUser,
        book_id: i32,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "update_cart_item",
            vec![
                KeyValue::new("user.id", user.user_id.to_string()),
                KeyValue::new("book.id", book_id.to_string()),
            ],
        );

        let result = async {
            self.cart
                .set_quantity(user.user_id, book_id, req.quantity)
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Book {book_id} is not in the cart")))?;

            self.snapshot(user.user_id).await
        }
        .await;

        self.finish(ctx, Method::Put, result, "Cart item updated")
    }

    async fn remove_item(
        &self,
        user: &AuthUser,
        book_id: i32,
    ) -> Result<ApiResponse<CartResponse>, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "remove_cart_item",
            vec![
                KeyValue::new("user.id", user.user_id.to_string()),
                KeyValue::new("book.id", book_id.to_string()),
            ],
        );

        let result = async {
            if !self.cart.remove_item(user.user_id, book_id).await? {
                return Err(ServiceError::NotFound(format!(
                    "Book {book_id} is not in the cart"
                )));
            }

            self.snapshot(user.user_id).await
        }
        .await;

        self.finish(ctx, Method::Delete, result, "Item removed from cart")
    }
}
