use crate::{
    abstract_trait::{
        checkout::DynCheckoutRepository,
        email::{DynEmailService, OrderConfirmation},
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        payment::DynPaymentGateway,
        user::DynUserQueryRepository,
    },
    domain::{
        requests::order::{
            CancelOrderRequest, CreateOrderRecordRequest, CreateOrderRequest,
            UpdateOrderStatusRequest,
        },
        response::order::OrderResponse,
    },
    model::{CartLine, Order, OrderStatus, PaymentMethod, StatusActor},
    service::promo::PromoValidator,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::ServiceError,
    utils::{Method, Metrics, TracingContext},
};
use tracing::{error, info, warn};

const TRACER: &str = "order-command-service";

/// How many times a cancel re-reads the order when its status moves underneath it.
const CANCEL_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct OrderCommandService {
    checkout: DynCheckoutRepository,
    query: DynOrderQueryRepository,
    command: DynOrderCommandRepository,
    users: DynUserQueryRepository,
    email: DynEmailService,
    payment: DynPaymentGateway,
    metrics: Metrics,
}

pub struct OrderCommandServiceDeps {
    pub checkout: DynCheckoutRepository,
    pub query: DynOrderQueryRepository,
    pub command: DynOrderCommandRepository,
    pub users: DynUserQueryRepository,
    pub email: DynEmailService,
    pub payment: DynPaymentGateway,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps, registry: &mut Registry) -> Self {
        let OrderCommandServiceDeps {
            checkout,
            query,
            command,
            users,
            email,
            payment,
        } = deps;

        Self {
            checkout,
            query,
            command,
            users,
            email,
            payment,
            metrics: Metrics::registered(registry, "order_command_service", "OrderCommandService"),
        }
    }

    async fn checkout(
        &self,
        user_id: i32,
        req: &CreateOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderResponse, ServiceError> {
        let mut tx = self.checkout.begin().await?;

        let lines = tx.lock_cart(user_id).await?;
        if lines.is_empty() {
            return Err(ServiceError::EmptyCart);
        }

        if let Some(line) = lines.iter().find(|line| line.quantity > line.stock) {
            return Err(insufficient_stock(line));
        }

        let subtotal: Decimal = lines.iter().map(CartLine::line_total).sum();

        // Codes match exactly; only an all-blank field means "no code".
        let promo_code = req
            .promo_code
            .as_deref()
            .filter(|code| !code.trim().is_empty());

        let (promo_code_id, total_price) = match promo_code {
            Some(code) => {
                let promo = tx.find_active_promo(code, now).await?;
                let discount = PromoValidator::evaluate(promo.as_ref(), subtotal, now)?;
                info!(
                    "🏷️ Promo {} takes {} off {subtotal}",
                    discount.code, discount.discount_amount
                );
                (Some(discount.promo_code_id), discount.final_price)
            }
            None => (None, subtotal),
        };

        let order = tx
            .insert_order(&CreateOrderRecordRequest {
                user_id,
                promo_code_id,
                total_price,
                payment_method: req.payment_method,
                order_date: now,
            })
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            if !tx.decrement_stock(line.book_id, line.quantity).await? {
                return Err(insufficient_stock(line));
            }
            items.push(tx.insert_order_item(order.order_id, line).await?);
        }

        tx.clear_cart(user_id).await?;

        let history = tx
            .record_status(
                order.order_id,
                OrderStatus::Processing,
                StatusActor::Checkout,
                now,
            )
            .await?;

        tx.commit().await?;

        Ok(OrderResponse::new(order, items, vec![history]))
    }

    /// Asks the gateway where a `vnpay` order gets paid. The order is already
    /// committed, so a gateway failure leaves it unpaid in `processing` rather
    /// than failing the checkout.
    async fn attach_payment_url(&self, order: &mut OrderResponse) {
        if order.payment_method != PaymentMethod::Vnpay {
            return;
        }

        match self
            .payment
            .create_payment_url(order.id, order.total_price)
            .await
        {
            Ok(url) => order.payment_url = Some(url),
            Err(err) => error!("❌ No payment page for order {}: {err}", order.id),
        }
    }

    /// Sends the confirmation in the background. Failures never reach the caller.
    fn notify_placed(&self, order: &OrderResponse) {
        let users = self.users.clone();
        let email = self.email.clone();
        let user_id = order.user_id;
        let order_id = order.id;
        let total_price = order.total_price;
        let items = order.items.clone();

        tokio::spawn(async move {
            let user = match users.find_by_id(user_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    warn!("⚠️ No user {user_id} to confirm order {order_id} to");
                    return;
                }
                Err(err) => {
                    error!("❌ Failed to load user {user_id} for order {order_id}: {err}");
                    return;
                }
            };

            let mail = OrderConfirmation {
                to: user.email,
                customer_name: user.name,
                order_id,
                total_price,
                items,
            };

            if let Err(err) = email.send_order_confirmation(&mail).await {
                error!("❌ Failed to send confirmation for order {order_id}: {err}");
            }
        });
    }

    async fn with_details(&self, order: Order) -> Result<OrderResponse, ServiceError> {
        let ids = [order.order_id];
        let items = self.query.find_items(&ids).await?;
        let history = self.query.find_history(&ids).await?;

        Ok(OrderResponse::new(order, items, history))
    }

    async fn cancel(
        &self,
        user: &AuthUser,
        order_id: i32,
        now: DateTime<Utc>,
    ) -> Result<OrderResponse, ServiceError> {
        let actor = if user.is_admin() {
            StatusActor::Admin
        } else {
            StatusActor::Customer
        };

        for _ in 0..CANCEL_ATTEMPTS {
            // Another customer's order is reported exactly like a missing one.
            let order = self
                .query
                .find_by_id(order_id)
                .await?
                .filter(|order| user.is_admin() || order.user_id == user.user_id)
                .ok_or_else(|| ServiceError::NotFound(format!("Order {order_id} not found")))?;

            if !order.status.can_cancel() {
                return Err(ServiceError::OrderNotCancellable {
                    order_id,
                    status: order.status.to_string(),
                });
            }

            let cancelled = self
                .command
                .update_status(
                    order_id,
                    Some(order.status),
                    OrderStatus::Cancelled,
                    actor,
                    now,
                )
                .await?;

            if let Some(cancelled) = cancelled {
                return self.with_details(cancelled).await;
            }

            warn!("⚠️ Order {order_id} left {} while cancelling, retrying", order.status);
        }

        Err(ServiceError::Internal(format!(
            "Order {order_id} kept changing status during cancellation"
        )))
    }
}

fn insufficient_stock(line: &CartLine) -> ServiceError {
    ServiceError::InsufficientStock {
        book_id: line.book_id,
        title: line.title.clone(),
        requested: line.quantity,
        available: line.stock,
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        user: &AuthUser,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🏗️ Checking out cart of user_id={}", user.user_id);

        let ctx = TracingContext::start(
            TRACER,
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "checkout"),
                KeyValue::new("order.user_id", user.user_id.to_string()),
            ],
        );

        match self.checkout(user.user_id, req, Utc::now()).await {
            Ok(mut order) => {
                ctx.complete(&self.metrics, Method::Post, true, "Order placed");
                self.attach_payment_url(&mut order).await;
                self.notify_placed(&order);
                Ok(ApiResponse::success("Order created successfully", order))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Post, false, &err.to_string());
                Err(err)
            }
        }
    }

    async fn cancel_order(
        &self,
        user: &AuthUser,
        req: &CancelOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🛑 User {} cancels order {}", user.user_id, req.order_id);

        let ctx = TracingContext::start(
            TRACER,
            "cancel_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", req.order_id.to_string()),
                KeyValue::new("user.id", user.user_id.to_string()),
            ],
        );

        match self.cancel(user, req.order_id, Utc::now()).await {
            Ok(order) => {
                ctx.complete(&self.metrics, Method::Put, true, "Order cancelled");
                Ok(ApiResponse::success("Order cancelled successfully", order))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Put, false, &err.to_string());
                Err(err)
            }
        }
    }

    async fn update_status(
        &self,
        req: &UpdateOrderStatusRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("✏️ Admin sets order {} to {}", req.order_id, req.status);

        let ctx = TracingContext::start(
            TRACER,
            "update_order_status",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", req.order_id.to_string()),
                KeyValue::new("order.status", req.status.as_str()),
            ],
        );

        let result = async {
            let order = self
                .command
                .update_status(req.order_id, None, req.status, StatusActor::Admin, Utc::now())
                .await?
                .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", req.order_id)))?;

            self.with_details(order).await
        }
        .await;

        match result {
            Ok(order) => {
                ctx.complete(&self.metrics, Method::Put, true, "Order status updated");
                Ok(ApiResponse::success("Order status updated successfully", order))
            }
            Err(err) => {
                ctx.complete(&self.metrics, Method::Put, false, &err.to_string());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abstract_trait::{payment::PaymentGatewayTrait, promo::PromoServiceTrait},
        domain::requests::promo::ApplyPromoRequest,
        service::{PromoService, RedirectPaymentGateway},
        test_utils::{CheckoutStep, MemoryStore, RecordingEmail, TEST_PAYMENT_URL},
    };
    use chrono::Duration;
    use shared::domain::UserRole;
    use std::sync::Arc;

    fn service(store: &MemoryStore, email: RecordingEmail) -> OrderCommandService {
        service_paying_with(
            store,
            email,
            Arc::new(RedirectPaymentGateway::new(TEST_PAYMENT_URL)),
        )
    }

    fn service_paying_with(
        store: &MemoryStore,
        email: RecordingEmail,
        payment: DynPaymentGateway,
    ) -> OrderCommandService {
        let repos = store.repositories();
        OrderCommandService::new(
            OrderCommandServiceDeps {
                checkout: repos.checkout,
                query: repos.order_query,
                command: repos.order_command,
                users: repos.users,
                email: Arc::new(email),
                payment,
            },
            &mut Registry::default(),
        )
    }

    struct UnreachableGateway;

    #[async_trait]
    impl PaymentGatewayTrait for UnreachableGateway {
        async fn create_payment_url(
            &self,
            _order_id: i32,
            _amount: Decimal,
        ) -> Result<String, ServiceError> {
            Err(ServiceError::Internal("gateway unreachable".into()))
        }
    }

    fn money(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn pay_cod(promo_code: Option<&str>) -> CreateOrderRequest {
        CreateOrderRequest {
            promo_code: promo_code.map(str::to_string),
            payment_method: PaymentMethod::Cod,
        }
    }

    #[tokio::test]
    async fn checkout_without_promo_charges_the_subtotal() {
        let store = MemoryStore::new();
        let email = RecordingEmail::default();
        let orders = service(&store, email.clone());
        let user = store.seed_user("Alice", UserRole::User).await;
        let book = store.seed_book("Book A", money(1000), 5).await;
        store.seed_cart(user.user_id, book, 2).await;

        let order = orders
            .create_order(&user, &pay_cod(None))
            .await
            .unwrap()
            .data;

        assert_eq!(order.total_price, money(2000));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.promo_code_id, None);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, money(1000));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.status_updated_at, order.order_date);

        let state = store.snapshot().await;
        assert_eq!(state.stock_of(book), 3);
        assert!(state.cart_of(user.user_id).is_empty());
        assert_eq!(
            state.history_of(order.id),
            vec![(OrderStatus::Processing, StatusActor::Checkout)]
        );

        let sent = email.wait_for(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].total_price, money(2000));
        assert_eq!(sent[0].items.len(), 1);
    }

    #[tokio::test]
    async fn vnpay_orders_get_a_payment_page() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Vu", UserRole::User).await;
        let book = store.seed_book("Book", money(1000), 5).await;

        store.seed_cart(user.user_id, book, 2).await;
        let online = orders
            .create_order(
                &user,
                &CreateOrderRequest {
                    promo_code: None,
                    payment_method: PaymentMethod::Vnpay,
                },
            )
            .await
            .unwrap()
            .data;

        assert_eq!(
            online.payment_url,
            Some(format!(
                "{TEST_PAYMENT_URL}?vnp_TxnRef={}&vnp_Amount=2000&vnp_OrderInfo=Order%20{}",
                online.id, online.id
            ))
        );

        store.seed_cart(user.user_id, book, 1).await;
        let cash = orders
            .create_order(&user, &pay_cod(None))
            .await
            .unwrap()
            .data;
        assert_eq!(cash.payment_url, None);
    }

    #[tokio::test]
    async fn gateway_failure_keeps_the_placed_order() {
        let store = MemoryStore::new();
        let orders = service_paying_with(
            &store,
            RecordingEmail::default(),
            Arc::new(UnreachableGateway),
        );
        let user = store.seed_user("Wen", UserRole::User).await;
        let book = store.seed_book("Book", money(1000), 5).await;
        store.seed_cart(user.user_id, book, 1).await;

        let order = orders
            .create_order(
                &user,
                &CreateOrderRequest {
                    promo_code: None,
                    payment_method: PaymentMethod::Vnpay,
                },
            )
            .await
            .unwrap()
            .data;

        assert_eq!(order.payment_url, None);
        let state = store.snapshot().await;
        assert_eq!(state.orders[&order.id].status, OrderStatus::Processing);
        assert_eq!(state.stock_of(book), 4);
    }

    #[tokio::test]
    async fn checkout_applies_eligible_promo() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Bob", UserRole::User).await;
        let book = store.seed_book("Book B", money(5000), 3).await;
        store.seed_cart(user.user_id, book, 1).await;
        let promo = store
            .seed_promo("SAVE10", 10, money(2000), Utc::now() + Duration::days(7))
            .await;

        let order = orders
            .create_order(&user, &pay_cod(Some("SAVE10")))
            .await
            .unwrap()
            .data;

        assert_eq!(order.total_price, money(4500));
        assert_eq!(order.promo_code_id, Some(promo));
    }

    #[tokio::test]
    async fn promo_below_minimum_rejects_the_whole_checkout() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Carol", UserRole::User).await;
        let book = store.seed_book("Book C", money(5000), 3).await;
        store.seed_cart(user.user_id, book, 1).await;
        store
            .seed_promo("SAVE10", 10, money(10000), Utc::now() + Duration::days(7))
            .await;

        let err = orders
            .create_order(&user, &pay_cod(Some("SAVE10")))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ServiceError::PromoMinimumNotMet { min_amount } if min_amount == money(10000)
        ));

        let state = store.snapshot().await;
        assert!(state.orders.is_empty());
        assert_eq!(state.stock_of(book), 3);
        assert_eq!(state.cart_of(user.user_id).len(), 1);
    }

    #[tokio::test]
    async fn unknown_or_expired_promo_is_rejected() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Dan", UserRole::User).await;
        let book = store.seed_book("Book", money(5000), 3).await;
        store.seed_cart(user.user_id, book, 1).await;
        store
            .seed_promo("OLD", 50, money(0), Utc::now() - Duration::days(1))
            .await;

        for code in ["NOPE", "OLD"] {
            let err = orders
                .create_order(&user, &pay_cod(Some(code)))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::PromoNotFound), "{code}: {err:?}");
        }

        assert!(store.snapshot().await.orders.is_empty());
    }

    #[tokio::test]
    async fn apply_and_checkout_agree_on_padded_codes() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let promos = PromoService::new(store.repositories().promos, &mut Registry::default());
        let user = store.seed_user("Dora", UserRole::User).await;
        let book = store.seed_book("Book", money(5000), 3).await;
        store.seed_cart(user.user_id, book, 1).await;
        store
            .seed_promo("SAVE10", 10, money(0), Utc::now() + Duration::days(7))
            .await;

        let padded = "  SAVE10 ";
        let applied = promos
            .apply_promo(&ApplyPromoRequest {
                code: padded.into(),
                subtotal: money(5000),
            })
            .await;
        let checked_out = orders.create_order(&user, &pay_cod(Some(padded))).await;

        assert!(matches!(applied, Err(ServiceError::PromoNotFound)));
        assert!(matches!(checked_out, Err(ServiceError::PromoNotFound)));
        assert!(store.snapshot().await.orders.is_empty());

        let blank = orders
            .create_order(&user, &pay_cod(Some("   ")))
            .await
            .unwrap()
            .data;
        assert_eq!(blank.total_price, money(5000));
        assert_eq!(blank.promo_code_id, None);
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_checked_out() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Eve", UserRole::User).await;

        let err = orders
            .create_order(&user, &pay_cod(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::EmptyCart));
    }

    #[tokio::test]
    async fn insufficient_stock_names_the_book_and_writes_nothing() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Finn", UserRole::User).await;
        let plenty = store.seed_book("Plenty", money(1000), 10).await;
        let scarce = store.seed_book("Scarce", money(1000), 1).await;
        store.seed_cart(user.user_id, plenty, 1).await;
        store.seed_cart(user.user_id, scarce, 2).await;

        let err = orders
            .create_order(&user, &pay_cod(None))
            .await
            .unwrap_err();

        match err {
            ServiceError::InsufficientStock {
                title,
                requested,
                available,
                ..
            } => {
                assert_eq!(title, "Scarce");
                assert_eq!((requested, available), (2, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let state = store.snapshot().await;
        assert!(state.orders.is_empty());
        assert_eq!(state.stock_of(plenty), 10);
        assert_eq!(state.stock_of(scarce), 1);
    }

    #[tokio::test]
    async fn stock_taken_mid_checkout_rolls_back_the_order() {
        let store = MemoryStore::new();
        let email = RecordingEmail::default();
        let orders = service(&store, email.clone());
        let user = store.seed_user("Hugo", UserRole::User).await;
        let book = store.seed_book("Contested", money(1200), 4).await;
        store.seed_cart(user.user_id, book, 2).await;
        store.lose_stock_race(true);

        let err = orders
            .create_order(&user, &pay_cod(None))
            .await
            .unwrap_err();

        match err {
            ServiceError::InsufficientStock { book_id, title, .. } => {
                assert_eq!(book_id, book);
                assert_eq!(title, "Contested");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let state = store.snapshot().await;
        assert!(state.orders.is_empty());
        assert!(state.order_items.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.stock_of(book), 4);
        assert_eq!(state.cart_of(user.user_id).len(), 1);
        assert!(email.sent().is_empty());
    }

    #[tokio::test]
    async fn failure_at_any_step_leaves_no_trace() {
        for step in CheckoutStep::ALL {
            let store = MemoryStore::new();
            let email = RecordingEmail::default();
            let orders = service(&store, email.clone());
            let user = store.seed_user("Gus", UserRole::User).await;
            let book = store.seed_book("Book", money(1000), 5).await;
            store.seed_cart(user.user_id, book, 2).await;
            store
                .seed_promo("SAVE10", 10, money(0), Utc::now() + Duration::days(1))
                .await;
            store.fail_checkout_at(Some(step));

            let result = orders.create_order(&user, &pay_cod(Some("SAVE10"))).await;

            assert!(
                matches!(result, Err(ServiceError::Repo(_))),
                "{step:?} should fail"
            );

            let state = store.snapshot().await;
            assert!(state.orders.is_empty(), "{step:?} left an order");
            assert!(state.order_items.is_empty(), "{step:?} left items");
            assert!(state.history.is_empty(), "{step:?} left history");
            assert_eq!(state.stock_of(book), 5, "{step:?} kept a decrement");
            assert_eq!(state.cart_of(user.user_id).len(), 1, "{step:?} cleared cart");
            assert!(email.sent().is_empty());
        }
    }

    #[tokio::test]
    async fn concurrent_checkouts_never_oversell() {
        let store = MemoryStore::new();
        let orders = Arc::new(service(&store, RecordingEmail::default()));
        let book = store.seed_book("Last Copy", money(1500), 1).await;

        let mut buyers = Vec::new();
        for name in ["Hana", "Ivan"] {
            let user = store.seed_user(name, UserRole::User).await;
            store.seed_cart(user.user_id, book, 1).await;
            buyers.push(user);
        }

        let handles: Vec<_> = buyers
            .into_iter()
            .map(|user| {
                let orders = orders.clone();
                tokio::spawn(async move { orders.create_order(&user, &pay_cod(None)).await })
            })
            .collect();

        let mut placed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(ServiceError::InsufficientStock { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!((placed, rejected), (1, 1));
        assert_eq!(store.snapshot().await.stock_of(book), 0);
    }

    #[tokio::test]
    async fn email_failure_does_not_undo_the_order() {
        let store = MemoryStore::new();
        let email = RecordingEmail::failing();
        let orders = service(&store, email.clone());
        let user = store.seed_user("Jade", UserRole::User).await;
        let book = store.seed_book("Book", money(1000), 5).await;
        store.seed_cart(user.user_id, book, 1).await;

        let order = orders.create_order(&user, &pay_cod(None)).await.unwrap();

        assert_eq!(email.wait_for(1).await.len(), 1);
        assert!(store.snapshot().await.orders.contains_key(&order.data.id));
    }

    #[tokio::test]
    async fn open_orders_can_be_cancelled_by_their_owner() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Kim", UserRole::User).await;

        for status in [OrderStatus::Processing, OrderStatus::Shipped] {
            let id = store.seed_order(user.user_id, status, Utc::now()).await;

            let order = orders
                .cancel_order(&user, &CancelOrderRequest { order_id: id })
                .await
                .unwrap()
                .data;

            assert_eq!(order.status, OrderStatus::Cancelled);
            assert_eq!(
                order.status_history.last().map(|h| h.changed_by),
                Some(StatusActor::Customer)
            );
        }
    }

    #[tokio::test]
    async fn closed_orders_cannot_be_cancelled() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Lee", UserRole::User).await;

        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let id = store.seed_order(user.user_id, status, Utc::now()).await;

            let err = orders
                .cancel_order(&user, &CancelOrderRequest { order_id: id })
                .await
                .unwrap_err();

            assert!(matches!(err, ServiceError::OrderNotCancellable { .. }));
            assert_eq!(store.snapshot().await.orders[&id].status, status);
        }
    }

    #[tokio::test]
    async fn customers_cannot_see_or_cancel_other_orders() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let owner = store.seed_user("Mia", UserRole::User).await;
        let stranger = store.seed_user("Ned", UserRole::User).await;
        let admin = store.seed_user("Root", UserRole::Admin).await;
        let id = store
            .seed_order(owner.user_id, OrderStatus::Processing, Utc::now())
            .await;

        let err = orders
            .cancel_order(&stranger, &CancelOrderRequest { order_id: id })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let order = orders
            .cancel_order(&admin, &CancelOrderRequest { order_id: id })
            .await
            .unwrap()
            .data;
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(
            store.snapshot().await.history_of(id),
            vec![(OrderStatus::Cancelled, StatusActor::Admin)]
        );
    }

    #[tokio::test]
    async fn admin_can_set_any_status() {
        let store = MemoryStore::new();
        let orders = service(&store, RecordingEmail::default());
        let user = store.seed_user("Ola", UserRole::User).await;
        let id = store
            .seed_order(user.user_id, OrderStatus::Delivered, Utc::now())
            .await;

        let order = orders
            .update_status(&UpdateOrderStatusRequest {
                order_id: id,
                status: OrderStatus::Processing,
            })
            .await
            .unwrap()
            .data;

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(
            store.snapshot().await.history_of(id),
            vec![(OrderStatus::Processing, StatusActor::Admin)]
        );

        let err = orders
            .update_status(&UpdateOrderStatusRequest {
                order_id: 9999,
                status: OrderStatus::Shipped,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
