use crate::{
    abstract_trait::{
        book::{DynBookRepository, DynBookService},
        cart::{DynCartRepository, DynCartService},
        checkout::DynCheckoutRepository,
        email::DynEmailService,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        payment::DynPaymentGateway,
        promo::{DynPromoRepository, DynPromoService},
        user::DynUserQueryRepository,
    },
    repository::{
        BookRepository, CartRepository, CheckoutRepository, OrderCommandRepository,
        OrderQueryRepository, PromoRepository, UserQueryRepository,
    },
    scheduler::{OrderScheduler, SchedulerConfig},
    service::{
        BookService, CartService, OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
        PromoService,
    },
};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::sync::Arc;

/// Every storage port the services depend on.
#[derive(Clone)]
pub struct Repositories {
    pub books: DynBookRepository,
    pub cart: DynCartRepository,
    pub promos: DynPromoRepository,
    pub users: DynUserQueryRepository,
    pub checkout: DynCheckoutRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_command: DynOrderCommandRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            books: Arc::new(BookRepository::new(pool.clone())),
            cart: Arc::new(CartRepository::new(pool.clone())),
            promos: Arc::new(PromoRepository::new(pool.clone())),
            users: Arc::new(UserQueryRepository::new(pool.clone())),
            checkout: Arc::new(CheckoutRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_command: Arc::new(OrderCommandRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInject {
    pub book_service: DynBookService,
    pub cart_service: DynCartService,
    pub promo_service: DynPromoService,
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub scheduler: Arc<OrderScheduler>,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("book_service", &"DynBookService")
            .field("cart_service", &"DynCartService")
            .field("promo_service", &"DynPromoService")
            .field("order_query", &"DynOrderQueryService")
            .field("order_command", &"DynOrderCommandService")
            .field("scheduler", &"OrderScheduler")
            .finish()
    }
}

impl DependenciesInject {
    pub fn new(
        repositories: Repositories,
        email: DynEmailService,
        payment: DynPaymentGateway,
        scheduler: SchedulerConfig,
        registry: &mut Registry,
    ) -> Self {
        let book_service: DynBookService =
            Arc::new(BookService::new(repositories.books.clone(), registry));

        let cart_service: DynCartService = Arc::new(CartService::new(
            repositories.cart.clone(),
            repositories.books.clone(),
            registry,
        ));

        let promo_service: DynPromoService =
            Arc::new(PromoService::new(repositories.promos.clone(), registry));

        let order_query: DynOrderQueryService = Arc::new(OrderQueryService::new(
            repositories.order_query.clone(),
            registry,
        ));

        let order_command: DynOrderCommandService = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                checkout: repositories.checkout.clone(),
                query: repositories.order_query.clone(),
                command: repositories.order_command.clone(),
                users: repositories.users.clone(),
                email,
                payment,
            },
            registry,
        ));

        let scheduler = Arc::new(OrderScheduler::new(
            repositories.order_command,
            scheduler,
            registry,
        ));

        Self {
            book_service,
            cart_service,
            promo_service,
            order_query,
            order_command,
            scheduler,
        }
    }
}
