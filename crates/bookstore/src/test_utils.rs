//! In-memory storage for tests.
//!
//! `MemoryStore` implements every repository trait over one shared state.
//! Checkout transactions hold the state lock for their whole lifetime, write to
//! a private copy, and publish it only on commit, so concurrent checkouts run
//! one after another and an abandoned checkout leaves nothing behind.

use crate::{
    abstract_trait::{
        book::BookRepositoryTrait,
        cart::CartRepositoryTrait,
        checkout::{CheckoutRepositoryTrait, CheckoutTransaction},
        email::{EmailServiceTrait, OrderConfirmation},
        order::repository::{OrderCommandRepositoryTrait, OrderQueryRepositoryTrait},
        promo::PromoRepositoryTrait,
        user::UserQueryRepositoryTrait,
    },
    di::Repositories,
    domain::requests::{
        book::{CreateBookRequest, FindAllBooks, UpdateBookRequest},
        order::CreateOrderRecordRequest,
        promo::CreatePromoCodeRequest,
    },
    model::{
        Book, CartItem, CartLine, Order, OrderItem, OrderStatus, OrderStatusHistory,
        PaymentMethod, PromoCode, StatusActor, StatusBucket, User,
    },
    scheduler::SchedulerConfig,
    service::RedirectPaymentGateway,
    state::AppState,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;
use shared::{
    config::Claims,
    domain::{AuthUser, UserRole},
    errors::{RepositoryError, ServiceError},
};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_PAYMENT_URL: &str = "https://pay.example/vpcpay.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    LockCart,
    FindPromo,
    InsertOrder,
    InsertItem,
    DecrementStock,
    ClearCart,
    RecordStatus,
    Commit,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 8] = [
        CheckoutStep::LockCart,
        CheckoutStep::FindPromo,
        CheckoutStep::InsertOrder,
        CheckoutStep::InsertItem,
        CheckoutStep::DecrementStock,
        CheckoutStep::ClearCart,
        CheckoutStep::RecordStatus,
        CheckoutStep::Commit,
    ];
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub users: BTreeMap<i32, User>,
    pub books: BTreeMap<i32, Book>,
    pub cart: Vec<CartItem>,
    pub promos: Vec<PromoCode>,
    pub orders: BTreeMap<i32, Order>,
    pub order_items: Vec<OrderItem>,
    pub history: Vec<OrderStatusHistory>,
    last_id: i32,
}

impl MemoryState {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn cart_lines(&self, user_id: i32) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = self
            .cart
            .iter()
            .filter(|item| item.user_id == user_id)
            .filter_map(|item| {
                self.books.get(&item.book_id).map(|book| CartLine {
                    cart_item_id: item.cart_item_id,
                    book_id: book.book_id,
                    title: book.title.clone(),
                    price: book.price,
                    stock: book.stock,
                    quantity: item.quantity,
                })
            })
            .collect();
        lines.sort_by_key(|line| line.book_id);
        lines
    }

    fn push_history(
        &mut self,
        order_id: i32,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> OrderStatusHistory {
        let entry = OrderStatusHistory {
            history_id: self.next_id(),
            order_id,
            status,
            changed_by: actor,
            changed_at: at,
        };
        self.history.push(entry.clone());
        entry
    }

    pub fn history_of(&self, order_id: i32) -> Vec<(OrderStatus, StatusActor)> {
        self.history
            .iter()
            .filter(|entry| entry.order_id == order_id)
            .map(|entry| (entry.status, entry.changed_by))
            .collect()
    }

    pub fn stock_of(&self, book_id: i32) -> i32 {
        self.books.get(&book_id).map_or(0, |book| book.stock)
    }

    pub fn cart_of(&self, user_id: i32) -> Vec<CartItem> {
        self.cart
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_checkout_at: Arc<std::sync::Mutex<Option<CheckoutStep>>>,
    fail_order_updates: Arc<AtomicBool>,
    fail_advance_from: Arc<std::sync::Mutex<Option<OrderStatus>>>,
    lose_stock_race: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            books: Arc::new(self.clone()),
            cart: Arc::new(self.clone()),
            promos: Arc::new(self.clone()),
            users: Arc::new(self.clone()),
            checkout: Arc::new(self.clone()),
            order_query: Arc::new(self.clone()),
            order_command: Arc::new(self.clone()),
        }
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub fn fail_checkout_at(&self, step: Option<CheckoutStep>) {
        *self.fail_checkout_at.lock().unwrap() = step;
    }

    pub fn fail_order_updates(&self, fail: bool) {
        self.fail_order_updates.store(fail, Ordering::SeqCst);
    }

    /// Makes only the scheduler step that starts from `from` fail.
    pub fn fail_advance_from(&self, from: Option<OrderStatus>) {
        *self.fail_advance_from.lock().unwrap() = from;
    }

    /// Makes every stock decrement in a checkout find the copies already gone,
    /// as if a concurrent buyer took them between the cart read and the write.
    pub fn lose_stock_race(&self, lose: bool) {
        self.lose_stock_race.store(lose, Ordering::SeqCst);
    }

    pub async fn seed_user(&self, name: &str, role: UserRole) -> AuthUser {
        let mut state = self.state.lock().await;
        let user_id = state.next_id();
        state.users.insert(
            user_id,
            User {
                user_id,
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                role: match role {
                    UserRole::Admin => "admin".into(),
                    UserRole::User => "user".into(),
                },
            },
        );
        AuthUser { user_id, role }
    }

    pub async fn seed_book(&self, title: &str, price: Decimal, stock: i32) -> i32 {
        let mut state = self.state.lock().await;
        let book_id = state.next_id();
        let now = Utc::now();
        state.books.insert(
            book_id,
            Book {
                book_id,
                title: title.into(),
                author: "Anonymous".into(),
                price,
                stock,
                created_at: now,
                updated_at: now,
            },
        );
        book_id
    }

    pub async fn seed_cart(&self, user_id: i32, book_id: i32, quantity: i32) {
        let mut state = self.state.lock().await;
        let cart_item_id = state.next_id();
        let now = Utc::now();
        state.cart.push(CartItem {
            cart_item_id,
            user_id,
            book_id,
            quantity,
            created_at: now,
            updated_at: now,
        });
    }

    pub async fn seed_promo(
        &self,
        code: &str,
        discount_percent: i32,
        min_amount: Decimal,
        expiry_date: DateTime<Utc>,
    ) -> i32 {
        let mut state = self.state.lock().await;
        let promo_code_id = state.next_id();
        state.promos.push(PromoCode {
            promo_code_id,
            code: code.into(),
            discount_percent,
            min_amount,
            expiry_date,
            created_at: Utc::now(),
        });
        promo_code_id
    }

    /// Inserts an order that entered `status` at `since`.
    pub async fn seed_order(
        &self,
        user_id: i32,
        status: OrderStatus,
        since: DateTime<Utc>,
    ) -> i32 {
        let mut state = self.state.lock().await;
        let order_id = state.next_id();
        state.orders.insert(
            order_id,
            Order {
                order_id,
                user_id,
                promo_code_id: None,
                total_price: Decimal::new(1000, 2),
                status,
                payment_method: PaymentMethod::Cod,
                order_date: since,
                status_updated_at: since,
            },
        );
        order_id
    }

    fn checkout_failure(&self) -> Option<CheckoutStep> {
        *self.fail_checkout_at.lock().unwrap()
    }
}

#[async_trait]
impl BookRepositoryTrait for MemoryStore {
    async fn find_all(&self, req: &FindAllBooks) -> Result<(Vec<Book>, i64), RepositoryError> {
        let state = self.state.lock().await;
        let needle = req.search.to_lowercase();
        let matching: Vec<Book> = state
            .books
            .values()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(((req.page.max(1) - 1) * req.page_size) as usize)
            .take(req.page_size as usize)
            .collect();

        Ok((page, total))
    }

    async fn find_by_id(&self, book_id: i32) -> Result<Option<Book>, RepositoryError> {
        Ok(self.state.lock().await.books.get(&book_id).cloned())
    }

    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, RepositoryError> {
        let book_id = self.seed_book(&req.title, req.price, req.stock).await;
        let mut state = self.state.lock().await;
        let book = state
            .books
            .get_mut(&book_id)
            .ok_or(RepositoryError::NotFound)?;
        book.author = req.author.clone();
        Ok(book.clone())
    }

    async fn update_book(&self, req: &UpdateBookRequest) -> Result<Option<Book>, RepositoryError> {
        let mut state = self.state.lock().await;
        let Some(book) = req.book_id.and_then(|id| state.books.get_mut(&id)) else {
            return Ok(None);
        };
        book.title = req.title.clone();
        book.author = req.author.clone();
        book.price = req.price;
        book.stock = req.stock;
        book.updated_at = Utc::now();
        Ok(Some(book.clone()))
    }
}

#[async_trait]
impl CartRepositoryTrait for MemoryStore {
    async fn find_lines(&self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError> {
        Ok(self.state.lock().await.cart_lines(user_id))
    }

    async fn add_item(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut state = self.state.lock().await;
        if let Some(item) = state
            .cart
            .iter_mut()
            .find(|item| item.user_id == user_id && item.book_id == book_id)
        {
            item.quantity += quantity;
            return Ok(item.clone());
        }

        let now = Utc::now();
        let item = CartItem {
            cart_item_id: state.next_id(),
            user_id,
            book_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        state.cart.push(item.clone());
        Ok(item)
    }

    async fn set_quantity(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state
            .cart
            .iter_mut()
            .find(|item| item.user_id == user_id && item.book_id == book_id)
            .map(|item| {
                item.quantity = quantity;
                item.clone()
            }))
    }

    async fn remove_item(&self, user_id: i32, book_id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        let before = state.cart.len();
        state
            .cart
            .retain(|item| !(item.user_id == user_id && item.book_id == book_id));
        Ok(state.cart.len() < before)
    }
}

#[async_trait]
impl PromoRepositoryTrait for MemoryStore {
    async fn find_all(&self) -> Result<Vec<PromoCode>, RepositoryError> {
        Ok(self.state.lock().await.promos.clone())
    }

    async fn find_active_by_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .promos
            .iter()
            .find(|promo| promo.code == code && promo.expiry_date >= now)
            .cloned())
    }

    async fn create_promo(
        &self,
        req: &CreatePromoCodeRequest,
    ) -> Result<PromoCode, RepositoryError> {
        if self
            .state
            .lock()
            .await
            .promos
            .iter()
            .any(|promo| promo.code == req.code)
        {
            return Err(RepositoryError::Conflict(format!(
                "Promo code {} already exists",
                req.code
            )));
        }

        let id = self
            .seed_promo(&req.code, req.discount_percent, req.min_amount, req.expiry_date)
            .await;
        let state = self.state.lock().await;
        state
            .promos
            .iter()
            .find(|promo| promo.promo_code_id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl UserQueryRepositoryTrait for MemoryStore {
    async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, RepositoryError> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self.state.lock().await.orders.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, order_id: i32) -> Result<Option<Order>, RepositoryError> {
        Ok(self.state.lock().await.orders.get(&order_id).cloned())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .orders
            .values()
            .rev()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_items(&self, order_ids: &[i32]) -> Result<Vec<OrderItem>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .order_items
            .iter()
            .filter(|item| order_ids.contains(&item.order_id))
            .cloned()
            .collect())
    }

    async fn find_history(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<OrderStatusHistory>, RepositoryError> {
        Ok(self
            .state
            .lock()
            .await
            .history
            .iter()
            .filter(|entry| order_ids.contains(&entry.order_id))
            .cloned()
            .collect())
    }

    async fn status_buckets(&self) -> Result<Vec<StatusBucket>, RepositoryError> {
        let state = self.state.lock().await;
        let mut buckets: Vec<StatusBucket> = Vec::new();
        for order in state.orders.values() {
            match buckets.iter_mut().find(|b| b.status == order.status) {
                Some(bucket) => {
                    bucket.count += 1;
                    bucket.total += order.total_price;
                }
                None => buckets.push(StatusBucket {
                    status: order.status,
                    count: 1,
                    total: order.total_price,
                }),
            }
        }
        Ok(buckets)
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for MemoryStore {
    async fn update_status(
        &self,
        order_id: i32,
        expected: Option<OrderStatus>,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<Option<Order>, RepositoryError> {
        if self.fail_order_updates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Custom("order updates unavailable".into()));
        }

        let mut state = self.state.lock().await;
        let Some(order) = state.orders.get_mut(&order_id) else {
            return Ok(None);
        };
        if expected.is_some_and(|expected| expected != order.status) {
            return Ok(None);
        }

        order.status = status;
        order.status_updated_at = at;
        let order = order.clone();
        state.push_history(order_id, status, actor, at);
        Ok(Some(order))
    }

    async fn advance_dwelled(
        &self,
        from: OrderStatus,
        to: OrderStatus,
        entered_before: DateTime<Utc>,
        at: DateTime<Utc>,
    ) -> Result<Vec<i32>, RepositoryError> {
        if self.fail_order_updates.load(Ordering::SeqCst)
            || *self.fail_advance_from.lock().unwrap() == Some(from)
        {
            return Err(RepositoryError::Custom(format!("cannot advance {from} orders")));
        }

        let mut state = self.state.lock().await;
        let ids: Vec<i32> = state
            .orders
            .values()
            .filter(|order| order.status == from && order.status_updated_at <= entered_before)
            .map(|order| order.order_id)
            .collect();

        for id in &ids {
            if let Some(order) = state.orders.get_mut(id) {
                order.status = to;
                order.status_updated_at = at;
            }
            state.push_history(*id, to, StatusActor::Scheduler, at);
        }

        Ok(ids)
    }
}

#[async_trait]
impl CheckoutRepositoryTrait for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn CheckoutTransaction>, RepositoryError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();

        Ok(Box::new(MemoryCheckout {
            guard,
            staged,
            fail_at: self.checkout_failure(),
            lose_stock_race: self.lose_stock_race.load(Ordering::SeqCst),
        }))
    }
}

struct MemoryCheckout {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_at: Option<CheckoutStep>,
    lose_stock_race: bool,
}

impl MemoryCheckout {
    fn step(&self, step: CheckoutStep) -> Result<(), RepositoryError> {
        if self.fail_at == Some(step) {
            return Err(RepositoryError::Custom(format!("injected failure at {step:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl CheckoutTransaction for MemoryCheckout {
    async fn lock_cart(&mut self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError> {
        self.step(CheckoutStep::LockCart)?;
        Ok(self.staged.cart_lines(user_id))
    }

    async fn find_active_promo(
        &mut self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoCode>, RepositoryError> {
        self.step(CheckoutStep::FindPromo)?;
        Ok(self
            .staged
            .promos
            .iter()
            .find(|promo| promo.code == code && promo.expiry_date >= now)
            .cloned())
    }

    async fn insert_order(
        &mut self,
        req: &CreateOrderRecordRequest,
    ) -> Result<Order, RepositoryError> {
        self.step(CheckoutStep::InsertOrder)?;
        let order = Order {
            order_id: self.staged.next_id(),
            user_id: req.user_id,
            promo_code_id: req.promo_code_id,
            total_price: req.total_price,
            status: OrderStatus::Processing,
            payment_method: req.payment_method,
            order_date: req.order_date,
            status_updated_at: req.order_date,
        };
        self.staged.orders.insert(order.order_id, order.clone());
        Ok(order)
    }

    async fn insert_order_item(
        &mut self,
        order_id: i32,
        line: &CartLine,
    ) -> Result<OrderItem, RepositoryError> {
        self.step(CheckoutStep::InsertItem)?;
        let item = OrderItem {
            order_item_id: self.staged.next_id(),
            order_id,
            book_id: line.book_id,
            quantity: line.quantity,
            price: line.price,
        };
        self.staged.order_items.push(item.clone());
        Ok(item)
    }

    async fn decrement_stock(
        &mut self,
        book_id: i32,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        self.step(CheckoutStep::DecrementStock)?;
        if self.lose_stock_race {
            return Ok(false);
        }
        match self.staged.books.get_mut(&book_id) {
            Some(book) if book.stock >= quantity => {
                book.stock -= quantity;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_cart(&mut self, user_id: i32) -> Result<u64, RepositoryError> {
        self.step(CheckoutStep::ClearCart)?;
        let before = self.staged.cart.len();
        self.staged.cart.retain(|item| item.user_id != user_id);
        Ok((before - self.staged.cart.len()) as u64)
    }

    async fn record_status(
        &mut self,
        order_id: i32,
        status: OrderStatus,
        actor: StatusActor,
        at: DateTime<Utc>,
    ) -> Result<OrderStatusHistory, RepositoryError> {
        self.step(CheckoutStep::RecordStatus)?;
        Ok(self.staged.push_history(order_id, status, actor, at))
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        self.step(CheckoutStep::Commit)?;
        *self.guard = self.staged.clone();
        Ok(())
    }
}

/// Keeps every confirmation it is asked to send.
#[derive(Clone, Default)]
pub struct RecordingEmail {
    pub sent: Arc<std::sync::Mutex<Vec<OrderConfirmation>>>,
    pub fail: bool,
}

impl RecordingEmail {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OrderConfirmation> {
        self.sent.lock().unwrap().clone()
    }

    /// Polls until `count` confirmations arrived; they are sent from a spawned task.
    pub async fn wait_for(&self, count: usize) -> Vec<OrderConfirmation> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl EmailServiceTrait for RecordingEmail {
    async fn send_order_confirmation(&self, mail: &OrderConfirmation) -> Result<(), ServiceError> {
        self.sent.lock().unwrap().push(mail.clone());
        if self.fail {
            return Err(ServiceError::Internal("smtp unavailable".into()));
        }
        Ok(())
    }
}

pub fn scheduler_config() -> SchedulerConfig {
    SchedulerConfig {
        interval: Duration::from_millis(20),
        ship_after: ChronoDuration::hours(48),
        deliver_after: ChronoDuration::hours(96),
    }
}

pub fn app_state(store: &MemoryStore, email: RecordingEmail) -> Arc<AppState> {
    Arc::new(AppState::from_parts(
        store.repositories(),
        Arc::new(email),
        Arc::new(RedirectPaymentGateway::new(TEST_PAYMENT_URL)),
        TEST_JWT_SECRET,
        scheduler_config(),
    ))
}

pub fn bearer(user: &AuthUser) -> String {
    let now = Utc::now();
    let claims = Claims {
        user_id: user.user_id,
        role: user.role,
        exp: (now + ChronoDuration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
        token_type: "access".into(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}
