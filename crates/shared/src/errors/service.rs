use crate::errors::repository::RepositoryError;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Insufficient stock for {title}: requested {requested}, available {available}")]
    InsufficientStock {
        book_id: i32,
        title: String,
        requested: i32,
        available: i32,
    },

    #[error("Promo code is invalid or expired")]
    PromoNotFound,

    #[error("Minimum order amount for this promo code is {min_amount}")]
    PromoMinimumNotMet { min_amount: Decimal },

    #[error("Order {order_id} cannot be cancelled while {status}")]
    OrderNotCancellable { order_id: i32, status: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
