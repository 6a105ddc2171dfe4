use crate::{
    domain::{
        requests::cart::{AddCartItemRequest, UpdateCartItemRequest},
        response::cart::CartResponse,
    },
    model::{CartItem, CartLine},
};
use async_trait::async_trait;
use shared::{
    domain::{ApiResponse, AuthUser},
    errors::{RepositoryError, ServiceError},
};
use std::sync::Arc;

pub type DynCartRepository = Arc<dyn CartRepositoryTrait + Send + Sync>;
pub type DynCartService = Arc<dyn CartServiceTrait + Send + Sync>;

#[async_trait]
pub trait CartRepositoryTrait {
    async fn find_lines(&self, user_id: i32) -> Result<Vec<CartLine>, RepositoryError>;
    /// Adds `quantity` to the existing line for the book, creating it if needed.
    async fn add_item(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError>;
    async fn set_quantity(
        &self,
        user_id: i32,
        book_id: i32,
        quantity: i32,
    ) -> Result<Option<CartItem>, RepositoryError>;
    async fn remove_item(&self, user_id: i32, book_id: i32) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait CartServiceTrait {
    async fn get_cart(&self, user: &AuthUser) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn add_item(
        &self,
        user: &AuthUser,
        req: &AddCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn update_item(
        &self,
        user: &AuthUser,
        book_id: i32,
        req: &UpdateCartItemRequest,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
    async fn remove_item(
        &self,
        user: &AuthUser,
        book_id: i32,
    ) -> Result<ApiResponse<CartResponse>, ServiceError>;
}
