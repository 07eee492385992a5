//! # Store
//!
//! Document storage for products, users, orders and short-lived tokens.
//!
//! Two backends:
//! - [`RedisStore`]: the deployed one, see [`crate::database`]
//! - [`MemoryStore`]: single process, used by tests and `STORE=memory`
//!
//! Records are whole JSON documents. Writes replace the document, there are
//! no partial updates and no cross-record transactions.
use std::time::Duration;

use async_trait::async_trait;
use catalog::{Order, Product, User};
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Corrupt document: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Session,
    PasswordReset,
}

impl TokenKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            TokenKind::Session => "session",
            TokenKind::PasswordReset => "reset",
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn products(&self) -> StoreResult<Vec<Product>>;

    async fn product(&self, id: &str) -> StoreResult<Option<Product>>;

    async fn save_product(&self, product: &Product) -> StoreResult<()>;

    async fn delete_product(&self, id: &str) -> StoreResult<bool>;

    /// Removes every product, returning how many there were.
    async fn clear_products(&self) -> StoreResult<usize>;

    async fn users(&self) -> StoreResult<Vec<User>>;

    async fn user(&self, id: &str) -> StoreResult<Option<User>>;

    /// `email` must already be normalized.
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Replaces an existing user. The email is not re-indexed.
    async fn save_user(&self, user: &User) -> StoreResult<()>;

    async fn delete_user(&self, id: &str) -> StoreResult<bool>;

    async fn orders(&self) -> StoreResult<Vec<Order>>;

    async fn order(&self, id: &str) -> StoreResult<Option<Order>>;

    async fn save_order(&self, order: &Order) -> StoreResult<()>;

    async fn put_token(
        &self,
        kind: TokenKind,
        token: &str,
        user_id: &str,
        ttl: Duration,
    ) -> StoreResult<()>;

    /// User id behind a live token.
    async fn token_owner(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>>;

    /// Like [`Store::token_owner`] but the token is gone afterwards.
    async fn take_token(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>>;

    async fn revoke_token(&self, kind: TokenKind, token: &str) -> StoreResult<()>;
}
