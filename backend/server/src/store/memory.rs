use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use catalog::{Order, Product, User};
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult, TokenKind};

#[derive(Default)]
struct Collections {
    products: HashMap<String, Product>,
    users: HashMap<String, User>,
    users_by_email: HashMap<String, String>,
    orders: HashMap<String, Order>,
    // no expiry when the TTL overflows `Instant`
    tokens: HashMap<(TokenKind, String), (String, Option<Instant>)>,
}

/// Process-local store with the same semantics as [`super::RedisStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn live(expires: Option<Instant>) -> bool {
    expires.is_none_or(|at| Instant::now() < at)
}

#[async_trait]
impl Store for MemoryStore {
    async fn products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.inner.read().await.products.values().cloned().collect())
    }

    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(id).cloned())
    }

    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .products
            .insert(product.id.clone(), product.clone());

        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        Ok(self.inner.write().await.products.remove(id).is_some())
    }

    async fn clear_products(&self) -> StoreResult<usize> {
        let mut inner = self.inner.write().await;
        let count = inner.products.len();
        inner.products.clear();

        Ok(count)
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn user(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.inner.read().await;

        Ok(inner
            .users_by_email
            .get(email)
            .and_then(|id| inner.users.get(id))
            .cloned())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write().await;

        if inner.users_by_email.contains_key(&user.email) {
            return Err(StoreError::Duplicate(user.email.clone()));
        }

        inner
            .users_by_email
            .insert(user.email.clone(), user.id.clone());
        inner.users.insert(user.id.clone(), user.clone());

        Ok(())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .users
            .insert(user.id.clone(), user.clone());

        Ok(())
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;

        match inner.users.remove(id) {
            Some(user) => {
                inner.users_by_email.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn orders(&self) -> StoreResult<Vec<Order>> {
        Ok(self.inner.read().await.orders.values().cloned().collect())
    }

    async fn order(&self, id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().await.orders.get(id).cloned())
    }

    async fn save_order(&self, order: &Order) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .orders
            .insert(order.id.clone(), order.clone());

        Ok(())
    }

    async fn put_token(
        &self,
        kind: TokenKind,
        token: &str,
        user_id: &str,
        ttl: Duration,
    ) -> StoreResult<()> {
        let expires = Instant::now().checked_add(ttl);
        let mut inner = self.inner.write().await;

        // expired tokens are otherwise only dropped when presented again
        inner.tokens.retain(|_, (_, expires)| live(*expires));
        inner
            .tokens
            .insert((kind, token.to_string()), (user_id.to_string(), expires));

        Ok(())
    }

    async fn token_owner(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>> {
        let inner = self.inner.read().await;

        Ok(inner
            .tokens
            .get(&(kind, token.to_string()))
            .filter(|(_, expires)| live(*expires))
            .map(|(owner, _)| owner.clone()))
    }

    async fn take_token(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>> {
        let removed = self
            .inner
            .write()
            .await
            .tokens
            .remove(&(kind, token.to_string()));

        Ok(removed
            .filter(|(_, expires)| live(*expires))
            .map(|(owner, _)| owner))
    }

    async fn revoke_token(&self, kind: TokenKind, token: &str) -> StoreResult<()> {
        self.inner
            .write()
            .await
            .tokens
            .remove(&(kind, token.to_string()));

        Ok(())
    }
}
