use std::time::Duration;

use async_trait::async_trait;
use catalog::{Order, Product, User};
use redis::{AsyncCommands, Script, aio::ConnectionManager, pipe};
use serde::{Serialize, de::DeserializeOwned};

use super::{Store, StoreError, StoreResult, TokenKind};

pub const PRODUCTS: &str = "products";
pub const USERS: &str = "users";
pub const USERS_BY_EMAIL: &str = "users:email";
pub const ORDERS: &str = "orders";

// KEYS: email index, users. ARGV: email, id, document.
const INSERT_USER: &str = r"
if redis.call('HSETNX', KEYS[1], ARGV[1], ARGV[2]) == 0 then
    return 0
end
redis.call('HSET', KEYS[2], ARGV[2], ARGV[3])
return 1
";

/// One Redis hash per collection, id to JSON document.
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    async fn get<T: DeserializeOwned>(&self, hash: &str, id: &str) -> StoreResult<Option<T>> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.hget(hash, id).await?;

        Ok(value.map(|v| serde_json::from_str::<T>(&v)).transpose()?)
    }

    async fn all<T: DeserializeOwned>(&self, hash: &str) -> StoreResult<Vec<T>> {
        let mut connection = self.connection.clone();
        let values: Vec<String> = connection.hvals(hash).await?;

        values
            .iter()
            .map(|v| serde_json::from_str::<T>(v).map_err(StoreError::from))
            .collect()
    }

    async fn put<T: Serialize + Sync>(&self, hash: &str, id: &str, document: &T) -> StoreResult<()> {
        let mut connection = self.connection.clone();
        let value = serde_json::to_string(document)?;
        let _: () = connection.hset(hash, id, value).await?;

        Ok(())
    }

    async fn remove(&self, hash: &str, id: &str) -> StoreResult<bool> {
        let mut connection = self.connection.clone();
        let removed: usize = connection.hdel(hash, id).await?;

        Ok(removed > 0)
    }
}

fn token_key(kind: TokenKind, token: &str) -> String {
    format!("{}:{token}", kind.prefix())
}

#[async_trait]
impl Store for RedisStore {
    async fn products(&self) -> StoreResult<Vec<Product>> {
        self.all(PRODUCTS).await
    }

    async fn product(&self, id: &str) -> StoreResult<Option<Product>> {
        self.get(PRODUCTS, id).await
    }

    async fn save_product(&self, product: &Product) -> StoreResult<()> {
        self.put(PRODUCTS, &product.id, product).await
    }

    async fn delete_product(&self, id: &str) -> StoreResult<bool> {
        self.remove(PRODUCTS, id).await
    }

    async fn clear_products(&self) -> StoreResult<usize> {
        let mut connection = self.connection.clone();
        let (count,): (usize,) = pipe()
            .atomic()
            .hlen(PRODUCTS)
            .del(PRODUCTS)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(count)
    }

    async fn users(&self) -> StoreResult<Vec<User>> {
        self.all(USERS).await
    }

    async fn user(&self, id: &str) -> StoreResult<Option<User>> {
        self.get(USERS, id).await
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let mut connection = self.connection.clone();
        let id: Option<String> = connection.hget(USERS_BY_EMAIL, email).await?;

        match id {
            Some(id) => self.user(&id).await,
            None => Ok(None),
        }
    }

    /// Email claim and document write run as one script, so a failed write
    /// cannot leave the email indexed without its user.
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let document = serde_json::to_string(user)?;
        let mut connection = self.connection.clone();

        let inserted: bool = Script::new(INSERT_USER)
            .key(USERS_BY_EMAIL)
            .key(USERS)
            .arg(&user.email)
            .arg(&user.id)
            .arg(document)
            .invoke_async(&mut connection)
            .await?;

        if !inserted {
            return Err(StoreError::Duplicate(user.email.clone()));
        }

        Ok(())
    }

    async fn save_user(&self, user: &User) -> StoreResult<()> {
        self.put(USERS, &user.id, user).await
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let Some(user) = self.user(id).await? else {
            return Ok(false);
        };

        let mut connection = self.connection.clone();
        let _: () = pipe()
            .atomic()
            .hdel(USERS, id)
            .ignore()
            .hdel(USERS_BY_EMAIL, &user.email)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(true)
    }

    async fn orders(&self) -> StoreResult<Vec<Order>> {
        self.all(ORDERS).await
    }

    async fn order(&self, id: &str) -> StoreResult<Option<Order>> {
        self.get(ORDERS, id).await
    }

    async fn save_order(&self, order: &Order) -> StoreResult<()> {
        self.put(ORDERS, &order.id, order).await
    }

    async fn put_token(
        &self,
        kind: TokenKind,
        token: &str,
        user_id: &str,
        ttl: Duration,
    ) -> StoreResult<()> {
        let mut connection = self.connection.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = connection
            .set_ex(token_key(kind, token), user_id, seconds)
            .await?;

        Ok(())
    }

    async fn token_owner(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>> {
        let mut connection = self.connection.clone();

        Ok(connection.get(token_key(kind, token)).await?)
    }

    async fn take_token(&self, kind: TokenKind, token: &str) -> StoreResult<Option<String>> {
        let key = token_key(kind, token);
        let mut connection = self.connection.clone();
        let (owner,): (Option<String>,) = pipe()
            .atomic()
            .get(&key)
            .del(&key)
            .ignore()
            .query_async(&mut connection)
            .await?;

        Ok(owner)
    }

    async fn revoke_token(&self, kind: TokenKind, token: &str) -> StoreResult<()> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(token_key(kind, token)).await?;

        Ok(())
    }
}
