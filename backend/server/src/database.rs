//! # Redis
//!
//! Document database for the storefront.
//!
//! ## Layout
//!
//! - `products`, `users`, `orders`: one hash each, id to JSON document
//! - `users:email`: email to user id, claimed with `HSETNX` so two sign ups
//!   for the same address cannot both win
//! - `session:<token>`, `reset:<token>`: user id with an expiry (`SET EX`)
//!
//! Reset tokens are read and deleted in one `MULTI` so a link works once.
use std::time::Duration;

use redis::{
    Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::info;

use crate::store::StoreResult;

pub async fn init_redis(redis_url: &str) -> StoreResult<ConnectionManager> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    info!("Connected to Redis");

    Ok(connection_manager)
}
