use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::init_redis,
    store::{MemoryStore, RedisStore, Store, StoreResult},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    /// Held while an anonymous caller creates the first admin.
    pub admin_bootstrap: Mutex<()>,
}

impl AppState {
    pub async fn new(config: Config) -> StoreResult<Arc<Self>> {
        let store: Arc<dyn Store> = match config.store {
            StoreBackend::Redis => Arc::new(RedisStore::new(init_redis(&config.redis_url).await?)),
            StoreBackend::Memory => {
                info!("Using in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            admin_bootstrap: Mutex::new(()),
        })
    }
}
