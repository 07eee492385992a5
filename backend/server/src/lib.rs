//! Storefront API: catalog, accounts, checkout and the admin back-office.
//!
//!
//!
//! # General Infrastructure
//! - Browser talks to this server over JSON, every body is an envelope `{ success, data?, message?, errors? }`
//! - Redis holds products, users, orders and tokens, see [`database`] for the key layout
//! - `STORE=memory` swaps Redis for an in-process store, used by tests and quick local runs
//! - Carts live in the client, the server only re-prices them
//!
//!
//!
//! # Accounts
//!
//! - Passwords are Argon2id hashes, see [`auth`]
//! - Sessions are opaque bearer tokens with a TTL, logout revokes them
//! - Reset tokens are single use and expire after `RESET_TTL_SECS`
//! - The first admin can be created without signing in; after that only admins can create admins
//!
//!
//!
//! # Notes
//!
//! ## Stock
//! Stock is checked when an order is placed but never reserved or decremented. Two checkouts racing for the
//! last unit both succeed. Fine while checkout is behind `CHECKOUT_ENABLED`.
//!
//! ## Prices
//! Prices are `f64` on the wire. Cart and order totals are summed in whole cents so they come out exact.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 RUST_LOG=info cargo run -p storefront
//! ```
//!
//! Run without Redis.
//! ```sh
//! STORE=memory RUST_LOG=debug cargo run -p storefront
//! ```
//!
//! Seed a development database.
//! ```sh
//! OPS_EMAIL=admin@example.com OPS_PASSWORD=... cargo run -p ops -- seed
//! ```
use std::sync::Arc;

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;
pub mod utils;

pub use config::{Config, Environment, StoreBackend};
pub use error::{AppError, ServerError};
pub use state::AppState;
pub use store::{MemoryStore, RedisStore, Store};

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(state.config.cors_max_age);

    routes::router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> Result<(), ServerError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!(
        "Server running on {address} ({:?})",
        state.config.environment
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
