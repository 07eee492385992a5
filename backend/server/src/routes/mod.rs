use std::sync::Arc;

use axum::{
    Json, Router,
    extract::FromRequest,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod profile;
pub mod seed;

/// Every response body: `{ success, data?, message?, errors? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(message: String, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors,
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, AppError>;

pub type Created<T> = Result<(StatusCode, Json<Envelope<T>>), AppError>;

/// JSON body whose rejections come back as an [`Envelope`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

async fn health() -> Json<Envelope<serde_json::Value>> {
    Json(Envelope::data(serde_json::json!({ "status": "ok" })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/featured", get(products::featured_product))
        .route(
            "/api/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/cart/summary", post(cart::summarize_cart))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/password-policy", post(auth::password_policy))
        .route("/api/profile", get(profile::get_profile))
        .route("/api/profile/password", put(profile::change_password))
        .route("/api/profile/orders", get(profile::my_orders))
        .route("/api/orders", post(orders::create_order))
        .route(
            "/api/admin/users",
            get(admin::list_users)
                .put(admin::update_user_role)
                .delete(admin::delete_user),
        )
        .route("/api/admin/create-admin", post(admin::create_admin))
        .route(
            "/api/admin/orders",
            get(admin::list_orders).patch(admin::update_order_status),
        )
        .route(
            "/api/seed",
            get(seed::seed_status)
                .post(seed::seed_database)
                .delete(seed::clear_database),
        )
}
