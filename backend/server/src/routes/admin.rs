//! Back-office routes, all admin only apart from the first `create-admin`.
//!
//! First admin creation is serialized per process. Several server processes
//! sharing one Redis can still race each other into more than one bootstrap
//! admin.
use std::{cmp::Reverse, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use catalog::{Order, OrderStatus, PublicUser, Role};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{
    ApiResult, AppJson, Created, Envelope,
    auth::{RegisterRequest, create_account},
};
use crate::{
    auth::{AdminUser, MaybeUser},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleUpdate {
    pub user_id: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub order_id: String,
    pub status: OrderStatus,
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Vec<PublicUser>> {
    let mut users = state.store.users().await?;
    users.sort_by_key(|user| user.created_at);

    Ok(Json(Envelope::data(
        users.iter().map(|user| user.public()).collect(),
    )))
}

pub async fn update_user_role(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    AppJson(update): AppJson<RoleUpdate>,
) -> ApiResult<PublicUser> {
    if update.user_id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot change your own role".to_string(),
        ));
    }

    let mut user = state
        .store
        .user(&update.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    user.role = update.role;
    user.updated_at = Utc::now();
    state.store.save_user(&user).await?;

    info!("{} set role of {} to {}", admin.id, user.id, user.role.as_str());

    Ok(Json(
        Envelope::data(user.public()).with_message("User role updated successfully"),
    ))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<UserQuery>,
) -> ApiResult<()> {
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("User ID is required".to_string()))?;

    if user_id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    if !state.store.delete_user(&user_id).await? {
        return Err(user_not_found());
    }

    info!("{} deleted user {}", admin.id, user_id);

    Ok(Json(Envelope::message("User deleted successfully")))
}

/// Open to anyone until the first admin exists, admins only afterwards.
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    caller: MaybeUser,
    AppJson(request): AppJson<RegisterRequest>,
) -> Created<PublicUser> {
    let user = if caller.is_admin() {
        create_account(&state, request, Role::Admin).await?
    } else {
        // check and insert under one lock so concurrent bootstraps cannot both pass
        let _bootstrap = state.admin_bootstrap.lock().await;

        let admin_exists = state.store.users().await?.iter().any(|user| user.is_admin());
        if admin_exists {
            return Err(match caller.0 {
                None => AppError::Unauthorized,
                Some(_) => AppError::admin_only(),
            });
        }

        create_account(&state, request, Role::Admin).await?
    };

    info!("Admin account created for {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(user.public()).with_message("Admin user created successfully")),
    ))
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> ApiResult<Vec<Order>> {
    let mut orders = state.store.orders().await?;
    orders.sort_by_key(|order| Reverse(order.created_at));

    Ok(Json(Envelope::data(orders)))
}

/// Any status may follow any other.
pub async fn update_order_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    AppJson(update): AppJson<StatusUpdate>,
) -> ApiResult<Order> {
    let mut order = state
        .store
        .order(&update.order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    order.set_status(update.status, Utc::now());
    state.store.save_order(&order).await?;

    info!(
        "{} moved order {} to {}",
        admin.id,
        order.order_number,
        order.status.as_str()
    );

    Ok(Json(
        Envelope::data(order).with_message("Order status updated successfully"),
    ))
}
