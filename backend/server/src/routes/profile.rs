use std::{cmp::Reverse, sync::Arc};

use axum::{Json, extract::State};
use catalog::{Order, PublicUser};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::{ApiResult, AppJson, Envelope, auth::enforce_policy};
use crate::{
    auth::{AuthUser, hash_password, verify_password},
    error::AppError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn get_profile(caller: AuthUser) -> ApiResult<PublicUser> {
    Ok(Json(Envelope::data(caller.user.public())))
}

pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser { mut user, .. }: AuthUser,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> ApiResult<()> {
    if request.current_password.is_empty() {
        return Err(AppError::BadRequest(
            "Current password is required".to_string(),
        ));
    }
    if !verify_password(&request.current_password, &user.password) {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    if request.new_password == request.current_password {
        return Err(AppError::BadRequest(
            "New password must be different from the current password".to_string(),
        ));
    }

    enforce_policy(&request.new_password)?;

    user.password = hash_password(&request.new_password)?;
    user.updated_at = Utc::now();
    state.store.save_user(&user).await?;

    info!("Password changed for {}", user.id);

    Ok(Json(Envelope::message("Password updated successfully")))
}

pub async fn my_orders(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> ApiResult<Vec<Order>> {
    let mut orders: Vec<Order> = state
        .store
        .orders()
        .await?
        .into_iter()
        .filter(|order| order.user_id == caller.user.id)
        .collect();

    orders.sort_by_key(|order| Reverse(order.created_at));

    Ok(Json(Envelope::data(orders)))
}
