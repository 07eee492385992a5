use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use catalog::{
    PublicUser, Role, User, Violation,
    user::{is_plausible_email, normalize_email},
    validate_password,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ApiResult, AppJson, Created, Envelope};
use crate::{
    auth::{AuthUser, hash_password, verify_password},
    error::AppError,
    state::AppState,
    store::{StoreError, TokenKind},
    utils::{expires_at, generate_token, new_id},
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPassword {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct PolicyReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

const FORGOT_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";

/// Rejects a password that breaks the policy, listing every violation.
pub fn enforce_policy(password: &str) -> Result<(), AppError> {
    let violations = validate_password(password);

    if violations.is_empty() {
        return Ok(());
    }

    Err(AppError::validation(
        "Password does not meet security requirements",
        violations.iter().map(ToString::to_string).collect(),
    ))
}

/// Shared by self sign up and admin creation.
pub async fn create_account(
    state: &AppState,
    request: RegisterRequest,
    role: Role,
) -> Result<User, AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let email = normalize_email(&request.email);
    if !is_plausible_email(&email) {
        return Err(AppError::BadRequest(
            "Please provide a valid email address".to_string(),
        ));
    }

    enforce_policy(&request.password)?;

    let now = Utc::now();
    let user = User {
        id: new_id(),
        name: name.to_string(),
        email,
        password: hash_password(&request.password)?,
        role,
        created_at: now,
        updated_at: now,
    };

    match state.store.insert_user(&user).await {
        Ok(()) => Ok(user),
        Err(StoreError::Duplicate(_)) => Err(AppError::Conflict(
            "User with this email already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Created<PublicUser> {
    let user = create_account(&state, request, Role::User).await?;

    info!("User {} registered", user.id);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(user.public()).with_message("User created successfully")),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<Session> {
    let user = state
        .store
        .user_by_email(&normalize_email(&request.email))
        .await?
        .filter(|user| verify_password(&request.password, &user.password))
        .ok_or(AppError::InvalidCredentials)?;

    let token = generate_token();
    let ttl = state.config.session_ttl;
    state
        .store
        .put_token(TokenKind::Session, &token, &user.id, ttl)
        .await?;

    info!("User {} signed in", user.id);

    Ok(Json(Envelope::data(Session {
        token,
        expires_at: expires_at(ttl),
        user: user.public(),
    })))
}

pub async fn logout(State(state): State<Arc<AppState>>, caller: AuthUser) -> ApiResult<()> {
    state
        .store
        .revoke_token(TokenKind::Session, &caller.token)
        .await?;

    Ok(Json(Envelope::message("Signed out successfully")))
}

/// Same answer whether or not the email is known. Outside production the
/// link is also returned so it can be followed without a mail server.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<ForgotPasswordRequest>,
) -> ApiResult<ForgotPassword> {
    let email = normalize_email(&request.email);
    if !is_plausible_email(&email) {
        return Err(AppError::BadRequest(
            "Please provide a valid email address".to_string(),
        ));
    }

    let Some(user) = state.store.user_by_email(&email).await? else {
        warn!("Password reset requested for unknown email");
        return Ok(Json(
            Envelope::data(ForgotPassword { reset_url: None }).with_message(FORGOT_MESSAGE),
        ));
    };

    let token = generate_token();
    state
        .store
        .put_token(TokenKind::PasswordReset, &token, &user.id, state.config.reset_ttl)
        .await?;

    let reset_url = format!(
        "{}/auth/reset-password?token={token}",
        state.config.public_url.trim_end_matches('/')
    );
    info!("Password reset link for {}: {reset_url}", user.id);

    let reset_url = (!state.config.environment.is_production()).then_some(reset_url);

    Ok(Json(
        Envelope::data(ForgotPassword { reset_url }).with_message(FORGOT_MESSAGE),
    ))
}

pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    let invalid = || AppError::BadRequest("Invalid or expired reset token".to_string());

    if request.token.trim().is_empty() {
        return Err(invalid());
    }

    // checked first so a rejected password does not burn the link
    enforce_policy(&request.new_password)?;

    let user_id = state
        .store
        .take_token(TokenKind::PasswordReset, request.token.trim())
        .await?
        .ok_or_else(invalid)?;
    let mut user = state.store.user(&user_id).await?.ok_or_else(invalid)?;

    user.password = hash_password(&request.new_password)?;
    user.updated_at = Utc::now();
    state.store.save_user(&user).await?;

    info!("Password reset for {}", user.id);

    Ok(Json(Envelope::message("Password has been reset successfully")))
}

pub async fn password_policy(AppJson(request): AppJson<PolicyRequest>) -> ApiResult<PolicyReport> {
    let violations = validate_password(&request.password);

    Ok(Json(Envelope::data(PolicyReport {
        valid: violations.is_empty(),
        violations,
    })))
}
