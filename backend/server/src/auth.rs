//! # Authentication
//!
//! Passwords are stored as Argon2id PHC strings. Sessions are opaque bearer
//! tokens kept in the store with a TTL, sent back as
//! `Authorization: Bearer <token>`.
//!
//! Handlers ask for a caller through extractors:
//! - [`AuthUser`]: any signed in user, 401 otherwise
//! - [`AdminUser`]: signed in admin, 403 for everyone else
//! - [`MaybeUser`]: optional, never rejects
use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use catalog::User;

use crate::{error::AppError, state::AppState, store::TokenKind};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AppError::Internal(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// False for a wrong password and for a hash that does not parse.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

async fn session_user(state: &AppState, token: &str) -> Result<Option<User>, AppError> {
    let Some(user_id) = state.store.token_owner(TokenKind::Session, token).await? else {
        return Ok(None);
    };

    Ok(state.store.user(&user_id).await?)
}

pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let user = session_user(state, &token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Self { user, token })
    }
}

pub struct AdminUser(pub User);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::admin_only());
        }

        Ok(Self(user))
    }
}

/// Caller if a valid session was presented. A bad token is treated as anonymous.
pub struct MaybeUser(pub Option<User>);

impl MaybeUser {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(User::is_admin)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts) {
            Some(token) => Ok(Self(session_user(state, &token).await?)),
            None => Ok(Self(None)),
        }
    }
}
