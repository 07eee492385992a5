use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

pub const TOKEN_LENGTH: usize = 48;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Bearer and reset tokens.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// `ORD-YYYYMMDD-XXXXXX`, the suffix is random uppercase alphanumerics.
pub fn order_number(now: DateTime<Utc>) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();

    format!("ORD-{}-{suffix}", now.format("%Y%m%d"))
}

pub fn expires_at(ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Page size for listings, defaulting to `default` and never above `max`.
pub fn clamp_limit(limit: Option<usize>, default: usize, max: usize) -> usize {
    limit.unwrap_or(default).clamp(1, max)
}
