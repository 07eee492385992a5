use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
#[error("Invalid {key} value {value:?}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("expected development, test or production, got {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("expected redis or memory, got {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub store: StoreBackend,
    pub redis_url: String,
    pub public_url: String,
    pub session_ttl: Duration,
    pub reset_ttl: Duration,
    pub checkout_enabled: bool,
    pub cors_max_age: Duration,
}

impl Config {
    /// Environment variables, with Docker secrets taking precedence.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "8080")?,
            environment: try_load(&lookup, "APP_ENV", "development")?,
            store: try_load(&lookup, "STORE", "redis")?,
            redis_url: try_load(&lookup, "REDIS_URL", "redis://127.0.0.1:6379")?,
            public_url: try_load(&lookup, "PUBLIC_URL", "http://localhost:3000")?,
            session_ttl: Duration::from_secs(try_load(&lookup, "SESSION_TTL_SECS", "604800")?),
            reset_ttl: Duration::from_secs(try_load(&lookup, "RESET_TTL_SECS", "3600")?),
            checkout_enabled: try_load(&lookup, "CHECKOUT_ENABLED", "false")?,
            cors_max_age: Duration::from_secs(try_load(&lookup, "CORS_MAX_AGE_SECS", "3600")?),
        })
    }
}

/// The values [`Config::load`] falls back to when nothing is set.
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: Environment::Development,
            store: StoreBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            public_url: "http://localhost:3000".to_string(),
            session_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            reset_ttl: Duration::from_secs(60 * 60),
            checkout_enabled: false,
            cors_max_age: Duration::from_secs(60 * 60),
        }
    }
}

fn lookup(key: &str) -> Option<String> {
    read_secret(key).or_else(|| env::var(key).ok())
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }
    })
}

fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path).ok().map(|s| s.trim().to_string())
}
