//! Service configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` loads an optional `.env` file through `dotenvy` and then builds a
//! single `Config` before any store is opened. Everything downstream receives
//! plain values, never reads the environment itself.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_USERS_DB_PATH: &str = "users.json";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_JWT_SECRET: &str = "dev-secret-change-me";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Lowest bcrypt cost the service will hash with.
pub const MIN_BCRYPT_COST: u32 = 10;
/// Highest cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    /// Location of the identity document.
    pub users_path: PathBuf,
    /// Directory holding one document per account.
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
    pub token_ttl: Duration,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 4001
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `USERS_DB_PATH`: default `users.json`
    /// - `DATA_DIR`: default `data`
    /// - `JWT_SECRET`: default development secret (logged as a warning)
    /// - `BCRYPT_COST`: default 10, never lower
    /// - `TOKEN_TTL_SECS`: default 7 days
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                warn!("JWT_SECRET not set, using development secret");
                DEFAULT_JWT_SECRET.to_owned()
            });

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned()),
            port,
            users_path: std::env::var("USERS_DB_PATH")
                .map_or_else(|_| PathBuf::from(DEFAULT_USERS_DB_PATH), PathBuf::from),
            data_dir: std::env::var("DATA_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            jwt_secret,
            bcrypt_cost: clamp_bcrypt_cost(env_parse("BCRYPT_COST", MIN_BCRYPT_COST)),
            token_ttl: Duration::from_secs(env_parse("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)),
        })
    }

    /// Socket address string for the listener.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

pub(crate) fn clamp_bcrypt_cost(cost: u32) -> u32 {
    if cost < MIN_BCRYPT_COST {
        warn!(cost, min = MIN_BCRYPT_COST, "BCRYPT_COST below minimum, raising");
        return MIN_BCRYPT_COST;
    }
    cost.min(MAX_BCRYPT_COST)
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
