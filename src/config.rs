//! Configuration management for the board service.
//!
//! Configuration can be set via environment variables:
//! - `JWT_SECRET` - Required for serving. Secret used to sign and verify access tokens.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.
//! - `BOARD_STORE` - Optional. `memory` or `sqlite`. Defaults to `sqlite`.
//! - `DATA_DIR` - Optional. Directory for the SQLite database. Defaults to `./data`.
//! - `TOKEN_TTL_DAYS` - Optional. Access token lifetime. Defaults to `3`.
//! - `STORE_TIMEOUT_MS` - Optional. Deadline for individual store calls. Defaults to `5000`.

use crate::store::StoreType;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Which board store backend to use
    pub store_type: StoreType,

    /// Directory for persistent store files
    pub data_dir: PathBuf,

    /// Secret used to sign and verify access tokens
    pub jwt_secret: String,

    /// Access token lifetime in days
    pub token_ttl_days: i64,

    /// Bounded deadline for individual store calls
    pub store_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `JWT_SECRET` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let store_type = StoreType::parse(
            &std::env::var("BOARD_STORE").unwrap_or_else(|_| "sqlite".to_string()),
        );

        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let token_ttl_days = std::env::var("TOKEN_TTL_DAYS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("TOKEN_TTL_DAYS".to_string(), format!("{}", e))
            })?;

        let store_timeout_ms: u64 = std::env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("STORE_TIMEOUT_MS".to_string(), format!("{}", e))
            })?;

        Ok(Self {
            host,
            port,
            store_type,
            data_dir,
            jwt_secret,
            token_ttl_days,
            store_timeout: Duration::from_millis(store_timeout_ms),
        })
    }
}
