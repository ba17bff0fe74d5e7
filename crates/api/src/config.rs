//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use database::{Database, DatabaseConfig, DatabaseError};
use secrecy::{ExposeSecret, SecretString};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// How to reach the reporting database.
#[derive(Debug, Clone)]
pub enum DatabaseSettings {
    /// A full `postgres://` URL.
    Url(SecretString),
    /// Individual connection parameters.
    Parts(DatabaseConfig),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// Database connection settings.
    pub database: DatabaseSettings,
    /// Upper bound on opening a connection.
    pub connect_timeout: Duration,
    /// Origins allowed by CORS.
    pub cors_origins: Vec<HeaderValue>,
    /// Optional JSON city correction table.
    pub corrections_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `0.0.0.0:8000` |
    /// | `DATABASE_URL` | Full postgres URL, overrides the parts below | (none) |
    /// | `DATABASE_HOST` | Database host | `127.0.0.1` |
    /// | `DATABASE_PORT` | Database port | `5432` |
    /// | `DATABASE_NAME` | Database name | `PMMT` |
    /// | `DATABASE_USER` | Login role | `user_dashboard` |
    /// | `DATABASE_PASSWORD` | Password | (required without `DATABASE_URL`) |
    /// | `DATABASE_CONNECT_TIMEOUT_SECS` | Connect timeout | `5` |
    /// | `CORS_ORIGINS` | Comma-separated allowed origins | `http://localhost:3000,http://127.0.0.1:3000` |
    /// | `CITY_CORRECTIONS_PATH` | City correction table (JSON) | built-in table |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let addr = var("API_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let connect_timeout = match var("DATABASE_CONNECT_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidConnectTimeout(raw))?,
            ),
            None => Database::DEFAULT_CONNECT_TIMEOUT,
        };

        let database = match var("DATABASE_URL") {
            Some(url) => DatabaseSettings::Url(SecretString::from(url)),
            None => {
                let password = var("DATABASE_PASSWORD").ok_or(ConfigError::MissingPassword)?;
                let port = match var("DATABASE_PORT") {
                    Some(raw) => raw
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidPort(raw))?,
                    None => 5432,
                };
                let config = DatabaseConfig::new(
                    var("DATABASE_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                    var("DATABASE_NAME").unwrap_or_else(|| "PMMT".to_string()),
                    var("DATABASE_USER").unwrap_or_else(|| "user_dashboard".to_string()),
                    password,
                )
                .with_port(port)
                .with_connect_timeout(connect_timeout);
                DatabaseSettings::Parts(config)
            }
        };

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            addr,
            database,
            connect_timeout,
            cors_origins,
            corrections_path: var("CITY_CORRECTIONS_PATH").map(PathBuf::from),
        })
    }

    /// Build the connection factory.
    pub fn database(&self) -> Result<Database, DatabaseError> {
        match &self.database {
            DatabaseSettings::Url(url) => Database::from_url(url.expose_secret(), self.connect_timeout),
            DatabaseSettings::Parts(config) => Ok(Database::new(config)),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("Invalid DATABASE_PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid DATABASE_CONNECT_TIMEOUT_SECS: {0}")]
    InvalidConnectTimeout(String),

    #[error("DATABASE_PASSWORD environment variable is required when DATABASE_URL is not set")]
    MissingPassword,

    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}
