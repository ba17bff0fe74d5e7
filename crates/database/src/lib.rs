//! PostgreSQL reporting layer for the PMMT API.
//!
//! This crate provides read-only aggregation queries over two schemas:
//! `coneq` (equipment stock and custody) and `sgpm` (personnel and the unit
//! tree). There is no pool: every request opens one connection through
//! [`Database::acquire`], runs its queries sequentially and hands the
//! connection back to [`Database::release`].
//!
//! # Example
//!
//! ```no_run
//! use database::{equipment, Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new("127.0.0.1", "PMMT", "user_dashboard", "secret");
//!     let db = Database::new(&config);
//!
//!     let mut conn = db.acquire().await?;
//!     let summary = equipment::stock_summary(&mut conn).await?;
//!     Database::release(conn).await;
//!
//!     println!("{} custodies", summary.custodies);
//!     Ok(())
//! }
//! ```
//!
//! # Tests
//!
//! The query builders and result shaping are unit tested offline. The SQL
//! itself runs in `tests/reports.rs`, which is `#[ignore]`d by default and
//! needs a scratch PostgreSQL:
//!
//! ```text
//! TEST_DATABASE_URL=postgres://user:pw@localhost/pmmt_test cargo test -p database -- --ignored
//! ```

pub mod city;
pub mod equipment;
pub mod error;
pub mod filter;
pub mod models;
pub mod personnel;

pub use error::{DatabaseError, Result};
pub use filter::{AdvancedFilter, PersonnelFilter, RankSexFilter};
pub use sqlx::PgConnection;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgConnectOptions;
use sqlx::Connection;

/// Connection parameters for the reporting database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,
    /// Database port (default: 5432).
    pub port: u16,
    /// Database name.
    pub database: String,
    /// Login role.
    pub username: String,
    password: SecretString,
    /// Upper bound on opening a connection.
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Create a configuration with the default port and connect timeout.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: 5432,
            database: database.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            connect_timeout: Database::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Builder method to set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build SQLx connect options from this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(self.password.expose_secret())
            .application_name("pmmt-api")
    }
}

/// Connection factory.
///
/// Holds the connect options built once at startup; cloning is cheap and
/// shares nothing mutable.
#[derive(Clone)]
pub struct Database {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("host", &self.options.get_host())
            .field("port", &self.options.get_port())
            .field("database", &self.options.get_database())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Database {
    /// Default bound on opening a connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a factory from explicit parameters.
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
            connect_timeout: config.connect_timeout,
        }
    }

    /// Create a factory from a `postgres://` URL.
    pub fn from_url(url: &str, connect_timeout: Duration) -> Result<Self> {
        let options = PgConnectOptions::from_str(url)
            .map_err(DatabaseError::InvalidUrl)?
            .application_name("pmmt-api");

        Ok(Self {
            options,
            connect_timeout,
        })
    }

    /// Open a connection for one request.
    pub async fn acquire(&self) -> Result<PgConnection> {
        let connect = PgConnection::connect_with(&self.options);

        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(conn)) => {
                tracing::debug!(
                    host = self.options.get_host(),
                    database = ?self.options.get_database(),
                    "Opened database connection"
                );
                Ok(conn)
            }
            Ok(Err(err)) => Err(DatabaseError::Connection(err)),
            Err(_) => Err(DatabaseError::ConnectTimeout(self.connect_timeout)),
        }
    }

    /// Close a connection at the end of a request.
    pub async fn release(conn: PgConnection) {
        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "Failed to close database connection cleanly");
        }
    }

    /// Connect options in use.
    pub fn options(&self) -> &PgConnectOptions {
        &self.options
    }
}
