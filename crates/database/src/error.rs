//! Database error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Opening a connection failed (unreachable host, bad credentials, TLS, ...).
    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    /// Opening a connection took longer than the configured timeout.
    #[error("timed out connecting to database after {0:?}")]
    ConnectTimeout(Duration),

    /// The connection URL could not be parsed.
    #[error("invalid database url: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    /// SQLx error while running a query.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Whether the error happened before any query was issued.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            DatabaseError::Connection(_) | DatabaseError::ConnectTimeout(_)
        )
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
