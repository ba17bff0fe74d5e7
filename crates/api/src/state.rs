//! Application state shared across handlers.

use std::sync::Arc;

use city_names::CityNormalizer;
use database::{Database, PgConnection};
use futures::future::BoxFuture;

use crate::error::{ApiError, Result};
use crate::policy::{Report, ReportData};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Connection factory; every request opens its own connection.
    pub db: Database,
    /// City-name candidate generator.
    pub normalizer: Arc<CityNormalizer>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, normalizer: CityNormalizer) -> Self {
        Self {
            db,
            normalizer: Arc::new(normalizer),
        }
    }

    /// Open a connection for `report`.
    ///
    /// A failure is logged and reported as `None`; callers treat it as "no data".
    pub async fn connect(&self, report: Report) -> Option<PgConnection> {
        match self.db.acquire().await {
            Ok(conn) => Some(conn),
            Err(err) => {
                tracing::error!(report = report.name(), error = %err, "Database unavailable, reporting no data");
                None
            }
        }
    }

    /// Run `query` on a request-scoped connection and apply the report's empty policy.
    ///
    /// Without a connection the report sees `T::default()`. A failed query
    /// becomes a 500 carrying the report context.
    pub async fn run<T, F>(&self, report: Report, query: F) -> Result<T>
    where
        T: ReportData + Default + Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, database::Result<T>> + Send,
    {
        let data = match self.connect(report).await {
            Some(mut conn) => {
                let result = query(&mut conn).await;
                Database::release(conn).await;
                result.map_err(|source| ApiError::Database {
                    context: report.context(),
                    source,
                })?
            }
            None => T::default(),
        };

        report.finish(data)
    }
}
