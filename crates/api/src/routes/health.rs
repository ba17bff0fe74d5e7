//! Liveness check.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Report that the process is serving requests. Does not touch the database.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: "pmmt-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}
