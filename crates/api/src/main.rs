//! PMMT reporting API.
//!
//! Read-only JSON reports over equipment custody (`coneq`) and personnel
//! (`sgpm`) data.

mod config;
mod error;
mod policy;
mod routes;
mod state;

use axum::http::Method;
use city_names::{CityNormalizer, CorrectionTable};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting PMMT API");

    // Connections are opened per request; nothing is dialed here.
    let db = config.database()?;
    info!(?db, "Database configured");

    let corrections = match &config.corrections_path {
        Some(path) => CorrectionTable::load(path)?,
        None => CorrectionTable::default(),
    };
    info!(entries = corrections.len(), "City corrections ready");

    let state = AppState::new(db, CityNormalizer::new(corrections));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origins.clone())
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let app = routes::router().layer(cors).with_state(state);

    info!(addr = %config.addr, "PMMT API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
