//! City-scoped routes.
//!
//! These never fail on the database side: an unreachable server or a failed
//! query is logged and answered with zero counts for every requested city.

use axum::extract::{Query, State};
use axum::Json;
use city_names::strip_accents;
use database::city as reports;
use database::filter::split_list;
use database::models::{CityCustodyCount, CityDeliveryCount, CityHeadcount, UnitSexCount};
use database::Database;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::policy::Report;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CitiesParams {
    /// Comma-separated city names.
    pub cidades: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityParams {
    pub cidade: Option<String>,
}

/// Requested names for the equipment reports: trimmed, accents removed.
///
/// Blank entries are kept so the response has one record per list position.
fn equipment_city_list(raw: Option<&str>) -> Result<Vec<String>> {
    let raw = raw.ok_or_else(|| {
        ApiError::BadRequest("Lista de cidades não pode estar vazia".to_string())
    })?;
    Ok(raw.split(',').map(|city| strip_accents(city.trim())).collect())
}

/// `GET /api/quantitativoPorCidade?cidades=`
pub async fn custody_by_city(
    State(state): State<AppState>,
    Query(params): Query<CitiesParams>,
) -> Result<Json<Vec<CityCustodyCount>>> {
    let cities = equipment_city_list(params.cidades.as_deref())?;
    let report = Report::CustodyByCity;

    let Some(mut conn) = state.connect(report).await else {
        return Ok(Json(cities.iter().map(CityCustodyCount::zero).collect()));
    };
    let result = reports::custody_by_city(&mut conn, &cities).await;
    Database::release(conn).await;

    let records = result.unwrap_or_else(|err| {
        tracing::error!(report = report.name(), error = %err, "{}", report.context());
        cities.iter().map(CityCustodyCount::zero).collect()
    });
    Ok(Json(records))
}

/// `GET /api/contar_entregas_por_cidade?cidades=`
pub async fn deliveries_by_city(
    State(state): State<AppState>,
    Query(params): Query<CitiesParams>,
) -> Result<Json<Vec<CityDeliveryCount>>> {
    let cities = equipment_city_list(params.cidades.as_deref())?;
    let report = Report::DeliveriesByCity;

    let Some(mut conn) = state.connect(report).await else {
        return Ok(Json(cities.iter().map(CityDeliveryCount::zero).collect()));
    };
    let result = reports::deliveries_by_city(&mut conn, &cities).await;
    Database::release(conn).await;

    let records = result.unwrap_or_else(|err| {
        tracing::error!(report = report.name(), error = %err, "{}", report.context());
        cities.iter().map(CityDeliveryCount::zero).collect()
    });
    Ok(Json(records))
}

/// `GET /api/contar_sexo_por_cidade?cidades=`
///
/// One record per non-blank requested name. Each name is resolved to the
/// best-matching canonical city; unmatched names get zero counts under the
/// upper-cased name.
pub async fn headcount_by_city(
    State(state): State<AppState>,
    Query(params): Query<CitiesParams>,
) -> Result<Json<Vec<CityHeadcount>>> {
    let cities = split_list(params.cidades.as_deref());
    if cities.is_empty() {
        return Err(ApiError::BadRequest(
            "Lista de cidades não pode estar vazia".to_string(),
        ));
    }

    let Some(mut conn) = state.connect(Report::HeadcountByCity).await else {
        return Ok(Json(cities.iter().map(|city| reports::unmatched(city)).collect()));
    };

    let mut records = Vec::with_capacity(cities.len());
    for city in &cities {
        records.push(reports::headcount_for_city(&mut conn, &state.normalizer, city).await);
    }
    Database::release(conn).await;

    tracing::debug!(cities = cities.len(), "Resolved city headcounts");
    Ok(Json(records))
}

/// `GET /api/contar_sexo_por_unidade?cidade=`
pub async fn units_in_city(
    State(state): State<AppState>,
    Query(params): Query<CityParams>,
) -> Result<Json<Vec<UnitSexCount>>> {
    let city = params
        .cidade
        .as_deref()
        .map(str::trim)
        .filter(|city| !city.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Nome da cidade não pode estar vazio".to_string()))?;
    let report = Report::UnitsInCity;

    let Some(mut conn) = state.connect(report).await else {
        return Ok(Json(Vec::new()));
    };
    let result = reports::units_in_city(&mut conn, city).await;
    Database::release(conn).await;

    let units = result.unwrap_or_else(|err| {
        tracing::error!(report = report.name(), %city, error = %err, "{}", report.context());
        Vec::new()
    });
    Ok(Json(units))
}
