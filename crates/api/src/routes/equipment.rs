//! Equipment stock and custody routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::equipment::{self as reports, CustodyStatus};
use database::models::{CustodyBreakdown, EquipmentType, StockQuantity, StockSummary};
use serde::Deserialize;

use super::parse_id;
use crate::error::{ApiError, Result};
use crate::policy::Report;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    /// A custody status code or `todos`.
    pub status: Option<String>,
}

/// `GET /api/estoque`
pub async fn stock(State(state): State<AppState>) -> Result<Json<Vec<StockQuantity>>> {
    state
        .run(Report::Stock, |conn| Box::pin(reports::stock_quantities(conn)))
        .await
        .map(Json)
}

/// `GET /api/estoque_geral`
pub async fn stock_summary(State(state): State<AppState>) -> Result<Json<StockSummary>> {
    state
        .run(Report::StockSummary, |conn| Box::pin(reports::stock_summary(conn)))
        .await
        .map(Json)
}

/// `GET /api/estoqueDado/{tipo_equipamento_id}`
pub async fn stock_by_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
) -> Result<Json<StockSummary>> {
    let type_id = parse_id("tipo_equipamento_id", &type_id)?;

    state
        .run(Report::StockByType, move |conn| {
            Box::pin(reports::stock_summary_by_type(conn, type_id))
        })
        .await
        .map(Json)
}

/// `GET /api/status_counts/{tipo_equipamento_id}?status=`
pub async fn custody_by_type(
    State(state): State<AppState>,
    Path(type_id): Path<String>,
    Query(params): Query<StatusParams>,
) -> Result<Json<CustodyBreakdown>> {
    let type_id = parse_id("tipo_equipamento_id", &type_id)?;
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => CustodyStatus::All,
        Some(raw) => raw
            .parse()
            .map_err(|_| ApiError::BadRequest(format!("Status de cautela inválido: {raw}")))?,
    };

    state
        .run(Report::CustodyByType, move |conn| {
            Box::pin(reports::custody_by_type(conn, type_id, status))
        })
        .await
        .map(Json)
}

/// `GET /api/cautela_geral`: the custody breakdown over every equipment type.
pub async fn custody_overall(State(state): State<AppState>) -> Result<Json<CustodyBreakdown>> {
    state
        .run(Report::CustodyOverall, |conn| {
            Box::pin(reports::custody_by_type(conn, 0, CustodyStatus::All))
        })
        .await
        .map(Json)
}

/// `GET /api/TipoEquipamentos`
pub async fn equipment_types(State(state): State<AppState>) -> Result<Json<Vec<EquipmentType>>> {
    state
        .run(Report::EquipmentTypes, |conn| Box::pin(reports::equipment_types(conn)))
        .await
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::unreachable_state;

    #[tokio::test]
    async fn test_stock_without_database_is_internal_error() {
        let err = stock(State(unreachable_state())).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "Erro ao buscar os dados do estoque");
    }

    #[tokio::test]
    async fn test_summary_without_database_is_not_found() {
        let err = stock_summary(State(unreachable_state())).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = custody_overall(State(unreachable_state())).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum dado de cautela encontrado");
    }

    #[tokio::test]
    async fn test_malformed_type_id_is_bad_request() {
        let err = stock_by_type(State(unreachable_state()), Path("pistola".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_malformed_status_is_bad_request() {
        let err = custody_by_type(
            State(unreachable_state()),
            Path("3".to_string()),
            Query(StatusParams {
                status: Some("assinado".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_equipment_types_without_database_is_internal_error() {
        let err = equipment_types(State(unreachable_state())).await.unwrap_err();
        assert_eq!(err.to_string(), "Erro ao buscar os tipos de equipamentos");
    }
}
