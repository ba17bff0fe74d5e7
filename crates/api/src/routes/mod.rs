//! Route handlers for the reporting API.

pub mod cities;
pub mod equipment;
pub mod health;
pub mod personnel;

use axum::routing::get;
use axum::Router;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        // Equipment and custody
        .route("/api/estoque", get(equipment::stock))
        .route("/api/estoque_geral", get(equipment::stock_summary))
        .route("/api/estoqueDado/:tipo_equipamento_id", get(equipment::stock_by_type))
        .route("/api/status_counts/:tipo_equipamento_id", get(equipment::custody_by_type))
        .route("/api/cautela_geral", get(equipment::custody_overall))
        .route("/api/TipoEquipamentos", get(equipment::equipment_types))
        .route("/api/quantitativoPorCidade", get(cities::custody_by_city))
        .route("/api/contar_entregas_por_cidade", get(cities::deliveries_by_city))
        // Personnel
        .route("/api/policiais_sexo", get(personnel::by_sex))
        .route("/api/policiais_tipo", get(personnel::by_type))
        .route("/api/policiais_situacao", get(personnel::by_situation))
        .route("/api/policiais_posto_grad", get(personnel::by_rank))
        .route("/api/policiais_unidade", get(personnel::by_unit))
        .route("/api/policiais_comando_regional", get(personnel::by_regional_command))
        .route("/api/dados_posto_grad", get(personnel::rank_by_sex))
        .route("/api/policiais_filtro", get(personnel::filtered))
        .route("/api/postos_graduacao_sgpm", get(personnel::ranks))
        .route("/api/unidades_sgpm", get(personnel::units))
        .route("/api/comandos_regionais", get(personnel::regional_commands))
        .route("/api/unidades_por_comando", get(personnel::units_under_command))
        .route("/api/policiais_filtro_avancado", get(personnel::advanced))
        .route("/api/totais-por-cr", get(personnel::totals_by_regional_command))
        // City headcounts
        .route("/api/contar_sexo_por_cidade", get(cities::headcount_by_city))
        .route("/api/contar_sexo_por_unidade", get(cities::units_in_city))
}

/// Parse a numeric id parameter.
pub(crate) fn parse_id(name: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Parâmetro '{name}' inválido: {raw}")))
}

/// Parse an optional numeric id; blank counts as absent.
pub(crate) fn optional_id(name: &str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_id(name, value).map(Some),
        None => Ok(None),
    }
}

/// Trim an optional text parameter; blank counts as absent.
pub(crate) fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Duration;

    use city_names::CityNormalizer;
    use database::{Database, DatabaseConfig};

    use crate::state::AppState;

    /// State whose database refuses every connection.
    pub fn unreachable_state() -> AppState {
        let config = DatabaseConfig::new("127.0.0.1", "PMMT", "user_dashboard", "pw")
            .with_port(1)
            .with_connect_timeout(Duration::from_secs(2));
        AppState::new(Database::new(&config), CityNormalizer::default())
    }
}
