//! Personnel headcount routes.

use axum::extract::{Query, State};
use axum::Json;
use database::filter::{split_ids, split_list};
use database::models::{
    AdvancedCount, FilteredCount, Rank, RankBySex, RankCount, RegionalCommandCount, SexCount,
    SituationCount, TypeCount, Unit, UnitCount,
};
use database::personnel as reports;
use database::{AdvancedFilter, PersonnelFilter, RankSexFilter};
use indexmap::IndexMap;
use serde::Deserialize;

use super::{optional_id, optional_text, parse_id};
use crate::error::{ApiError, Result};
use crate::policy::Report;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RankParams {
    pub posto_grad: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UnitParams {
    pub unidade: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegionalCommandParams {
    pub comando_regional: Option<String>,
}

/// Filters shared by the rank breakdown and the filter reports.
///
/// Multi-value parameters are comma-separated.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub sexo: Option<String>,
    pub situacao: Option<String>,
    pub tipo: Option<String>,
    pub posto_grad: Option<String>,
    pub unidade: Option<String>,
    pub comando_regional: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommandParams {
    pub comando_id: Option<String>,
}

pub async fn by_sex(State(state): State<AppState>) -> Result<Json<Vec<SexCount>>> {
    state
        .run(Report::HeadcountBySex, |conn| Box::pin(reports::headcount_by_sex(conn)))
        .await
        .map(Json)
}

pub async fn by_type(State(state): State<AppState>) -> Result<Json<Vec<TypeCount>>> {
    state
        .run(Report::HeadcountByType, |conn| Box::pin(reports::headcount_by_type(conn)))
        .await
        .map(Json)
}

pub async fn by_situation(State(state): State<AppState>) -> Result<Json<Vec<SituationCount>>> {
    state
        .run(Report::HeadcountBySituation, |conn| {
            Box::pin(reports::headcount_by_situation(conn))
        })
        .await
        .map(Json)
}

/// `GET /api/policiais_posto_grad?posto_grad=`
pub async fn by_rank(
    State(state): State<AppState>,
    Query(params): Query<RankParams>,
) -> Result<Json<Vec<RankCount>>> {
    let rank = optional_text(params.posto_grad);

    state
        .run(Report::HeadcountByRank, move |conn| {
            Box::pin(async move { reports::headcount_by_rank(conn, rank.as_deref()).await })
        })
        .await
        .map(Json)
}

/// `GET /api/policiais_unidade?unidade=`
pub async fn by_unit(
    State(state): State<AppState>,
    Query(params): Query<UnitParams>,
) -> Result<Json<Vec<UnitCount>>> {
    let unit = optional_text(params.unidade);

    state
        .run(Report::HeadcountByUnit, move |conn| {
            Box::pin(async move { reports::headcount_by_unit(conn, unit.as_deref()).await })
        })
        .await
        .map(Json)
}

/// `GET /api/policiais_comando_regional?comando_regional=`
pub async fn by_regional_command(
    State(state): State<AppState>,
    Query(params): Query<RegionalCommandParams>,
) -> Result<Json<Vec<RegionalCommandCount>>> {
    let command = optional_text(params.comando_regional);

    state
        .run(Report::HeadcountByRegionalCommand, move |conn| {
            Box::pin(async move {
                reports::headcount_by_regional_command(conn, command.as_deref()).await
            })
        })
        .await
        .map(Json)
}

/// `GET /api/dados_posto_grad`
///
/// Returns `{"feminino": [], "masculino": [], "totais": []}` when nothing matches.
pub async fn rank_by_sex(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<RankBySex>> {
    let filter = RankSexFilter {
        sexes: split_list(params.sexo.as_deref()),
        situations: split_list(params.situacao.as_deref()),
        types: split_list(params.tipo.as_deref()),
    };

    state
        .run(Report::RankBySex, move |conn| {
            Box::pin(async move { reports::rank_by_sex(conn, &filter).await })
        })
        .await
        .map(Json)
}

/// `GET /api/policiais_filtro`
///
/// `unidade` and `comando_regional` take numeric ids; a regional command
/// matches its whole unit subtree. A zero count answers 404.
pub async fn filtered(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<FilteredCount>> {
    let filter = PersonnelFilter {
        sexes: split_list(params.sexo.as_deref()),
        situations: split_list(params.situacao.as_deref()),
        types: split_list(params.tipo.as_deref()),
        ranks: split_list(params.posto_grad.as_deref()),
        units: split_ids(params.unidade.as_deref())
            .map_err(|_| invalid_list("unidade", params.unidade.as_deref()))?,
        regional_commands: split_ids(params.comando_regional.as_deref())
            .map_err(|_| invalid_list("comando_regional", params.comando_regional.as_deref()))?,
    };

    state
        .run(Report::FilteredCount, move |conn| {
            Box::pin(async move { reports::count_filtered(conn, &filter).await })
        })
        .await
        .map(Json)
}

fn invalid_list(name: &str, raw: Option<&str>) -> ApiError {
    ApiError::BadRequest(format!(
        "Parâmetro '{name}' inválido: {}",
        raw.unwrap_or_default()
    ))
}

pub async fn ranks(State(state): State<AppState>) -> Result<Json<Vec<Rank>>> {
    state
        .run(Report::Ranks, |conn| Box::pin(reports::ranks(conn)))
        .await
        .map(Json)
}

pub async fn units(State(state): State<AppState>) -> Result<Json<Vec<Unit>>> {
    state
        .run(Report::Units, |conn| Box::pin(reports::units(conn)))
        .await
        .map(Json)
}

pub async fn regional_commands(State(state): State<AppState>) -> Result<Json<Vec<Unit>>> {
    state
        .run(Report::RegionalCommands, |conn| Box::pin(reports::regional_commands(conn)))
        .await
        .map(Json)
}

/// `GET /api/unidades_por_comando?comando_id=`
pub async fn units_under_command(
    State(state): State<AppState>,
    Query(params): Query<CommandParams>,
) -> Result<Json<Vec<Unit>>> {
    let raw = params
        .comando_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Parâmetro 'comando_id' é obrigatório".to_string()))?;
    let command_id = parse_id("comando_id", raw)?;

    state
        .run(Report::UnitsUnderCommand, move |conn| {
            Box::pin(reports::units_under_command(conn, command_id))
        })
        .await
        .map(Json)
}

/// `GET /api/policiais_filtro_avancado`
///
/// Single-value filters; `comando_regional`, `unidade` and `posto_grad` are
/// numeric codes and `0` means "any".
pub async fn advanced(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<AdvancedCount>> {
    let filter = AdvancedFilter {
        sex: optional_text(params.sexo),
        situation: optional_text(params.situacao),
        kind: optional_text(params.tipo),
        regional_command: optional_id("comando_regional", params.comando_regional.as_deref())?,
        unit: optional_id("unidade", params.unidade.as_deref())?,
        rank: optional_id("posto_grad", params.posto_grad.as_deref())?,
    };

    state
        .run(Report::AdvancedCount, move |conn| {
            Box::pin(async move { reports::count_advanced(conn, &filter).await })
        })
        .await
        .map(Json)
}

/// `GET /api/totais-por-cr`: `{"<command name>": total, ...}`.
pub async fn totals_by_regional_command(
    State(state): State<AppState>,
) -> Result<Json<IndexMap<String, i64>>> {
    state
        .run(Report::TotalsByRegionalCommand, |conn| {
            Box::pin(reports::totals_by_regional_command(conn))
        })
        .await
        .map(Json)
}
