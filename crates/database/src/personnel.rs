//! Personnel headcount reports (`sgpm` schema).
//!
//! Personnel of type 1 are active officers; reports that say so restrict to
//! them. Units form a tree through `sgpm.opm.subordinacao`, and a unit flagged
//! `grande_comando = 'S'` is a regional command.

use indexmap::IndexMap;
use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};

use crate::filter::{push_eq, push_in, push_subtree, AdvancedFilter, PersonnelFilter, RankSexFilter};
use crate::models::{
    AdvancedCount, FilteredCount, Rank, RankBySex, RankCount, RegionalCommandCount, SexCount,
    SituationCount, TypeCount, Unit, UnitCount,
};
use crate::Result;

/// Active officers by sex.
pub async fn headcount_by_sex(conn: &mut PgConnection) -> Result<Vec<SexCount>> {
    let rows = sqlx::query_as::<_, SexCount>(
        r#"
        SELECT p.sexo AS sex, COUNT(*) AS quantity
        FROM sgpm.policial p
        WHERE p.cod_policial_tipo = 1
        GROUP BY p.sexo
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(rows = rows.len(), "Fetched headcount by sex");
    Ok(rows)
}

/// Personnel by type.
pub async fn headcount_by_type(conn: &mut PgConnection) -> Result<Vec<TypeCount>> {
    let rows = sqlx::query_as::<_, TypeCount>(
        r#"
        SELECT t.policial_tipo AS kind, COUNT(*) AS quantity
        FROM sgpm.policial p
        JOIN sgpm.policial_tipo t ON t.cod_policial_tipo = p.cod_policial_tipo
        GROUP BY t.policial_tipo
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(rows = rows.len(), "Fetched headcount by type");
    Ok(rows)
}

/// Personnel by situation.
pub async fn headcount_by_situation(conn: &mut PgConnection) -> Result<Vec<SituationCount>> {
    let rows = sqlx::query_as::<_, SituationCount>(
        r#"
        SELECT t.situacao AS situation, COUNT(*) AS quantity
        FROM sgpm.policial p
        JOIN sgpm.policial_situacao t ON t.cod_policial_situacao = p.cod_policial_situacao
        GROUP BY t.situacao
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(rows = rows.len(), "Fetched headcount by situation");
    Ok(rows)
}

/// Personnel by rank/grade, optionally restricted to one rank name.
pub async fn headcount_by_rank(
    conn: &mut PgConnection,
    rank: Option<&str>,
) -> Result<Vec<RankCount>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        r#"
        SELECT pg.posto_grad AS rank, COUNT(*) AS quantity
        FROM sgpm.policial p
        JOIN sgpm.posto_grad pg ON pg.cod_posto_grad = p.cod_posto_grad
        WHERE 1=1
        "#,
    );
    push_eq(&mut qb, "pg.posto_grad", rank.map(str::to_string));
    qb.push(" GROUP BY pg.posto_grad");

    let rows = qb.build_query_as::<RankCount>().fetch_all(conn).await?;
    tracing::debug!(?rank, rows = rows.len(), "Fetched headcount by rank");
    Ok(rows)
}

/// Personnel by unit, optionally restricted to one unit name.
pub async fn headcount_by_unit(
    conn: &mut PgConnection,
    unit: Option<&str>,
) -> Result<Vec<UnitCount>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        r#"
        SELECT o.opm AS unit, COUNT(*) AS quantity
        FROM sgpm.policial p
        JOIN sgpm.opm o ON o.cod_opm = p.cod_opm
        WHERE 1=1
        "#,
    );
    push_eq(&mut qb, "o.opm", unit.map(str::to_string));
    qb.push(" GROUP BY o.opm");

    let rows = qb.build_query_as::<UnitCount>().fetch_all(conn).await?;
    tracing::debug!(?unit, rows = rows.len(), "Fetched headcount by unit");
    Ok(rows)
}

/// Personnel of units directly subordinate to a regional command, by command.
pub async fn headcount_by_regional_command(
    conn: &mut PgConnection,
    command: Option<&str>,
) -> Result<Vec<RegionalCommandCount>> {
    let mut qb = QueryBuilder::<Postgres>::new(
        r#"
        SELECT gc.opm AS command, COUNT(*) AS quantity
        FROM sgpm.policial p
        JOIN sgpm.opm o ON o.cod_opm = p.cod_opm
        JOIN sgpm.opm gc ON gc.cod_opm = o.subordinacao
        WHERE gc.grande_comando = 'S'
        "#,
    );
    push_eq(&mut qb, "gc.opm", command.map(str::to_string));
    qb.push(" GROUP BY gc.opm");

    let rows = qb
        .build_query_as::<RegionalCommandCount>()
        .fetch_all(conn)
        .await?;
    tracing::debug!(?command, rows = rows.len(), "Fetched headcount by regional command");
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct RankSexRow {
    pub rank: String,
    pub female: i64,
    pub male: i64,
    pub total: i64,
}

impl RankBySex {
    pub(crate) fn from_rows(rows: Vec<RankSexRow>) -> Self {
        let mut breakdown = RankBySex::default();
        for row in rows {
            breakdown.female.push(RankCount {
                rank: row.rank.clone(),
                quantity: row.female,
            });
            breakdown.male.push(RankCount {
                rank: row.rank.clone(),
                quantity: row.male,
            });
            breakdown.totals.push(RankCount {
                rank: row.rank,
                quantity: row.total,
            });
        }
        breakdown
    }
}

/// Rank/grade headcounts pivoted into female, male and total columns.
pub async fn rank_by_sex(conn: &mut PgConnection, filter: &RankSexFilter) -> Result<RankBySex> {
    let rows = rank_by_sex_query(filter)
        .build_query_as::<RankSexRow>()
        .fetch_all(conn)
        .await?;

    tracing::debug!(ranks = rows.len(), "Fetched rank breakdown by sex");
    Ok(RankBySex::from_rows(rows))
}

pub(crate) fn rank_by_sex_query(filter: &RankSexFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        WITH counts AS (
            SELECT pg.posto_grad, p.sexo, COUNT(*) AS quantity, pg.ordem
            FROM sgpm.policial p
            JOIN sgpm.posto_grad pg ON pg.cod_posto_grad = p.cod_posto_grad
            JOIN sgpm.policial_situacao ps ON ps.cod_policial_situacao = p.cod_policial_situacao
            JOIN sgpm.policial_tipo pt ON pt.cod_policial_tipo = p.cod_policial_tipo
            WHERE 1=1
        "#,
    );
    push_in(&mut qb, "p.sexo", &filter.sexes);
    push_in(&mut qb, "ps.situacao", &filter.situations);
    push_in(&mut qb, "pt.policial_tipo", &filter.types);
    qb.push(
        r#"
            GROUP BY pg.posto_grad, p.sexo, pg.ordem
        )
        SELECT
            posto_grad AS rank,
            SUM(CASE WHEN sexo = 'F' THEN quantity ELSE 0 END)::bigint AS female,
            SUM(CASE WHEN sexo = 'M' THEN quantity ELSE 0 END)::bigint AS male,
            SUM(quantity)::bigint AS total
        FROM counts
        GROUP BY posto_grad, ordem
        ORDER BY ordem
        "#,
    );
    qb
}

/// Count personnel matching any combination of multi-value filters.
pub async fn count_filtered(conn: &mut PgConnection, filter: &PersonnelFilter) -> Result<FilteredCount> {
    let quantity: i64 = count_filtered_query(filter)
        .build_query_scalar()
        .fetch_one(conn)
        .await?;

    tracing::debug!(quantity, ?filter, "Counted filtered personnel");
    Ok(FilteredCount { quantity })
}

pub(crate) fn count_filtered_query(filter: &PersonnelFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT COUNT(*)
        FROM sgpm.policial p
        JOIN sgpm.policial_tipo t ON t.cod_policial_tipo = p.cod_policial_tipo
        JOIN sgpm.policial_situacao s ON s.cod_policial_situacao = p.cod_policial_situacao
        JOIN sgpm.posto_grad pg ON pg.cod_posto_grad = p.cod_posto_grad
        JOIN sgpm.opm op ON op.cod_opm = p.cod_opm
        WHERE 1=1
        "#,
    );
    push_in(&mut qb, "p.sexo", &filter.sexes);
    push_in(&mut qb, "s.situacao", &filter.situations);
    push_in(&mut qb, "t.policial_tipo", &filter.types);
    push_in(&mut qb, "pg.posto_grad", &filter.ranks);
    push_in(&mut qb, "op.cod_opm", &filter.units);
    push_subtree(&mut qb, "op.cod_opm", &filter.regional_commands);
    qb
}

/// Count personnel by lotação unit with single-value filters.
///
/// A regional command restricts the count to its whole subtree, the command
/// itself included.
pub async fn count_advanced(conn: &mut PgConnection, filter: &AdvancedFilter) -> Result<AdvancedCount> {
    let filter = filter.clone().normalized();
    let quantity: i64 = count_advanced_query(&filter)
        .build_query_scalar()
        .fetch_one(conn)
        .await?;

    tracing::debug!(quantity, ?filter, "Counted personnel with advanced filter");
    Ok(AdvancedCount {
        quantity,
        rows: Vec::new(),
    })
}

pub(crate) fn count_advanced_query(filter: &AdvancedFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("");
    if let Some(command) = filter.regional_command {
        qb.push(
            r#"
            WITH RECURSIVE command_units AS (
                SELECT cod_opm, subordinacao
                FROM sgpm.opm
                WHERE cod_opm = "#,
        )
        .push_bind(command)
        .push(
            r#"
                UNION ALL
                SELECT op.cod_opm, op.subordinacao
                FROM sgpm.opm op
                JOIN command_units u ON op.subordinacao = u.cod_opm
            )"#,
        );
    }

    qb.push(
        r#"
        SELECT COUNT(*)
        FROM sgpm.policial p
        JOIN sgpm.opm o ON p.cod_opm_lotacao = o.cod_opm
        LEFT JOIN sgpm.policial_situacao ps ON p.cod_policial_situacao = ps.cod_policial_situacao
        LEFT JOIN sgpm.policial_tipo pt ON p.cod_policial_tipo = pt.cod_policial_tipo
        LEFT JOIN sgpm.posto_grad pg ON p.cod_posto_grad = pg.cod_posto_grad
        WHERE 1=1
        "#,
    );
    push_eq(&mut qb, "p.sexo", filter.sex.clone());
    push_eq(&mut qb, "ps.situacao", filter.situation.clone());
    push_eq(&mut qb, "pt.policial_tipo", filter.kind.clone());
    push_eq(&mut qb, "p.cod_posto_grad", filter.rank);
    push_eq(&mut qb, "p.cod_opm_lotacao", filter.unit);
    if filter.regional_command.is_some() {
        qb.push(" AND p.cod_opm_lotacao IN (SELECT cod_opm FROM command_units)");
    }
    qb
}

/// Ranks/grades for filter drop-downs.
pub async fn ranks(conn: &mut PgConnection) -> Result<Vec<Rank>> {
    let rows = sqlx::query_as::<_, Rank>(
        r#"
        SELECT cod_posto_grad::bigint AS code, posto_grad AS name, posto_grad_abrev AS abbreviation
        FROM sgpm.posto_grad
        WHERE cod_posto_grad > 0
        ORDER BY cod_posto_grad
        LIMIT 50
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(ranks = rows.len(), "Fetched ranks");
    Ok(rows)
}

/// Units for filter drop-downs.
pub async fn units(conn: &mut PgConnection) -> Result<Vec<Unit>> {
    let rows = sqlx::query_as::<_, Unit>(
        r#"
        SELECT cod_opm::bigint AS code, opm AS name
        FROM sgpm.opm
        WHERE cod_opm > 0
        ORDER BY opm
        LIMIT 200
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(units = rows.len(), "Fetched units");
    Ok(rows)
}

/// Units flagged as regional commands.
pub async fn regional_commands(conn: &mut PgConnection) -> Result<Vec<Unit>> {
    let rows = sqlx::query_as::<_, Unit>(
        r#"
        SELECT op.cod_opm::bigint AS code, op.opm AS name
        FROM sgpm.opm op
        WHERE op.grande_comando = 'S'
        ORDER BY op.cod_opm
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(commands = rows.len(), "Fetched regional commands");
    Ok(rows)
}

/// The command unit and every unit whose parent chain reaches it.
pub async fn units_under_command(conn: &mut PgConnection, command_id: i64) -> Result<Vec<Unit>> {
    let rows = sqlx::query_as::<_, Unit>(
        r#"
        WITH RECURSIVE subtree AS (
            SELECT cod_opm, opm, subordinacao
            FROM sgpm.opm
            WHERE cod_opm = $1

            UNION ALL

            SELECT op.cod_opm, op.opm, op.subordinacao
            FROM sgpm.opm op
            JOIN subtree ON op.subordinacao = subtree.cod_opm
        )
        SELECT DISTINCT subtree.cod_opm::bigint AS code, subtree.opm AS name
        FROM subtree
        ORDER BY name
        "#,
    )
    .bind(command_id)
    .fetch_all(conn)
    .await?;

    tracing::debug!(command_id, units = rows.len(), "Fetched units under command");
    Ok(rows)
}

/// Personnel assigned directly to each regional command node, keyed by name.
pub async fn totals_by_regional_command(conn: &mut PgConnection) -> Result<IndexMap<String, i64>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT op.opm AS command, COUNT(*) AS total
        FROM sgpm.policial p
        INNER JOIN sgpm.opm op ON op.cod_opm = p.cod_opm_lotacao
        WHERE op.grande_comando = 'S'
        GROUP BY op.opm
        ORDER BY op.opm
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(commands = rows.len(), "Fetched totals by regional command");
    Ok(rows.into_iter().collect())
}
