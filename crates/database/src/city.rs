//! City-scoped reports.
//!
//! Equipment counts place a custody receiver in a city through the general
//! registry (`geral`); headcounts resolve loosely-typed names against
//! `sgpm.cidade` with the candidates produced by [`CityNormalizer`].

use std::collections::HashMap;

use city_names::CityNormalizer;
use sqlx::{PgConnection, Postgres, QueryBuilder};

use crate::equipment::ACTIVE_CUSTODY_STATUSES;
use crate::filter::push_in;
use crate::models::{CityCustodyCount, CityDeliveryCount, CityHeadcount, UnitSexCount};
use crate::Result;

/// Equipment in active custody per requested city.
///
/// One record per requested name, in request order; cities without matches
/// get a zero count.
pub async fn custody_by_city(
    conn: &mut PgConnection,
    cities: &[String],
) -> Result<Vec<CityCustodyCount>> {
    let counts = equipment_counts(conn, cities, false).await?;

    Ok(cities
        .iter()
        .map(|city| CityCustodyCount {
            city: city.clone(),
            custodies: counts.get(&city.to_uppercase()).copied().unwrap_or(0),
        })
        .collect())
}

/// Delivered equipment in active custody per requested city.
pub async fn deliveries_by_city(
    conn: &mut PgConnection,
    cities: &[String],
) -> Result<Vec<CityDeliveryCount>> {
    let counts = equipment_counts(conn, cities, true).await?;

    Ok(cities
        .iter()
        .map(|city| CityDeliveryCount {
            city: city.clone(),
            deliveries: counts.get(&city.to_uppercase()).copied().unwrap_or(0),
        })
        .collect())
}

async fn equipment_counts(
    conn: &mut PgConnection,
    cities: &[String],
    delivered_only: bool,
) -> Result<HashMap<String, i64>> {
    if cities.is_empty() {
        return Ok(HashMap::new());
    }

    let keys: Vec<String> = cities.iter().map(|city| city.to_uppercase()).collect();
    let rows = equipment_counts_query(&keys, delivered_only)
        .build_query_as::<(String, i64)>()
        .fetch_all(conn)
        .await?;

    tracing::debug!(
        requested = keys.len(),
        matched = rows.len(),
        delivered_only,
        "Fetched equipment counts by city"
    );
    Ok(rows.into_iter().collect())
}

pub(crate) fn equipment_counts_query(
    upper_cities: &[String],
    delivered_only: bool,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT UPPER(c.cidade) AS city, COUNT(DISTINCT e.id) AS total
        FROM coneq.equipamento e
        JOIN coneq.termo_cautela tc ON tc.cod_cautela = e.termo_cautela_cod_cautela
        JOIN geral.tb_policial p ON p.cod_policial = tc.recebedor
        JOIN geral.tb_upm up ON up.cod_upm = p.cod_upm
        JOIN geral.tb_cidade c ON c.cod_cidade = up.cod_cidade
        WHERE 1=1
        "#,
    );
    push_in(&mut qb, "UPPER(c.cidade)", upper_cities);
    if delivered_only {
        qb.push(" AND e.status = 'ENTREGUE'");
    }
    push_in(&mut qb, "tc.status_id", &ACTIVE_CUSTODY_STATUSES);
    qb.push(" GROUP BY UPPER(c.cidade)");
    qb
}

/// Male/female headcount of active officers for a loosely-typed city name.
///
/// Every candidate from `normalizer` is tried with `ILIKE`; among all rows
/// collected, the city with the largest total wins (ties go to the greatest
/// name). Candidates whose query fails are skipped. Without any match the
/// result is [`unmatched`] for `name`.
pub async fn headcount_for_city(
    conn: &mut PgConnection,
    normalizer: &CityNormalizer,
    name: &str,
) -> CityHeadcount {
    let mut candidates = Vec::new();

    for pattern in normalizer.search_patterns(name) {
        let result = sqlx::query_as::<_, CityHeadcount>(
            r#"
            SELECT
                c.nome_cidade AS city,
                COALESCE(SUM(CASE WHEN p.sexo = 'M' THEN 1 ELSE 0 END), 0)::bigint AS male,
                COALESCE(SUM(CASE WHEN p.sexo = 'F' THEN 1 ELSE 0 END), 0)::bigint AS female
            FROM sgpm.cidade c
            LEFT JOIN sgpm.opm o ON c.cod_cidade = o.cod_cidade
            LEFT JOIN sgpm.policial p ON o.cod_opm = p.cod_opm_destino AND p.cod_policial_tipo = 1
            WHERE UPPER(c.nome_cidade) ILIKE $1
            GROUP BY c.nome_cidade
            "#,
        )
        .bind(&pattern)
        .fetch_all(&mut *conn)
        .await;

        match result {
            Ok(rows) => {
                tracing::debug!(city = %name, %pattern, matches = rows.len(), "Tried city pattern");
                candidates.extend(rows);
            }
            Err(err) => {
                tracing::warn!(city = %name, %pattern, error = %err, "City pattern query failed");
            }
        }
    }

    best_match(candidates).unwrap_or_else(|| {
        tracing::info!(city = %name, "No city matched any pattern, returning zero counts");
        unmatched(name)
    })
}

/// Zero-count record for a name that resolved to no city, upper-cased and trimmed.
pub fn unmatched(name: &str) -> CityHeadcount {
    CityHeadcount::zero(name.trim().to_uppercase())
}

/// Pick the record with the largest total, ties broken by the greatest name.
pub fn best_match(candidates: Vec<CityHeadcount>) -> Option<CityHeadcount> {
    candidates.into_iter().max_by(|a, b| {
        a.total()
            .cmp(&b.total())
            .then_with(|| a.city.cmp(&b.city))
    })
}

/// Male/female headcount of active officers for every unit of a city.
///
/// The city name must match exactly, ignoring case. Units without personnel
/// are listed with zero counts.
pub async fn units_in_city(conn: &mut PgConnection, name: &str) -> Result<Vec<UnitSexCount>> {
    let rows = sqlx::query_as::<_, UnitSexCount>(
        r#"
        SELECT
            op.opm AS unit,
            COALESCE(SUM(CASE WHEN p.sexo = 'M' THEN 1 ELSE 0 END), 0)::bigint AS male,
            COALESCE(SUM(CASE WHEN p.sexo = 'F' THEN 1 ELSE 0 END), 0)::bigint AS female
        FROM sgpm.opm op
        INNER JOIN sgpm.cidade c ON c.cod_cidade = op.cod_cidade
        LEFT JOIN sgpm.policial p ON op.cod_opm = p.cod_opm_lotacao AND p.cod_policial_tipo = 1
        WHERE UPPER(c.nome_cidade) = $1
        GROUP BY op.opm, c.nome_cidade
        ORDER BY op.opm
        "#,
    )
    .bind(name.trim().to_uppercase())
    .fetch_all(conn)
    .await?;

    tracing::debug!(city = %name, units = rows.len(), "Fetched units in city");
    Ok(rows)
}
