//! Equipment stock and custody reports (`coneq` schema).

use std::fmt;
use std::str::FromStr;

use sqlx::{FromRow, PgConnection, Postgres, QueryBuilder};

use crate::filter::push_eq;
use crate::models::{
    CustodyBreakdown, CustodyBucket, EquipmentType, StatusCount, StockQuantity, StockSummary,
};
use crate::Result;

/// Custody term status codes reported by the custody breakdown.
pub const CUSTODY_STATUS_CODES: [i32; 4] = [6, 7, 8, 9];

/// Custody states in which equipment is still out: awaiting signature (6) and signed (7).
pub const ACTIVE_CUSTODY_STATUSES: [i32; 2] = [6, 7];

/// Status filter for the custody breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustodyStatus {
    /// Every reported code (`todos`).
    #[default]
    All,
    /// A single status code.
    Code(i32),
}

impl FromStr for CustodyStatus {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "todos" => Ok(CustodyStatus::All),
            code => code.parse().map(CustodyStatus::Code),
        }
    }
}

impl fmt::Display for CustodyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustodyStatus::All => write!(f, "todos"),
            CustodyStatus::Code(code) => write!(f, "{code}"),
        }
    }
}

/// One grouped status row plus the global custody balance repeated on every row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct StockStatusRow {
    pub status: String,
    pub quantity: i64,
    pub open_custodies: i64,
}

impl StockSummary {
    /// Build the summary from grouped rows; the balance is read from the first row.
    pub(crate) fn from_rows(rows: Vec<StockStatusRow>) -> Self {
        let custodies = rows.first().map(|row| row.open_custodies).unwrap_or(0);
        let stock = rows
            .into_iter()
            .map(|row| StatusCount {
                status: row.status,
                quantity: row.quantity,
            })
            .collect();
        Self { stock, custodies }
    }
}

impl CustodyBreakdown {
    /// Four buckets, one per reported code, zero-filled.
    pub(crate) fn from_counts(counts: [i64; 4]) -> Self {
        Self {
            buckets: CUSTODY_STATUS_CODES
                .iter()
                .zip(counts)
                .map(|(code, quantity)| CustodyBucket {
                    status: code.to_string(),
                    quantity,
                })
                .collect(),
        }
    }
}

/// Units in stock per equipment type, ordered by type name.
pub async fn stock_quantities(conn: &mut PgConnection) -> Result<Vec<StockQuantity>> {
    let rows = sqlx::query_as::<_, StockQuantity>(
        r#"
        SELECT te.nome AS equipment_name, COUNT(e.id) AS quantity_in_stock
        FROM coneq.equipamento e
        JOIN coneq.tipo_equipamento te ON e.tipo_equipamento_id = te.id
        WHERE e.status ILIKE 'em estoque'
        GROUP BY te.nome
        ORDER BY te.nome
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(rows = rows.len(), "Fetched stock quantities");
    Ok(rows)
}

/// Stock by status across every equipment type.
pub async fn stock_summary(conn: &mut PgConnection) -> Result<StockSummary> {
    fetch_stock_summary(conn, None).await
}

/// Stock by status for one equipment type.
///
/// A type with no equipment yields `{"estoque": [], "cautelas": 0}`.
pub async fn stock_summary_by_type(conn: &mut PgConnection, type_id: i64) -> Result<StockSummary> {
    fetch_stock_summary(conn, Some(type_id)).await
}

async fn fetch_stock_summary(conn: &mut PgConnection, type_id: Option<i64>) -> Result<StockSummary> {
    let rows = stock_summary_query(type_id)
        .build_query_as::<StockStatusRow>()
        .fetch_all(conn)
        .await?;

    tracing::debug!(rows = rows.len(), ?type_id, "Fetched stock summary");
    Ok(StockSummary::from_rows(rows))
}

pub(crate) fn stock_summary_query(type_id: Option<i64>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            e.status AS status,
            COUNT(e.id) AS quantity,
            (SELECT COUNT(tc.cod_cautela) FROM coneq.termo_cautela tc)
              - (SELECT COUNT(td.cod_descautela) FROM coneq.termo_descautela td) AS open_custodies
        FROM coneq.equipamento e
        WHERE e.status IN ('EM ESTOQUE', 'SEPARADO PARA ENTREGA', 'ENTREGUE')
        "#,
    );
    push_eq(&mut qb, "e.tipo_equipamento_id", type_id);
    qb.push(" GROUP BY e.status");
    qb
}

/// Custody term counts by status for an equipment type.
///
/// `type_id == 0` covers every type. With [`CustodyStatus::All`] the four
/// buckets (6, 7, 8, 9) are always present, zero-filled when nothing matches.
pub async fn custody_by_type(
    conn: &mut PgConnection,
    type_id: i64,
    status: CustodyStatus,
) -> Result<CustodyBreakdown> {
    let breakdown = match status {
        CustodyStatus::All => {
            let counts: (i64, i64, i64, i64) = custody_all_query(type_id)
                .build_query_as()
                .fetch_one(conn)
                .await?;
            CustodyBreakdown::from_counts([counts.0, counts.1, counts.2, counts.3])
        }
        CustodyStatus::Code(code) => {
            let quantity: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM coneq.tipo_equipamento te
                INNER JOIN coneq.equipamento e ON e.tipo_equipamento_id = te.id
                INNER JOIN coneq.termo_cautela tc ON tc.cod_cautela = e.termo_cautela_cod_cautela
                WHERE te.id = $1
                  AND tc.status_id = $2
                "#,
            )
            .bind(type_id)
            .bind(code)
            .fetch_one(conn)
            .await?;

            CustodyBreakdown {
                buckets: vec![CustodyBucket {
                    status: code.to_string(),
                    quantity,
                }],
            }
        }
    };

    tracing::debug!(type_id, %status, "Fetched custody breakdown");
    Ok(breakdown)
}

pub(crate) fn custody_all_query(type_id: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            COUNT(CASE WHEN tc.status_id = 6 THEN 1 END) AS status_6,
            COUNT(CASE WHEN tc.status_id = 7 THEN 1 END) AS status_7,
            COUNT(CASE WHEN tc.status_id = 8 THEN 1 END) AS status_8,
            COUNT(CASE WHEN tc.status_id = 9 THEN 1 END) AS status_9
        FROM coneq.tipo_equipamento te
        INNER JOIN coneq.equipamento e ON e.tipo_equipamento_id = te.id
        INNER JOIN coneq.termo_cautela tc ON tc.cod_cautela = e.termo_cautela_cod_cautela
        WHERE tc.status_id IN (6, 7, 8, 9)
        "#,
    );
    push_eq(&mut qb, "te.id", (type_id != 0).then_some(type_id));
    qb
}

/// All equipment types.
pub async fn equipment_types(conn: &mut PgConnection) -> Result<Vec<EquipmentType>> {
    let rows = sqlx::query_as::<_, EquipmentType>(
        r#"
        SELECT id::bigint AS id, nome AS name
        FROM coneq.tipo_equipamento
        ORDER BY id
        "#,
    )
    .fetch_all(conn)
    .await?;

    tracing::debug!(types = rows.len(), "Fetched equipment types");
    Ok(rows)
}
