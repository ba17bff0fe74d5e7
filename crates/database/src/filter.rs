//! Optional filter composition for personnel reports.
//!
//! Every present filter appends one `AND` predicate with bound parameters; an
//! absent filter adds nothing. Values never reach the SQL text.

use std::num::ParseIntError;

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Split a comma-separated parameter into trimmed, non-empty values.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Split a comma-separated parameter of numeric ids.
pub fn split_ids(raw: Option<&str>) -> Result<Vec<i64>, ParseIntError> {
    split_list(raw).iter().map(|item| item.parse()).collect()
}

/// Multi-value filters for the headcount filter report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelFilter {
    pub sexes: Vec<String>,
    pub situations: Vec<String>,
    pub types: Vec<String>,
    /// Rank/grade names.
    pub ranks: Vec<String>,
    /// Unit ids.
    pub units: Vec<i64>,
    /// Regional command ids; matches the whole subtree of each.
    pub regional_commands: Vec<i64>,
}

/// Multi-value filters for the rank-by-sex breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankSexFilter {
    pub sexes: Vec<String>,
    pub situations: Vec<String>,
    pub types: Vec<String>,
}

/// Single-value filters for the advanced filter report.
///
/// Empty strings and zero ids are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvancedFilter {
    pub sex: Option<String>,
    pub situation: Option<String>,
    pub kind: Option<String>,
    pub regional_command: Option<i64>,
    pub unit: Option<i64>,
    /// Rank/grade code.
    pub rank: Option<i64>,
}

impl AdvancedFilter {
    /// Drop empty strings and zero ids.
    pub fn normalized(self) -> Self {
        let text = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let id = |value: Option<i64>| value.filter(|v| *v != 0);
        Self {
            sex: text(self.sex),
            situation: text(self.situation),
            kind: text(self.kind),
            regional_command: id(self.regional_command),
            unit: id(self.unit),
            rank: id(self.rank),
        }
    }
}

/// Append `AND <column> = $n` when `value` is present.
pub(crate) fn push_eq<'args, T>(
    qb: &mut QueryBuilder<'args, Postgres>,
    column: &str,
    value: Option<T>,
) where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

/// Append `AND <column> IN ($n, ...)` when `values` is non-empty.
pub(crate) fn push_in<'args, T>(
    qb: &mut QueryBuilder<'args, Postgres>,
    column: &str,
    values: &[T],
) where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send + Clone,
{
    if values.is_empty() {
        return;
    }

    qb.push(" AND ").push(column).push(" IN (");
    let mut list = qb.separated(", ");
    for value in values {
        list.push_bind(value.clone());
    }
    list.push_unseparated(")");
}

/// Append a predicate restricting `column` to the units under `seeds`.
///
/// The subtree is the recursive closure over `sgpm.opm.subordinacao`, seeds
/// included.
pub(crate) fn push_subtree(qb: &mut QueryBuilder<'_, Postgres>, column: &str, seeds: &[i64]) {
    if seeds.is_empty() {
        return;
    }

    qb.push(" AND ").push(column).push(
        " IN (WITH RECURSIVE subtree AS (\
         SELECT cod_opm, subordinacao FROM sgpm.opm WHERE cod_opm IN (",
    );
    let mut list = qb.separated(", ");
    for seed in seeds {
        list.push_bind(*seed);
    }
    list.push_unseparated(
        ") UNION \
         SELECT o.cod_opm, o.subordinacao FROM sgpm.opm o \
         JOIN subtree ON o.subordinacao = subtree.cod_opm\
         ) SELECT cod_opm FROM subtree)",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("M, F")), vec!["M", "F"]);
        assert_eq!(split_list(Some(" ATIVO ,, ")), vec!["ATIVO"]);
        assert!(split_list(Some("")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_split_ids() {
        assert_eq!(split_ids(Some("5, 12")).unwrap(), vec![5, 12]);
        assert!(split_ids(None).unwrap().is_empty());
        assert!(split_ids(Some("5,CR")).is_err());
    }

    #[test]
    fn test_advanced_filter_normalized() {
        let filter = AdvancedFilter {
            sex: Some("F".to_string()),
            situation: Some(" ".to_string()),
            regional_command: Some(5),
            unit: Some(0),
            ..Default::default()
        }
        .normalized();
        assert_eq!(filter.sex.as_deref(), Some("F"));
        assert_eq!(filter.situation, None);
        assert_eq!(filter.regional_command, Some(5));
        assert_eq!(filter.unit, None);
    }

    #[test]
    fn test_push_eq_absent() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        push_eq::<String>(&mut qb, "p.sexo", None);
        assert_eq!(qb.sql(), "SELECT 1 WHERE 1=1");
    }

    #[test]
    fn test_push_in_binds_each_value() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        let values = vec!["M".to_string(), "F".to_string()];
        push_in(&mut qb, "p.sexo", &values);
        push_eq(&mut qb, "p.cod_posto_grad", Some(3_i64));
        assert_eq!(
            qb.sql(),
            "SELECT 1 WHERE 1=1 AND p.sexo IN ($1, $2) AND p.cod_posto_grad = $3"
        );
    }

    #[test]
    fn test_values_never_inlined() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        let values = vec!["X'); DROP TABLE sgpm.policial; --".to_string()];
        push_in(&mut qb, "s.situacao", &values);
        assert!(!qb.sql().contains("DROP"));
    }

    #[test]
    fn test_push_subtree() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 WHERE 1=1");
        push_subtree(&mut qb, "op.cod_opm", &[5, 7]);
        let sql = qb.sql();
        assert!(sql.contains("WITH RECURSIVE subtree"));
        assert!(sql.contains("WHERE cod_opm IN ($1, $2)"));
        assert!(sql.ends_with("SELECT cod_opm FROM subtree)"));
    }
}
