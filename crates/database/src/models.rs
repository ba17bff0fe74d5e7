//! Report records.
//!
//! Field names are English; the serialized keys are the ones the dashboard
//! front end reads.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Equipment and custody
// ---------------------------------------------------------------------------

/// Units in stock for one equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StockQuantity {
    #[serde(rename = "equipamento_nome")]
    pub equipment_name: String,
    #[serde(rename = "quantidade_em_estoque")]
    pub quantity_in_stock: i64,
}

/// Equipment count for one stock status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

/// Stock broken down by status, plus the net number of open custodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    #[serde(rename = "estoque")]
    pub stock: Vec<StatusCount>,
    /// Custody terms minus decustody terms.
    #[serde(rename = "cautelas")]
    pub custodies: i64,
}

/// Custody term count for one status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyBucket {
    pub status: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

/// Custody counts by status code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyBreakdown {
    #[serde(rename = "cautela")]
    pub buckets: Vec<CustodyBucket>,
}

/// An equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EquipmentType {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Equipment in active custody for one requested city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCustodyCount {
    #[serde(rename = "nome_cidade")]
    pub city: String,
    #[serde(rename = "qtd_cautelas")]
    pub custodies: i64,
}

impl CityCustodyCount {
    pub fn zero(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            custodies: 0,
        }
    }
}

/// Delivered equipment in active custody for one requested city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityDeliveryCount {
    #[serde(rename = "nome_cidade")]
    pub city: String,
    #[serde(rename = "qtd_entregas")]
    pub deliveries: i64,
}

impl CityDeliveryCount {
    pub fn zero(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            deliveries: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Personnel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SexCount {
    #[serde(rename = "sexo")]
    pub sex: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TypeCount {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SituationCount {
    #[serde(rename = "situacao")]
    pub situation: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

/// Headcount for one rank/grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RankCount {
    #[serde(rename = "posto_grad")]
    pub rank: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UnitCount {
    #[serde(rename = "unidade")]
    pub unit: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RegionalCommandCount {
    #[serde(rename = "comando_regional")]
    pub command: String,
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

/// Rank/grade headcounts pivoted by sex, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankBySex {
    #[serde(rename = "feminino")]
    pub female: Vec<RankCount>,
    #[serde(rename = "masculino")]
    pub male: Vec<RankCount>,
    #[serde(rename = "totais")]
    pub totals: Vec<RankCount>,
}

/// A rank/grade as offered in filter drop-downs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Rank {
    #[serde(rename = "cod_posto_grad")]
    pub code: i64,
    #[serde(rename = "posto_grad")]
    pub name: String,
    #[serde(rename = "posto_grad_abrev")]
    pub abbreviation: String,
}

/// An organizational unit (OPM). Regional commands use the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Unit {
    #[serde(rename = "cod_opm")]
    pub code: i64,
    #[serde(rename = "opm")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredCount {
    #[serde(rename = "quantidade")]
    pub quantity: i64,
}

/// Result of the advanced filter. `rows` is reserved and always empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedCount {
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    #[serde(rename = "dados")]
    pub rows: Vec<serde_json::Value>,
}

/// Male/female headcount for a matched city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CityHeadcount {
    #[serde(rename = "nome_cidade")]
    pub city: String,
    #[serde(rename = "qtd_sexoM")]
    pub male: i64,
    #[serde(rename = "qtd_sexoF")]
    pub female: i64,
}

impl CityHeadcount {
    pub fn zero(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            male: 0,
            female: 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.male + self.female
    }
}

/// Male/female headcount for one unit of a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UnitSexCount {
    #[serde(rename = "unidade")]
    pub unit: String,
    #[serde(rename = "Masculino")]
    pub male: i64,
    #[serde(rename = "Feminino")]
    pub female: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stock_summary_shape() {
        let json = serde_json::to_value(StockSummary::default()).unwrap();
        assert_eq!(json, serde_json::json!({"estoque": [], "cautelas": 0}));
    }

    #[test]
    fn test_city_headcount_keys() {
        let record = CityHeadcount {
            city: "LAMBARI D'OESTE".to_string(),
            male: 12,
            female: 3,
        };
        assert_eq!(record.total(), 15);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({"nome_cidade": "LAMBARI D'OESTE", "qtd_sexoM": 12, "qtd_sexoF": 3})
        );
    }

    #[test]
    fn test_advanced_count_default() {
        let json = serde_json::to_value(AdvancedCount::default()).unwrap();
        assert_eq!(json, serde_json::json!({"quantidade": 0, "dados": []}));
    }
}
