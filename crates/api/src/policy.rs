//! What each report does when it has nothing to return.
//!
//! Endpoints disagree on this: some answer 404, a couple answer 500 and the
//! rest return their empty shape. The table lives in [`Report::empty_policy`].

use database::models::{
    AdvancedCount, CustodyBreakdown, FilteredCount, RankBySex, StockSummary,
};
use indexmap::IndexMap;

use crate::error::{ApiError, Result};

/// Report payloads that can be checked for emptiness.
pub trait ReportData {
    fn is_empty(&self) -> bool;
}

impl<T> ReportData for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl ReportData for IndexMap<String, i64> {
    fn is_empty(&self) -> bool {
        IndexMap::is_empty(self)
    }
}

impl ReportData for StockSummary {
    fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }
}

impl ReportData for CustodyBreakdown {
    fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl ReportData for RankBySex {
    fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

impl ReportData for FilteredCount {
    fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

impl ReportData for AdvancedCount {
    fn is_empty(&self) -> bool {
        self.quantity == 0
    }
}

/// Response for a report without data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    NotFound(&'static str),
    Internal(&'static str),
    /// Return the empty shape as is.
    Allow,
}

/// Every report the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Stock,
    StockSummary,
    StockByType,
    CustodyByType,
    CustodyOverall,
    EquipmentTypes,
    CustodyByCity,
    DeliveriesByCity,
    HeadcountBySex,
    HeadcountByType,
    HeadcountBySituation,
    HeadcountByRank,
    HeadcountByUnit,
    HeadcountByRegionalCommand,
    RankBySex,
    FilteredCount,
    Ranks,
    Units,
    RegionalCommands,
    UnitsUnderCommand,
    AdvancedCount,
    TotalsByRegionalCommand,
    HeadcountByCity,
    UnitsInCity,
}

impl Report {
    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Report::Stock => "stock",
            Report::StockSummary => "stock_summary",
            Report::StockByType => "stock_by_type",
            Report::CustodyByType => "custody_by_type",
            Report::CustodyOverall => "custody_overall",
            Report::EquipmentTypes => "equipment_types",
            Report::CustodyByCity => "custody_by_city",
            Report::DeliveriesByCity => "deliveries_by_city",
            Report::HeadcountBySex => "headcount_by_sex",
            Report::HeadcountByType => "headcount_by_type",
            Report::HeadcountBySituation => "headcount_by_situation",
            Report::HeadcountByRank => "headcount_by_rank",
            Report::HeadcountByUnit => "headcount_by_unit",
            Report::HeadcountByRegionalCommand => "headcount_by_regional_command",
            Report::RankBySex => "rank_by_sex",
            Report::FilteredCount => "filtered_count",
            Report::Ranks => "ranks",
            Report::Units => "units",
            Report::RegionalCommands => "regional_commands",
            Report::UnitsUnderCommand => "units_under_command",
            Report::AdvancedCount => "advanced_count",
            Report::TotalsByRegionalCommand => "totals_by_regional_command",
            Report::HeadcountByCity => "headcount_by_city",
            Report::UnitsInCity => "units_in_city",
        }
    }

    /// Prefix of the 500 detail when a query fails.
    pub fn context(self) -> &'static str {
        match self {
            Report::Stock => "Erro ao buscar os dados do estoque",
            Report::StockSummary | Report::StockByType => "Erro ao buscar dados do estoque",
            Report::CustodyByType | Report::CustodyOverall => "Erro ao buscar dados de cautela",
            Report::EquipmentTypes => "Erro ao buscar os tipos de equipamentos",
            Report::CustodyByCity => "Erro ao buscar dados de cautelas",
            Report::DeliveriesByCity => "Erro ao buscar dados de entregas",
            Report::HeadcountBySex => "Erro ao buscar dados por sexo",
            Report::HeadcountByType => "Erro ao buscar dados por tipo",
            Report::HeadcountBySituation => "Erro ao buscar dados por situação",
            Report::HeadcountByRank | Report::RankBySex => "Erro ao buscar dados por posto/graduação",
            Report::HeadcountByUnit | Report::UnitsInCity => "Erro ao buscar dados por unidade",
            Report::HeadcountByRegionalCommand => "Erro ao buscar dados por comando regional",
            Report::FilteredCount | Report::AdvancedCount => "Erro ao filtrar policiais",
            Report::Ranks => "Erro ao buscar postos/graduação",
            Report::Units => "Erro ao buscar unidades",
            Report::RegionalCommands => "Erro ao buscar comandos regionais",
            Report::UnitsUnderCommand => "Erro ao buscar unidades por comando",
            Report::TotalsByRegionalCommand => "Erro ao buscar totais por CR",
            Report::HeadcountByCity => "Erro ao buscar dados por cidades",
        }
    }

    pub fn empty_policy(self) -> EmptyPolicy {
        match self {
            Report::Stock => EmptyPolicy::Internal("Erro ao buscar os dados do estoque"),
            Report::EquipmentTypes => EmptyPolicy::Internal("Erro ao buscar os tipos de equipamentos"),
            Report::StockSummary => EmptyPolicy::NotFound("Nenhum dado encontrado no estoque"),
            Report::StockByType => {
                EmptyPolicy::NotFound("Nenhum dado encontrado para o tipo de equipamento especificado")
            }
            Report::CustodyByType | Report::CustodyOverall => {
                EmptyPolicy::NotFound("Nenhum dado de cautela encontrado")
            }
            Report::HeadcountBySex
            | Report::HeadcountByType
            | Report::HeadcountBySituation
            | Report::HeadcountByRank
            | Report::HeadcountByUnit
            | Report::HeadcountByRegionalCommand
            | Report::FilteredCount
            | Report::TotalsByRegionalCommand => EmptyPolicy::NotFound("Nenhum dado encontrado"),
            Report::Ranks => EmptyPolicy::NotFound("Nenhum posto/graduação encontrado"),
            Report::Units => EmptyPolicy::NotFound("Nenhuma unidade encontrada"),
            Report::RegionalCommands => EmptyPolicy::NotFound("Nenhum comando regional encontrado"),
            Report::CustodyByCity
            | Report::DeliveriesByCity
            | Report::RankBySex
            | Report::UnitsUnderCommand
            | Report::AdvancedCount
            | Report::HeadcountByCity
            | Report::UnitsInCity => EmptyPolicy::Allow,
        }
    }

    /// Apply the empty policy to a report result.
    pub fn finish<T: ReportData>(self, data: T) -> Result<T> {
        if !data.is_empty() {
            return Ok(data);
        }

        match self.empty_policy() {
            EmptyPolicy::NotFound(detail) => Err(ApiError::NotFound(detail.to_string())),
            EmptyPolicy::Internal(detail) => Err(ApiError::Internal(detail.to_string())),
            EmptyPolicy::Allow => Ok(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use database::models::StockQuantity;

    use super::*;

    #[test]
    fn test_empty_stock_is_internal_error() {
        let err = Report::Stock.finish(Vec::<StockQuantity>::new()).unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "Erro ao buscar os dados do estoque");
    }

    #[test]
    fn test_empty_summary_is_not_found() {
        let err = Report::StockByType.finish(StockSummary::default()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_zero_filtered_count_is_not_found() {
        assert!(Report::FilteredCount.finish(FilteredCount::default()).is_err());
        let found = Report::FilteredCount
            .finish(FilteredCount { quantity: 3 })
            .unwrap();
        assert_eq!(found.quantity, 3);
    }

    #[test]
    fn test_allowed_empty_shapes() {
        assert_eq!(
            Report::AdvancedCount.finish(AdvancedCount::default()).unwrap(),
            AdvancedCount::default()
        );
        assert_eq!(
            Report::RankBySex.finish(RankBySex::default()).unwrap(),
            RankBySex::default()
        );
        assert!(Report::UnitsUnderCommand.finish(Vec::<u8>::new()).unwrap().is_empty());
    }

    #[test]
    fn test_not_found_reports() {
        for report in [
            Report::StockSummary,
            Report::CustodyByType,
            Report::CustodyOverall,
            Report::HeadcountBySex,
            Report::Ranks,
            Report::Units,
            Report::RegionalCommands,
            Report::TotalsByRegionalCommand,
        ] {
            assert!(
                matches!(report.empty_policy(), EmptyPolicy::NotFound(_)),
                "{} should answer 404",
                report.name()
            );
        }
    }
}
