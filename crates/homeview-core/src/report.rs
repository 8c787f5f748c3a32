//! Buy and sell recommendation reports

use crate::error::{HomeviewError, HomeviewResult};
use homeview_filter::{filter_table, FilterExpr, ReportFilter, CONDITION_FIELD, ZIPCODE_FIELD};
use homeview_io::{read_table, DataTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Columns hidden when the buy report is displayed as a table
pub const GEO_COLUMNS: [&str; 2] = ["lat", "long"];

/// Columns the buy report needs for the maps
pub const BUY_MAP_COLUMNS: [&str; 3] = ["lat", "long", "price"];

/// Which report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Buy,
    Sell,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Buy => "buy",
            ReportKind::Sell => "sell",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = HomeviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(ReportKind::Buy),
            "sell" => Ok(ReportKind::Sell),
            other => Err(HomeviewError::UnknownReport(other.to_string())),
        }
    }
}

/// Selectable values offered by the filter sidebar
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub zipcodes: Vec<i64>,
    pub conditions: Vec<i64>,
}

/// The pair of recommendation tables
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationReports {
    pub buy: DataTable,
    pub sell: DataTable,
}

impl RecommendationReports {
    /// Wrap two tables, checking they carry the columns the dashboard uses
    pub fn new(buy: DataTable, sell: DataTable) -> HomeviewResult<Self> {
        require_columns(&buy, ReportKind::Buy, &[ZIPCODE_FIELD, CONDITION_FIELD])?;
        require_columns(&buy, ReportKind::Buy, &BUY_MAP_COLUMNS)?;
        require_columns(&sell, ReportKind::Sell, &[ZIPCODE_FIELD, CONDITION_FIELD])?;
        Ok(Self { buy, sell })
    }

    /// Load both reports from CSV files
    pub fn load(buy_path: &Path, sell_path: &Path) -> HomeviewResult<Self> {
        let buy = read_table(&buy_path.to_string_lossy())?;
        let sell = read_table(&sell_path.to_string_lossy())?;
        Self::new(buy, sell)
    }

    /// Get one report
    pub fn table(&self, kind: ReportKind) -> &DataTable {
        match kind {
            ReportKind::Buy => &self.buy,
            ReportKind::Sell => &self.sell,
        }
    }

    /// Table as shown on the dashboard; the buy report hides its coordinates
    pub fn display_table(&self, kind: ReportKind) -> DataTable {
        match kind {
            ReportKind::Buy => self.buy.without_columns(&GEO_COLUMNS),
            ReportKind::Sell => self.sell.clone(),
        }
    }

    /// Distinct zip codes and conditions of the buy report, sorted
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            zipcodes: self.buy.distinct_i64(ZIPCODE_FIELD).unwrap_or_default(),
            conditions: self.buy.distinct_i64(CONDITION_FIELD).unwrap_or_default(),
        }
    }

    /// Apply the same filter to both reports
    pub fn apply(&self, expr: &FilterExpr) -> HomeviewResult<Self> {
        if *expr == FilterExpr::All {
            return Ok(self.clone());
        }

        let filtered = Self {
            buy: filter_table(&self.buy, expr)?,
            sell: filter_table(&self.sell, expr)?,
        };
        tracing::debug!(
            filter = %expr,
            buy = filtered.buy.num_rows(),
            sell = filtered.sell.num_rows(),
            "Filtered reports"
        );
        Ok(filtered)
    }

    /// Apply a zip code / condition selection to both reports
    pub fn apply_selection(&self, selection: &ReportFilter) -> HomeviewResult<Self> {
        self.apply(&selection.to_expr())
    }
}

fn require_columns(table: &DataTable, kind: ReportKind, columns: &[&str]) -> HomeviewResult<()> {
    match columns.iter().find(|c| table.column(c).is_none()) {
        Some(column) => Err(HomeviewError::MissingReportColumn {
            report: kind.to_string(),
            column: column.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeview_io::{CsvReader, DataReader};

    fn table(text: &str) -> DataTable {
        CsvReader::from_text(text).unwrap().read_table().unwrap()
    }

    fn reports() -> RecommendationReports {
        let buy = table(
            "id,zipcode,condition,price,lat,long,status\n\
             1,98002,3,200000,47.3,-122.2,buy\n\
             2,98001,4,250000,47.4,-122.3,buy\n\
             3,98001,3,300000,47.5,-122.1,buy\n",
        );
        let sell = table(
            "id,zipcode,condition,price,sell_price\n\
             1,98002,3,200000,260000\n\
             3,98001,3,300000,390000\n",
        );
        RecommendationReports::new(buy, sell).unwrap()
    }

    #[test]
    fn test_filter_options_sorted_distinct() {
        let options = reports().filter_options();
        assert_eq!(options.zipcodes, vec![98001, 98002]);
        assert_eq!(options.conditions, vec![3, 4]);
    }

    #[test]
    fn test_display_hides_coordinates() {
        let reports = reports();
        let buy = reports.display_table(ReportKind::Buy);
        assert!(buy.column("lat").is_none());
        assert!(buy.column("long").is_none());
        assert_eq!(buy.num_columns(), reports.buy.num_columns() - 2);
        assert_eq!(reports.display_table(ReportKind::Sell), reports.sell);
    }

    #[test]
    fn test_apply_selection_to_both() {
        let filtered = reports()
            .apply_selection(&ReportFilter::new().with_zipcodes([98001]))
            .unwrap();
        assert_eq!(filtered.buy.num_rows(), 2);
        assert_eq!(filtered.sell.num_rows(), 1);
    }

    #[test]
    fn test_missing_column() {
        let buy = table("zipcode,price,lat,long\n98001,1,47.0,-122.0\n");
        let sell = table("zipcode,condition\n98001,3\n");
        let err = RecommendationReports::new(buy, sell).unwrap_err();
        assert!(matches!(
            err,
            HomeviewError::MissingReportColumn { ref column, .. } if column == "condition"
        ));
    }

    #[test]
    fn test_report_kind_parse() {
        assert_eq!("Buy".parse::<ReportKind>().unwrap(), ReportKind::Buy);
        assert!("rent".parse::<ReportKind>().is_err());
    }
}
