//! Loaded dashboard data and per-filter views
//!
//! [`DashboardData`] is built once: it reads the listings, runs the
//! feature deriver, evaluates the hypotheses, and loads the reports and
//! zip code boundaries. A [`DashboardView`] is then built for every
//! filter from that immutable data.

use crate::config::DashboardConfig;
use crate::error::HomeviewResult;
use crate::hypothesis::{Hypothesis, HypothesisEngine};
use crate::map::{ChoroplethMap, DensityMap};
use crate::report::{FilterOptions, RecommendationReports};
use homeview_features::{AugmentedRecord, FeatureDeriver, HouseRecord};
use homeview_filter::{parse_filter, FilterExpr, ReportFilter};
use homeview_io::{read_table, DataTable, FeatureCollection, GeoSource};
use serde::Deserialize;

/// Everything the dashboard shows, loaded once
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub config: DashboardConfig,
    /// Listings with derived features
    pub houses: Vec<AugmentedRecord>,
    /// The ten hypotheses, evaluated over `houses`
    pub hypotheses: Vec<Hypothesis>,
    pub reports: RecommendationReports,
    /// Zip code boundaries; empty when they could not be loaded
    pub geojson: FeatureCollection,
}

impl DashboardData {
    /// Load every input named by the configuration
    ///
    /// Missing or malformed listings and reports are errors. Boundaries
    /// that cannot be loaded only leave the choropleth empty.
    pub async fn load(config: &DashboardConfig) -> HomeviewResult<Self> {
        let houses = read_table(&config.data.houses.to_string_lossy())?;
        let reports = RecommendationReports::load(&config.data.buy_report, &config.data.sell_report)?;

        let geojson = match GeoSource::parse(&config.data.geojson).load().await {
            Ok(collection) => collection,
            Err(e) => {
                tracing::warn!(
                    source = %config.data.geojson,
                    error = %e,
                    "Could not load zip code boundaries, choropleth will be empty"
                );
                FeatureCollection::default()
            }
        };

        Self::from_parts(config.clone(), &houses, reports, geojson)
    }

    /// Build from already loaded inputs
    pub fn from_parts(
        config: DashboardConfig,
        houses: &DataTable,
        reports: RecommendationReports,
        geojson: FeatureCollection,
    ) -> HomeviewResult<Self> {
        let records = HouseRecord::from_table(houses)?;
        let houses = FeatureDeriver::new().augment_all(records);
        let hypotheses = HypothesisEngine::new(config.analysis.verdict_tolerance).evaluate(&houses);

        tracing::info!(
            houses = houses.len(),
            buy = reports.buy.num_rows(),
            sell = reports.sell.num_rows(),
            boundaries = geojson.len(),
            "Loaded dashboard data"
        );

        Ok(Self {
            config,
            houses,
            hypotheses,
            reports,
            geojson,
        })
    }

    /// Build the reports and maps for one filter
    pub fn view(&self, filter: &FilterExpr) -> HomeviewResult<DashboardView> {
        let reports = self.reports.apply(filter)?;
        let density = DensityMap::from_table(&reports.buy, &self.config.map)?;
        let choropleth = ChoroplethMap::build(&reports.buy, &self.geojson, &self.config.map)?;

        Ok(DashboardView {
            filter: filter.clone(),
            options: self.reports.filter_options(),
            reports,
            density,
            choropleth,
        })
    }
}

/// The filtered part of the dashboard
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub filter: FilterExpr,
    /// Selectable values, from the unfiltered buy report
    pub options: FilterOptions,
    pub reports: RecommendationReports,
    pub density: DensityMap,
    pub choropleth: ChoroplethMap,
}

/// Filter parameters as they arrive from a query string or the command line
///
/// `zipcode` and `condition` are comma separated lists; `filter` is a
/// filter expression. When both kinds are given, rows must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub zipcode: Option<String>,
    pub condition: Option<String>,
    pub filter: Option<String>,
}

impl DashboardQuery {
    pub fn to_expr(&self) -> HomeviewResult<FilterExpr> {
        let selection = ReportFilter::from_lists(
            self.zipcode.as_deref().unwrap_or(""),
            self.condition.as_deref().unwrap_or(""),
        )?
        .to_expr();
        let expr = parse_filter(self.filter.as_deref().unwrap_or(""))?;

        Ok(match (selection, expr) {
            (FilterExpr::All, expr) => expr,
            (selection, FilterExpr::All) => selection,
            (selection, expr) => FilterExpr::and(selection, expr),
        })
    }

    /// The selection part, for pre-checking the sidebar form
    pub fn selection(&self) -> ReportFilter {
        ReportFilter::from_lists(
            self.zipcode.as_deref().unwrap_or(""),
            self.condition.as_deref().unwrap_or(""),
        )
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HomeviewError;
    use homeview_filter::ComparisonOp;

    #[test]
    fn test_query_selection_only() {
        let query = DashboardQuery {
            zipcode: Some("98001".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_expr().unwrap(), FilterExpr::in_ints("zipcode", [98001]));
    }

    #[test]
    fn test_query_combines_selection_and_expression() {
        let query = DashboardQuery {
            condition: Some("3, 4".to_string()),
            filter: Some("price < 500000".to_string()),
            ..Default::default()
        };
        assert_eq!(
            query.to_expr().unwrap(),
            FilterExpr::and(
                FilterExpr::in_ints("condition", [3, 4]),
                FilterExpr::compare("price", ComparisonOp::Lt, 500000.0),
            )
        );
    }

    #[test]
    fn test_empty_query_selects_all() {
        assert_eq!(DashboardQuery::default().to_expr().unwrap(), FilterExpr::All);
    }

    #[test]
    fn test_bad_query() {
        let query = DashboardQuery {
            filter: Some("price >>".to_string()),
            ..Default::default()
        };
        let err = query.to_expr().unwrap_err();
        assert!(matches!(err, HomeviewError::FilterSyntax(_)));
        assert!(err.is_client_error());

        let query = DashboardQuery {
            zipcode: Some("98001,abc".to_string()),
            ..Default::default()
        };
        assert!(query.to_expr().is_err());
        assert!(query.selection().is_empty());
    }
}
