//! Map data for the filtered buy report
//!
//! Two maps are built, both serialized as JSON for Leaflet on the page:
//!
//! - [`DensityMap`]: one marker per listing, grouped into grid clusters
//! - [`ChoroplethMap`]: zip code polygons colored by mean listing price

use crate::colormap::ylorrd;
use crate::config::MapConfig;
use crate::error::{HomeviewError, HomeviewResult};
use homeview_filter::ZIPCODE_FIELD;
use homeview_io::{DataTable, Feature, FeatureCollection};
use homeview_stats::{mean, Aggregation, GroupedAggregate, SummaryStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Property of each GeoJSON feature holding its zip code
pub const GEOJSON_ZIP_KEY: &str = "ZIP";

/// Choropleth legend caption
pub const CHOROPLETH_LEGEND: &str = "AVG PRICE";

/// Fallback map center (King County, WA) when there is nothing to average
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 47.5112,
    long: -122.257,
};

/// A latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub long: f64,
}

/// A single listing marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub long: f64,
    pub popup: String,
}

/// Markers falling in one grid cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Centroid of the member markers
    pub center: GeoPoint,
    pub count: usize,
}

/// Portfolio density: markers and their grid clusters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityMap {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub clusters: Vec<Cluster>,
}

impl DensityMap {
    /// Build from a report with `lat`, `long`, and `price` columns
    ///
    /// Rows missing any of the three are left off the map.
    pub fn from_table(table: &DataTable, config: &MapConfig) -> HomeviewResult<Self> {
        let lat = column_f64(table, "lat")?;
        let long = column_f64(table, "long")?;
        let price = column_f64(table, "price")?;

        let markers: Vec<Marker> = (0..table.num_rows())
            .filter_map(|i| {
                let (lat, long, price) = (lat.get(i)?, long.get(i)?, price.get(i)?);
                (lat.is_finite() && long.is_finite() && price.is_finite()).then(|| Marker {
                    lat: *lat,
                    long: *long,
                    popup: format!("Sold ${}", price),
                })
            })
            .collect();

        Ok(Self {
            center: center_of(&lat, &long),
            zoom: config.zoom_start,
            clusters: cluster_markers(&markers, config.cluster_cell_degrees),
            markers,
        })
    }
}

/// Group markers into square grid cells of `cell_degrees`
pub fn cluster_markers(markers: &[Marker], cell_degrees: f64) -> Vec<Cluster> {
    if cell_degrees.is_nan() || cell_degrees <= 0.0 {
        return Vec::new();
    }

    let mut cells: BTreeMap<(i64, i64), (f64, f64, usize)> = BTreeMap::new();
    for marker in markers {
        let key = (
            (marker.lat / cell_degrees).floor() as i64,
            (marker.long / cell_degrees).floor() as i64,
        );
        let cell = cells.entry(key).or_insert((0.0, 0.0, 0));
        cell.0 += marker.lat;
        cell.1 += marker.long;
        cell.2 += 1;
    }

    cells
        .into_values()
        .map(|(lat, long, count)| Cluster {
            center: GeoPoint {
                lat: lat / count as f64,
                long: long / count as f64,
            },
            count,
        })
        .collect()
}

/// One zip code region on the choropleth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub zipcode: i64,
    pub mean_price: f64,
    /// Fill color, `#RRGGBB`
    pub color: String,
}

/// Mean price per zip code over matching GeoJSON polygons
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub center: GeoPoint,
    pub zoom: u8,
    pub legend: String,
    pub fill_opacity: f64,
    pub line_opacity: f64,
    /// Lowest and highest regional mean price, if any region matched
    pub price_range: Option<(f64, f64)>,
    pub regions: Vec<Region>,
    /// Matching features, each with `PRICE` and `fill` properties added
    pub geojson: FeatureCollection,
}

impl ChoroplethMap {
    /// Join mean prices per zip code to boundary features by `properties.ZIP`
    ///
    /// Features whose zip code has no listings are dropped.
    pub fn build(
        table: &DataTable,
        boundaries: &FeatureCollection,
        config: &MapConfig,
    ) -> HomeviewResult<Self> {
        let lat = column_f64(table, "lat")?;
        let long = column_f64(table, "long")?;
        let price = column_f64(table, "price")?;
        let zip_column = table
            .column(ZIPCODE_FIELD)
            .ok_or_else(|| missing_column(ZIPCODE_FIELD))?;

        let mut by_zip: GroupedAggregate<i64> = GroupedAggregate::new();
        for (row, value) in price.iter().enumerate() {
            if let Some(zip) = zip_column.i64_at(row) {
                by_zip.add(zip, *value);
            }
        }
        let means = by_zip.series(Aggregation::Mean);

        let stats = SummaryStats::from_data(&means.iter().map(|(_, v)| *v).collect::<Vec<_>>());
        let price_range = (!stats.is_empty()).then_some((stats.min, stats.max));
        let colormap = ylorrd();

        let regions: Vec<Region> = means
            .iter()
            .map(|(zip, mean_price)| Region {
                zipcode: *zip,
                mean_price: *mean_price,
                color: colormap
                    .sample_range(*mean_price, stats.min, stats.max)
                    .to_hex(),
            })
            .collect();

        let features: Vec<Feature> = boundaries
            .features
            .iter()
            .filter_map(|feature| {
                let zip = feature.property_i64(GEOJSON_ZIP_KEY)?;
                let region = regions.iter().find(|r| r.zipcode == zip)?;
                let mut feature = feature.clone();
                feature
                    .properties
                    .insert("PRICE".to_string(), serde_json::json!(region.mean_price));
                feature
                    .properties
                    .insert("fill".to_string(), serde_json::json!(region.color));
                Some(feature)
            })
            .collect();

        tracing::debug!(
            regions = regions.len(),
            features = features.len(),
            "Built price choropleth"
        );

        Ok(Self {
            center: center_of(&lat, &long),
            zoom: config.zoom_start,
            legend: CHOROPLETH_LEGEND.to_string(),
            fill_opacity: config.fill_opacity,
            line_opacity: config.line_opacity,
            price_range,
            regions,
            geojson: FeatureCollection::new(features),
        })
    }
}

fn missing_column(column: &str) -> HomeviewError {
    HomeviewError::MissingReportColumn {
        report: "buy".to_string(),
        column: column.to_string(),
    }
}

/// Numeric column with nulls as NaN
fn column_f64(table: &DataTable, name: &str) -> HomeviewResult<Vec<f64>> {
    table
        .column(name)
        .and_then(|c| c.to_f64())
        .ok_or_else(|| missing_column(name))
}

/// Mean position of the listings, or [`DEFAULT_CENTER`]
fn center_of(lat: &[f64], long: &[f64]) -> GeoPoint {
    match (mean(lat), mean(long)) {
        (Some(lat), Some(long)) => GeoPoint { lat, long },
        _ => DEFAULT_CENTER,
    }
}
