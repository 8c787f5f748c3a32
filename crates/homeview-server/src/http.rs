//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;

use homeview_core::{
    find_hypothesis, render_page, ChoroplethMap, CsvExporter, DashboardQuery, DashboardView,
    DensityMap, FilterOptions, HomeviewError, Hypothesis, ReportKind,
};
use homeview_io::{CellValue, DataTable};

use crate::AppState;

const CHART_WIDTH: u32 = 640;
const CHART_HEIGHT: u32 = 400;

type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Map a dashboard error to a status and message
fn reject(err: HomeviewError) -> (StatusCode, String) {
    let status = match err {
        HomeviewError::UnknownChart(_) | HomeviewError::UnknownReport(_) => StatusCode::NOT_FOUND,
        ref e if e.is_client_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    }
    (status, err.to_string())
}

fn build_view(state: &AppState, query: &DashboardQuery) -> ApiResult<DashboardView> {
    query
        .to_expr()
        .and_then(|expr| state.data.view(&expr))
        .map_err(reject)
}

/// Render the dashboard page
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Html<String>> {
    let view = build_view(&state, &query)?;
    render_page(&state.data, &view, &query)
        .map(Html)
        .map_err(reject)
}

/// All hypotheses with their computed verdicts
pub async fn list_hypotheses(State(state): State<Arc<AppState>>) -> Json<Vec<Hypothesis>> {
    Json(state.data.hypotheses.clone())
}

/// One hypothesis by id (`h3`) or number (`3`)
pub async fn get_hypothesis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Hypothesis>> {
    find_hypothesis(&state.data.hypotheses, &id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(HomeviewError::UnknownChart(id)))
}

/// A hypothesis chart as SVG
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let hypothesis = find_hypothesis(&state.data.hypotheses, &id)
        .ok_or_else(|| reject(HomeviewError::UnknownChart(id.clone())))?;

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        hypothesis.chart.to_svg(CHART_WIDTH, CHART_HEIGHT),
    )
        .into_response())
}

/// Zip codes and conditions available for filtering
pub async fn get_filters(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    Json(state.data.reports.filter_options())
}

/// A table as column names plus rows of cells
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl From<&DataTable> for TableResponse {
    fn from(table: &DataTable) -> Self {
        Self {
            columns: table.column_names().into_iter().map(String::from).collect(),
            rows: (0..table.num_rows()).map(|i| table.row(i)).collect(),
        }
    }
}

/// Both filtered reports
#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    /// The applied filter, in filter syntax
    pub filter: String,
    pub buy: TableResponse,
    pub sell: TableResponse,
}

/// Filtered reports as JSON, in display form
pub async fn get_reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ReportsResponse>> {
    let view = build_view(&state, &query)?;

    Ok(Json(ReportsResponse {
        filter: view.filter.to_string(),
        buy: (&view.reports.display_table(ReportKind::Buy)).into(),
        sell: (&view.reports.display_table(ReportKind::Sell)).into(),
    }))
}

/// One filtered report as a CSV download
pub async fn get_report_csv(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Response> {
    let kind: ReportKind = kind.parse().map_err(reject)?;
    let view = build_view(&state, &query)?;
    let csv = CsvExporter::new()
        .export(&view.reports.display_table(kind))
        .map_err(reject)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}_report.csv\"", kind),
            ),
        ],
        csv,
    )
        .into_response())
}

/// Density map of the filtered buy report
pub async fn get_density_map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DensityMap>> {
    Ok(Json(build_view(&state, &query)?.density))
}

/// Price choropleth of the filtered buy report
pub async fn get_choropleth_map(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<ChoroplethMap>> {
    Ok(Json(build_view(&state, &query)?.choropleth))
}

/// Get system status
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let data = &state.data;
    let holding = data
        .hypotheses
        .iter()
        .filter(|h| h.verdict == homeview_core::Verdict::Holds)
        .count();

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "houses": data.houses.len(),
        "hypotheses": {
            "total": data.hypotheses.len(),
            "holding": holding
        },
        "reports": {
            "buy": data.reports.buy.num_rows(),
            "sell": data.reports.sell.num_rows()
        },
        "boundaries": data.geojson.len()
    }))
}
