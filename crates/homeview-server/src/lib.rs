//! homeview-server - HTTP surface of the dashboard
//!
//! Serves the rendered dashboard page and its parts as JSON, SVG, and CSV.
//! The data is loaded once before the server starts; each request builds
//! its filtered view from the shared, immutable [`DashboardData`].

pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use homeview_core::DashboardData;

/// Shared application state
pub struct AppState {
    pub data: DashboardData,
}

impl AppState {
    pub fn new(data: DashboardData) -> Self {
        Self { data }
    }
}

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Page
        .route("/", get(http::index))
        // Hypotheses
        .route("/api/hypotheses", get(http::list_hypotheses))
        .route("/api/hypotheses/{id}", get(http::get_hypothesis))
        .route("/api/charts/{id}", get(http::get_chart))
        // Reports
        .route("/api/filters", get(http::get_filters))
        .route("/api/reports", get(http::get_reports))
        .route("/api/reports/{kind}/csv", get(http::get_report_csv))
        // Maps
        .route("/api/maps/density", get(http::get_density_map))
        .route("/api/maps/choropleth", get(http::get_choropleth_map))
        // System
        .route("/status", get(http::get_status))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("homeview dashboard listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
