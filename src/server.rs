//! HTTP surface for the browser dashboard.
//!
//! A date-range picker and a fixed set of charts drive this API: the UI
//! fetches `/api/meta` once to initialize the picker with the dataset span,
//! then re-fetches `/api/dashboard` with the selected bounds on every
//! interaction. The payload is recomputed in full per request; the dataset
//! itself is loaded once and shared immutably.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::{AnalyticsConfig, ServerConfig};
use crate::dashboard::{build_report, DashboardReport};
use crate::dataset::Dataset;
use crate::error::{DashboardError, Result};
use crate::metrics::MetricsCollector;
use crate::models::DateRange;
use crate::validation::InputValidator;

/// Application state shared across handlers.
pub struct AppState {
    /// The order table, loaded once at startup.
    pub dataset: Arc<Dataset>,
    /// Aggregation options (window length, top-N sizes, fence multiplier).
    pub analytics: AnalyticsConfig,
}

/// Date-range picker query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Inclusive start day (`YYYY-MM-DD`); defaults to the dataset start.
    pub start_date: Option<String>,
    /// Inclusive end day (`YYYY-MM-DD`); defaults to the dataset end.
    pub end_date: Option<String>,
}

/// Resolve query parameters into a validated date range.
pub fn resolve_range(query: &DashboardQuery) -> Result<DateRange> {
    let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
    InputValidator::validate_date_range(range.start, range.end)
        .map_err(|e| DashboardError::InvalidDate(e.to_string()))?;
    Ok(range)
}

/// Create the router with all routes.
pub fn create_router(state: Arc<AppState>, assets_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/meta", get(meta_handler))
        .route("/api/dashboard", get(dashboard_handler));

    // Serve the static sidebar assets (logo) when a directory is configured
    let router = match assets_dir {
        Some(dir) => router.nest_service("/assets", ServeDir::new(dir)),
        None => router,
    };

    router.layer(CorsLayer::permissive()).with_state(state)
}

/// Start the dashboard server.
pub async fn serve(
    state: Arc<AppState>,
    config: &ServerConfig,
    assets_dir: Option<PathBuf>,
) -> Result<()> {
    let router = create_router(state, assets_dir);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Dashboard server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

/// Health check handler.
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Dataset span and row count, for initializing the date-range picker.
async fn meta_handler(State(state): State<Arc<AppState>>) -> Response {
    MetricsCollector::default().record_http_request("/api/meta", true);
    match state.dataset.meta() {
        Some(meta) => Json(meta).into_response(),
        None => ApiError::new(StatusCode::NOT_FOUND, "dataset has no rows").into_response(),
    }
}

/// The full dashboard payload for the selected range.
async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> std::result::Result<Json<DashboardReport>, ApiError> {
    let collector = MetricsCollector::default();
    let range = resolve_range(&query).map_err(|e| {
        warn!(error = %e, "Rejected dashboard query");
        collector.record_http_request("/api/dashboard", false);
        collector.record_error("invalid_range", "dashboard");
        ApiError::new(StatusCode::BAD_REQUEST, e)
    })?;

    let report = build_report(&state.dataset, &range, &state.analytics);
    collector.record_http_request("/api/dashboard", true);
    Ok(Json(report))
}

/// An error payload returned to the browser UI.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl ToString) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
