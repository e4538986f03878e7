//! HTTP boundary: JSON endpoints over the scoring core.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use taskrank_core::{AnalyzeRequest, AnalyzeResult, Analyzer, CoreError};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

/// Shared application state. Immutable; every request picks its own "today".
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub timezone: Tz,
    pub suggest_limit: usize,
    /// Fixed evaluation date instead of the clock.
    pub pinned_today: Option<NaiveDate>,
}

impl AppState {
    fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| taskrank_core::time::today_in(self.timezone, Utc::now()))
    }
}

/// Structural request problems become 400s with a machine-readable kind.
pub struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::info!(kind = self.0.kind(), error = %self.0, "rejected request");
        let body = json!({ "error": self.0.to_string(), "kind": self.0.kind() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks/analyze/", post(analyze))
        .route("/api/tasks/suggest/", post(suggest))
        .route("/api/tasks/strategies/", get(strategies))
        .layer(cors)
        .with_state(state)
}

pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("invalid allowed origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Start the HTTP server and run until Ctrl+C.
pub async fn start_server(
    cfg: &Config,
    analyzer: Analyzer,
    host: &str,
    port: u16,
    pinned_today: Option<NaiveDate>,
) -> Result<()> {
    let state = AppState {
        analyzer: Arc::new(analyzer),
        timezone: cfg.timezone()?,
        suggest_limit: cfg.scoring.suggest_limit,
        pinned_today,
    };
    let app = router(state, cors_layer(&cfg.server.allowed_origins)?);

    let host_addr: std::net::IpAddr = host
        .parse()
        .with_context(|| format!("invalid host address '{host}'"))?;
    let addr = SocketAddr::from((host_addr, port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(%addr, "listening");
    println!("taskrank API at http://{addr}/api/tasks/");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "build": env!("TASKRANK_BUILD_SHA"),
    }))
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnalyzeResult>, ApiError> {
    let request = AnalyzeRequest::from_value(body)?;
    Ok(Json(state.analyzer.analyze(&request, state.today())))
}

#[derive(Debug, Deserialize)]
struct SuggestQuery {
    limit: Option<usize>,
}

async fn suggest(
    State(state): State<AppState>,
    Query(q): Query<SuggestQuery>,
    Json(body): Json<Value>,
) -> Result<Json<AnalyzeResult>, ApiError> {
    let limit = match q.limit {
        Some(0) => return Err(CoreError::invalid_request("`limit` must be at least 1").into()),
        Some(n) => n,
        None => state.suggest_limit,
    };
    let request = AnalyzeRequest::from_value(body)?;
    Ok(Json(state.analyzer.suggest(&request, state.today(), limit)))
}

async fn strategies(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "strategies": state.analyzer.list_strategies() }))
}
