//! Page server.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | The search page |
//! | `GET`  | `/api/status` | Status indicator fragment for the remote API |
//! | `GET`  | `/api/search?query=&filter=` | Results fragment (cards, empty state or error) |
//! | `GET`  | `/health` | Liveness check |
//!
//! Search and status never fail with a server error: remote failures are
//! rendered into the fragment itself.

use crate::remote::{CortexApi, SourceFilter, StatusProbe};
use crate::render::{render_error, render_results, StatusIndicator};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cortex_core::config::WebConfig;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
struct AppState {
    api: CortexApi,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    #[serde(default)]
    filter: SourceFilter,
}

pub fn router(api: CortexApi) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/api/status", get(handle_status))
        .route("/api/search", get(handle_search))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { api })
}

/// Binds `bind:port` from the web config and serves until the process ends.
pub async fn run_server(config: &WebConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Cortex page listening on http://{}", addr);
    serve(
        listener,
        CortexApi::new(&config.api_base, config.result_limit),
    )
    .await
}

pub async fn serve(listener: TcpListener, api: CortexApi) -> anyhow::Result<()> {
    axum::serve(listener, router(api)).await?;
    Ok(())
}

async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn handle_status(State(state): State<AppState>) -> Html<String> {
    let probe: Result<StatusProbe, _> = state.api.status().await;
    if let Err(e) = &probe {
        warn!("status probe failed: {}", e);
    }
    Html(StatusIndicator::from_probe(&probe).render())
}

async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.query.trim();
    if query.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Html(render_error("query must not be empty")),
        )
            .into_response();
    }
    match state.api.search(params.filter, query).await {
        Ok(resp) => {
            info!(query, filter = ?params.filter, hits = resp.results.len(), "search");
            Html(render_results(query, &resp.results)).into_response()
        }
        Err(e) => {
            warn!(query, error = %e, "search failed");
            Html(render_error(&e.to_string())).into_response()
        }
    }
}
