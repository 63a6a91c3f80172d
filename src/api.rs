use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::model::IngestPayload;
use crate::services::ingest::IngestService;
use crate::services::stats::StatsService;

pub struct AppState {
    pub config: AppConfig,
    pub ingest: IngestService,
    pub stats: StatsService,
}

pub async fn run_server(state: Arc<AppState>) {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Nested shape (current userscript) and flattened compatibility
        // shape land on the same handler; reconciliation is shape-driven.
        .route("/api/cashout", post(post_cashout))
        .route("/api/track", post(post_cashout))
        .route("/api/accounts", get(list_accounts))
        .route("/api/accounts/{id}/summary", get(account_summary))
        .route("/api/accounts/{id}/cashouts", get(account_cashouts))
        .route("/api/leaderboard", get(leaderboard))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("API server listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}

async fn root() -> impl IntoResponse {
    Json(json!({ "service": "cashout_stats" }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[derive(serde::Deserialize)]
struct PageParams {
    page: Option<usize>,
    size: Option<usize>,
}

#[derive(serde::Deserialize)]
struct LeaderboardParams {
    size: Option<usize>,
}

async fn post_cashout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&headers, &state.config)?;

    let payload: IngestPayload = serde_json::from_value(body.clone())
        .map_err(|e| ApiError::BadPayload(e.to_string()))?;
    let outcome = state.ingest.ingest(payload.reconcile(body))?;

    Ok(Json(json!({
        "status": "ok",
        "cashoutId": outcome.cashout_id,
        "inserted": outcome.inserted,
    })))
}

async fn list_accounts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&headers, &state.config)?;
    Ok(Json(state.stats.accounts()?))
}

async fn account_summary(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&headers, &state.config)?;
    Ok(Json(state.stats.summarize(&id).await?))
}

async fn account_cashouts(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&headers, &state.config)?;
    Ok(Json(
        state.stats.history(&id, params.page, params.size).await?,
    ))
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, ApiError> {
    check_auth(&headers, &state.config)?;
    Ok(Json(state.stats.leaderboard(params.size).await?))
}

/// Bearer-token check against the configured secret. A missing config token
/// disables auth (local development).
fn check_auth(headers: &HeaderMap, config: &AppConfig) -> Result<(), ApiError> {
    let Some(expected) = config.api.token.as_deref() else {
        return Ok(());
    };
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match provided {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
