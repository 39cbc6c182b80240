//! REST API for highlight search
//!
//! - `GET /` welcome message
//! - `POST /query` `{"query": "..."}` → `{query, interpretation, data}`
//! - `GET /random` runs one of a fixed set of sample queries
//!
//! The engine is blocking (it owns a blocking HTTP client), so every query
//! runs on `spawn_blocking`. Query failures never surface as HTTP errors;
//! they come back as an empty `data` list.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::engine::SearchEngine;
use crate::plays::PlayRecord;

/// Queries served by `GET /random`
pub const SAMPLE_QUERIES: [&str; 2] = ["Lebron James driving layups", "Wembanyama fadeaways"];

#[derive(Clone)]
pub struct AppState {
    engine: Arc<SearchEngine>,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self { engine }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub interpretation: String,
    pub data: Vec<PlayRecord>,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// Create router for the highlight endpoints
pub fn create_router(engine: Arc<SearchEngine>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/query", post(run_query))
        .route("/random", get(random_query))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(engine))
}

async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the highlight search API. POST /query with {\"query\": \"...\"}",
    })
}

async fn run_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, StatusCode> {
    execute(state.engine, request.query).await.map(Json)
}

async fn random_query(State(state): State<AppState>) -> Result<Json<QueryResponse>, StatusCode> {
    let query = SAMPLE_QUERIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(SAMPLE_QUERIES[0]);
    execute(state.engine, query.to_string()).await.map(Json)
}

async fn execute(engine: Arc<SearchEngine>, query: String) -> Result<QueryResponse, StatusCode> {
    let outcome = tokio::task::spawn_blocking(move || engine.query(&query))
        .await
        .map_err(|e| {
            tracing::error!("Query task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(QueryResponse {
        interpretation: outcome.interpretation(),
        query: outcome.query,
        data: outcome.rows,
    })
}
