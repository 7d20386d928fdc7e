//! HTTP surface: `POST /search`, `POST /search/systematic` (NDJSON), and
//! `GET /health`, mirroring the Python prototype's FastAPI service
//! (`/search`, `/search/systematic`, `/health`) but wired to the real
//! [`Orchestrator`] instead of a mock engine.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::json;

use search_retrieve::SearchRequest;

use crate::pipeline::Orchestrator;
use crate::OrchestratorError;

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<Orchestrator>,
}

impl IntoResponse for OrchestratorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            OrchestratorError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            OrchestratorError::Rerank(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            OrchestratorError::Scout(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            OrchestratorError::Audit(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            OrchestratorError::Retrieve(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Build the axum [`Router`], ready to serve once bound to a listener.
pub fn build_app(orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState { orchestrator };

    Router::new()
        .route("/search", post(search))
        .route("/search/systematic", post(search_systematic))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind to `0.0.0.0:{port}` and serve until the process exits.
pub async fn serve(orchestrator: Arc<Orchestrator>, port: u16) -> std::io::Result<()> {
    let app = build_app(orchestrator);
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!(%addr, "search-rank HTTP surface starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

/// `POST /search` — bounded top-k search.
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<impl IntoResponse, OrchestratorError> {
    let response = state.orchestrator.execute(&request).await?;
    Ok(Json(response))
}

/// `POST /search/systematic` — unbounded, audited search, streamed as
/// newline-delimited JSON.
async fn search_systematic(State(state): State<AppState>, Json(request): Json<SearchRequest>) -> Response {
    // Leaking the orchestrator's lifetime into a 'static stream requires an
    // owned handle; the caller holds it behind an `Arc` for exactly this.
    let orchestrator = state.orchestrator.clone();
    let body_stream = async_stream::stream! {
        let request = request;
        let stream = orchestrator.execute_systematic(&request);
        futures::pin_mut!(stream);
        while let Some(item) = stream.next().await {
            match item {
                Ok(hit) => {
                    let mut line = serde_json::to_vec(&hit).unwrap_or_default();
                    line.push(b'\n');
                    yield Ok::<_, std::io::Error>(line);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "systematic search stream aborted");
                    break;
                }
            }
        }
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/x-ndjson")
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// `GET /health` — liveness, database connectivity, and embedder
/// configuration (spec.md §6).
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.orchestrator.health();
    Json(json!({
        "status": "ready",
        "database": status.database,
        "embedder": status.embedder,
    }))
}
