use axum::{Json, extract::State};
use std::sync::Arc;

use super::{AppState, HealthResponse, MessageResponse};

/// GET /
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "API Running".to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
