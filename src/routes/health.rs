use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let body = json!({
        "status": "ok",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    });
    (StatusCode::OK, Json(body))
}
