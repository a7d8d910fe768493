use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

use crate::AppState;

/// `GET /healthz/liveness`
pub async fn liveness() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}

/// `GET /healthz/readiness`: 503 while the store cannot be reached.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "UP" }))),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "DOWN", "error": e.to_string() })),
            )
        }
    }
}
