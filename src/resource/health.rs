use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::backend::Backend;

/// Liveness probe that also pings the database.
pub async fn health(State((backend, _)): State<AppState>) -> (StatusCode, Json<Value>) {
    match backend.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "healthy"}))),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unhealthy", "error": e.to_string()})),
            )
        }
    }
}
