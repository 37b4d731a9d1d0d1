use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

use crate::api::{
    models::{DbHealthResponse, HealthResponse},
    state::AppState,
};

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        counters: state.metrics.snapshot(),
    })
}

/// Round-trips a trivial query; 503 when the database is unreachable
pub async fn db_health(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(DbHealthResponse {
                db: "ok".to_string(),
            }),
        ),
        Err(err) => {
            error!(error = %err, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DbHealthResponse {
                    db: "unavailable".to_string(),
                }),
            )
        }
    }
}
