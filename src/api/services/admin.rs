use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    response::IntoResponse,
};
use tracing::{info, warn};

use crate::api::{
    error::ApiError,
    models::{SeedRequest, SeedResponse},
    state::AppState,
    utils::admin_key,
    validation::validate_seed,
};

/// Bulk content ingestion (POST /admin/seed)
///
/// Inserts one manga, one chapter and its pages in a single transaction.
/// The `X-Admin-Key` header is checked before the body is parsed.
pub async fn seed_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SeedRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let expected = state.config.admin.seed_key.as_str();
    let authorized = admin_key(&headers).is_some_and(|key| !expected.is_empty() && key == expected);
    if !authorized {
        warn!("Rejected seed request with missing or wrong admin key");
        return Err(ApiError::Forbidden);
    }

    let Json(payload) = payload?;
    validate_seed(&payload)?;
    state.metrics.seed_requested();

    let outcome = state
        .store
        .seed(&payload.manga, &payload.chapter, &payload.pages)
        .await?;

    info!(
        manga_id = outcome.manga_id,
        chapter_id = outcome.chapter_id,
        pages = outcome.pages,
        "Seed request completed"
    );

    Ok(Json(SeedResponse {
        manga_id: outcome.manga_id,
        chapter_id: outcome.chapter_id,
        pages: outcome.pages,
    }))
}
