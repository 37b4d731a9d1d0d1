//! Reading progress, keyed by the `X-User-Token` device header

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use crate::api::{
    error::ApiError,
    models::{ProgressCreate, ProgressOut},
    state::AppState,
    utils::user_token,
    validation::validate_progress,
};

/// Upsert progress for one manga (POST /api/v1/progress/)
///
/// The chapter must belong to the manga; a chapter from another manga is
/// reported the same way as a missing one.
pub async fn save_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ProgressCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    validate_progress(&payload)?;
    let token = user_token(&headers);

    if !state.store.manga_exists(payload.manga_id).await? {
        return Err(ApiError::manga_not_found());
    }

    state
        .store
        .chapter_by_id(payload.chapter_id)
        .await?
        .filter(|chapter| chapter.manga_id == payload.manga_id)
        .ok_or_else(ApiError::chapter_not_found)?;

    let progress = state
        .store
        .save_progress(&token, payload.manga_id, payload.chapter_id, payload.page_index)
        .await?;

    state.metrics.progress_saved();
    info!(
        manga_id = progress.manga_id,
        chapter_id = progress.chapter_id,
        page_index = progress.page_index,
        "Progress saved"
    );

    Ok((StatusCode::CREATED, Json(ProgressOut::from(progress))))
}

/// Stored progress or `null`
pub async fn get_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(manga_id) = path?;
    let token = user_token(&headers);

    let progress = state.store.progress(&token, manga_id).await?;

    Ok(Json(progress.map(ProgressOut::from)))
}

pub async fn delete_progress(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(manga_id) = path?;
    let token = user_token(&headers);

    if state.store.delete_progress(&token, manga_id).await? {
        info!(manga_id, "Progress deleted");
    }

    Ok(StatusCode::NO_CONTENT)
}
