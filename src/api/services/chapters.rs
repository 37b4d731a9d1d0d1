use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    response::IntoResponse,
};

use super::{comments_page, honeypot_response, store_comment};
use crate::api::{
    error::ApiError,
    models::{ChapterDetail, ChapterNav, CommentCreate, LikeResponse, ListParams},
    state::AppState,
    validation::validate_comment,
};
use crate::db::{Chapter, CommentTarget, Direction};

async fn find_chapter(state: &AppState, chapter_id: i64) -> Result<Chapter, ApiError> {
    state
        .store
        .chapter_by_id(chapter_id)
        .await?
        .ok_or_else(ApiError::chapter_not_found)
}

/// Chapter with its pages in reading order (GET /api/v1/chapters/{id})
pub async fn get_chapter(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    let chapter = find_chapter(&state, chapter_id).await?;
    let pages = state.store.pages_for_chapter(chapter.id).await?;

    Ok(Json(ChapterDetail::new(chapter, pages)))
}

pub async fn like_chapter(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    let like_count = state
        .store
        .like_chapter(chapter_id)
        .await?
        .ok_or_else(ApiError::chapter_not_found)?;

    state.metrics.like_recorded();
    Ok(Json(LikeResponse { like_count }))
}

/// `null` rather than 404 at either end of the manga
async fn neighbour(
    state: &AppState,
    chapter_id: i64,
    direction: Direction,
) -> Result<Json<Option<ChapterNav>>, ApiError> {
    let current = find_chapter(state, chapter_id).await?;
    let adjacent = state.store.adjacent_chapter(&current, direction).await?;

    Ok(Json(adjacent.map(ChapterNav::from)))
}

pub async fn next_chapter(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    neighbour(&state, chapter_id, Direction::Next).await
}

pub async fn prev_chapter(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    neighbour(&state, chapter_id, Direction::Prev).await
}

pub async fn list_chapter_comments(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    let Query(params) = query?;
    let chapter = find_chapter(&state, chapter_id).await?;

    comments_page(&state, CommentTarget::Chapter(chapter.id), &params).await
}

pub async fn create_chapter_comment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CommentCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(chapter_id) = path?;
    let Json(payload) = payload?;

    if let Some(echo) = honeypot_response(&state, &payload) {
        return Ok(echo);
    }

    let comment = validate_comment(&payload)?;
    let chapter = find_chapter(&state, chapter_id).await?;

    store_comment(&state, CommentTarget::Chapter(chapter.id), comment).await
}
