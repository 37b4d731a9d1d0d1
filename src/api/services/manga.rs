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
    models::{CommentCreate, LikeResponse, ListParams, MangaDetail, MangaSummary, PaginatedMangaResponse},
    state::AppState,
    utils::page_count,
    validation::{validate_comment, validate_list_params},
};
use crate::db::{CommentTarget, Manga};

async fn find_manga(state: &AppState, slug: &str) -> Result<Manga, ApiError> {
    state
        .store
        .manga_by_slug(slug)
        .await?
        .ok_or_else(ApiError::manga_not_found)
}

/// Catalog page (GET /api/v1/manga/)
///
/// `search` is a case-insensitive substring match on title or description.
/// Pages past the end return no items but still report the total.
pub async fn list_manga(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = query?;
    let pagination = validate_list_params(&params)?;

    let (manga, total) = state
        .store
        .search_manga(params.search.as_deref(), pagination.window())
        .await?;

    Ok(Json(PaginatedMangaResponse {
        items: manga.iter().map(MangaSummary::from).collect(),
        total,
        page: pagination.page,
        page_size: pagination.page_size,
        pages: page_count(total, pagination.page_size),
    }))
}

/// Manga with its chapters ordered by number (GET /api/v1/manga/{slug})
pub async fn get_manga(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(slug) = path?;
    let manga = find_manga(&state, &slug).await?;
    let chapters = state.store.chapters_for_manga(manga.id).await?;

    Ok(Json(MangaDetail::new(&manga, &chapters)))
}

pub async fn like_manga(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(slug) = path?;
    let like_count = state
        .store
        .like_manga(&slug)
        .await?
        .ok_or_else(ApiError::manga_not_found)?;

    state.metrics.like_recorded();
    Ok(Json(LikeResponse { like_count }))
}

pub async fn list_manga_comments(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(slug) = path?;
    let Query(params) = query?;
    let manga = find_manga(&state, &slug).await?;

    comments_page(&state, CommentTarget::Manga(manga.id), &params).await
}

pub async fn create_manga_comment(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<CommentCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(slug) = path?;
    let Json(payload) = payload?;

    if let Some(echo) = honeypot_response(&state, &payload) {
        return Ok(echo);
    }

    let comment = validate_comment(&payload)?;
    let manga = find_manga(&state, &slug).await?;

    store_comment(&state, CommentTarget::Manga(manga.id), comment).await
}
