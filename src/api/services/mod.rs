//! Request handlers, one module per resource
//!
//! Handlers take their extractors as `Result<_, Rejection>` so malformed
//! paths, query strings and bodies are reported through [`ApiError`] with
//! the same JSON shape as every other failure.

mod admin;
mod chapters;
mod health;
mod manga;
mod progress;

pub use admin::seed_content;
pub use chapters::{
    create_chapter_comment, get_chapter, like_chapter, list_chapter_comments, next_chapter,
    prev_chapter,
};
pub use health::{db_health, health};
pub use manga::{create_manga_comment, get_manga, like_manga, list_manga, list_manga_comments};
pub use progress::{delete_progress, get_progress, save_progress};

use axum::{Json, http::StatusCode};
use chrono::Utc;
use tracing::{info, warn};

use super::error::ApiError;
use super::models::{CommentCreate, CommentOut, ListParams};
use super::state::AppState;
use super::validation::{self, CleanComment};
use crate::db::CommentTarget;

type Created<T> = (StatusCode, Json<T>);

/// Fabricated success for bot submissions. Nothing is looked up or stored.
fn honeypot_response(state: &AppState, payload: &CommentCreate) -> Option<Created<CommentOut>> {
    if !payload.is_bot() {
        return None;
    }

    state.metrics.honeypot_rejected();
    warn!("Honeypot field filled, discarding comment");

    let CleanComment { user_name, text } = validation::echo_comment(payload);
    let echo = CommentOut {
        id: 0,
        user_name,
        text,
        created_at: Utc::now(),
    };

    Some((StatusCode::CREATED, Json(echo)))
}

async fn store_comment(
    state: &AppState,
    target: CommentTarget,
    comment: CleanComment,
) -> Result<Created<CommentOut>, ApiError> {
    let stored = state
        .store
        .insert_comment(target, &comment.user_name, &comment.text)
        .await?;

    state.metrics.comment_created();
    info!(comment_id = stored.id, ?target, "Comment created");

    Ok((StatusCode::CREATED, Json(CommentOut::from(stored))))
}

async fn comments_page(
    state: &AppState,
    target: CommentTarget,
    params: &ListParams,
) -> Result<Json<Vec<CommentOut>>, ApiError> {
    let pagination = validation::validate_list_params(params)?;

    let comments = state
        .store
        .list_comments(target, pagination.window())
        .await?;

    Ok(Json(comments.into_iter().map(CommentOut::from).collect()))
}
