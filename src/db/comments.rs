use chrono::Utc;
use tracing::debug;

use super::error::Result;
use super::models::{Comment, CommentTarget, PageWindow};
use super::store::MangaStore;

const COMMENT_COLUMNS: &str = "id, manga_id, chapter_id, user_name, text, created_at";

impl MangaStore {
    /// Append a comment. Inputs are expected to be validated already.
    pub async fn insert_comment(
        &self,
        target: CommentTarget,
        user_name: &str,
        text: &str,
    ) -> Result<Comment> {
        let (manga_id, chapter_id) = target.columns();

        let comment = sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comment (manga_id, chapter_id, user_name, text, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(manga_id)
        .bind(chapter_id)
        .bind(user_name)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        debug!(comment_id = comment.id, ?target, "Inserted comment");
        Ok(comment)
    }

    /// Comments for one manga or chapter, newest first
    ///
    /// Ids grow with insertion order, so ordering by id descending matches
    /// creation time without relying on timestamp text collation.
    pub async fn list_comments(
        &self,
        target: CommentTarget,
        window: PageWindow,
    ) -> Result<Vec<Comment>> {
        let column = match target {
            CommentTarget::Manga(_) => "manga_id",
            CommentTarget::Chapter(_) => "chapter_id",
        };
        let owner_id = match target {
            CommentTarget::Manga(id) | CommentTarget::Chapter(id) => id,
        };

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comment WHERE {column} = ? \
             ORDER BY id DESC LIMIT ? OFFSET ?"
        ))
        .bind(owner_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(self.pool())
        .await?;

        Ok(comments)
    }
}
