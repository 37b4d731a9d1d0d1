use chrono::Utc;
use tracing::debug;

use super::error::Result;
use super::models::ReadingProgress;
use super::store::MangaStore;

const PROGRESS_COLUMNS: &str = "id, user_token, manga_id, chapter_id, page_index, updated_at";

impl MangaStore {
    pub async fn progress(&self, user_token: &str, manga_id: i64) -> Result<Option<ReadingProgress>> {
        let progress = sqlx::query_as::<_, ReadingProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM reading_progress WHERE user_token = ? AND manga_id = ?"
        ))
        .bind(user_token)
        .bind(manga_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(progress)
    }

    /// Insert or overwrite the progress row for `(user_token, manga_id)`
    ///
    /// The unique index on the pair turns a concurrent second insert into an
    /// update, so there is never more than one row per pair.
    pub async fn save_progress(
        &self,
        user_token: &str,
        manga_id: i64,
        chapter_id: i64,
        page_index: i64,
    ) -> Result<ReadingProgress> {
        let progress = sqlx::query_as::<_, ReadingProgress>(&format!(
            "INSERT INTO reading_progress (user_token, manga_id, chapter_id, page_index, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(user_token, manga_id) DO UPDATE SET \
                 chapter_id = excluded.chapter_id, \
                 page_index = excluded.page_index, \
                 updated_at = excluded.updated_at \
             RETURNING {PROGRESS_COLUMNS}"
        ))
        .bind(user_token)
        .bind(manga_id)
        .bind(chapter_id)
        .bind(page_index)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        debug!(progress_id = progress.id, manga_id, chapter_id, page_index, "Saved progress");
        Ok(progress)
    }

    /// Remove the row if present. Returns whether a row was deleted.
    pub async fn delete_progress(&self, user_token: &str, manga_id: i64) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM reading_progress WHERE user_token = ? AND manga_id = ?")
                .bind(user_token)
                .bind(manga_id)
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{MangaStatus, NewChapter, NewManga, SeedOutcome};

    async fn store_with_manga() -> (MangaStore, SeedOutcome) {
        let store = MangaStore::in_memory().await.unwrap();
        let outcome = store
            .seed(
                &NewManga {
                    slug: "reader".to_string(),
                    title: "Reader".to_string(),
                    description: None,
                    cover_url: None,
                    status: MangaStatus::Ongoing,
                },
                &NewChapter {
                    number: 1,
                    title: None,
                },
                &[],
            )
            .await
            .unwrap();
        (store, outcome)
    }

    #[tokio::test]
    async fn test_second_save_overwrites_in_place() {
        let (store, outcome) = store_with_manga().await;
        let second_chapter = store.add_chapter(outcome.manga_id, 2, None, &[]).await.unwrap();

        let first = store
            .save_progress("device-a", outcome.manga_id, outcome.chapter_id, 3)
            .await
            .unwrap();
        let second = store
            .save_progress("device-a", outcome.manga_id, second_chapter, 7)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.chapter_id, second_chapter);
        assert_eq!(second.page_index, 7);

        let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reading_progress")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_progress_is_per_token() {
        let (store, outcome) = store_with_manga().await;

        store
            .save_progress("device-a", outcome.manga_id, outcome.chapter_id, 2)
            .await
            .unwrap();

        assert!(store.progress("device-b", outcome.manga_id).await.unwrap().is_none());
        let found = store.progress("device-a", outcome.manga_id).await.unwrap().unwrap();
        assert_eq!(found.page_index, 2);
        assert_eq!(found.user_token, "device-a");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, outcome) = store_with_manga().await;

        store
            .save_progress("device-a", outcome.manga_id, outcome.chapter_id, 1)
            .await
            .unwrap();

        assert!(store.delete_progress("device-a", outcome.manga_id).await.unwrap());
        assert!(!store.delete_progress("device-a", outcome.manga_id).await.unwrap());
        assert!(store.progress("device-a", outcome.manga_id).await.unwrap().is_none());
    }
}
