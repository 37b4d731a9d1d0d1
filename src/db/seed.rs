//! Bulk content ingestion
//!
//! Manga, chapters and pages are only ever created here. Each call runs in a
//! single transaction; dropping it on an error path rolls everything back.

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::info;

use super::error::Result;
use super::models::{MangaStatus, NewChapter, NewManga, SeedOutcome};
use super::store::MangaStore;

pub const DEMO_SLUG: &str = "demo-manga";
const DEMO_CHAPTERS: i64 = 2;
const DEMO_PAGES_PER_CHAPTER: usize = 5;

/// Inserts a manga row along with the lowercased copies used by search
async fn insert_manga(conn: &mut SqliteConnection, manga: &NewManga) -> Result<i64> {
    let now = Utc::now();

    let manga_id = sqlx::query(
        "INSERT INTO manga (slug, title, description, cover_url, status, like_count, \
         created_at, updated_at, title_search, description_search) \
         VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?, ?)",
    )
    .bind(&manga.slug)
    .bind(&manga.title)
    .bind(&manga.description)
    .bind(&manga.cover_url)
    .bind(manga.status.as_str())
    .bind(now)
    .bind(now)
    .bind(manga.title.to_lowercase())
    .bind(manga.description.as_deref().map(str::to_lowercase))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(manga_id)
}

/// Inserts a chapter and its pages; page index is the 1-based list position
async fn insert_chapter(
    conn: &mut SqliteConnection,
    manga_id: i64,
    number: i64,
    title: Option<&str>,
    pages: &[String],
) -> Result<i64> {
    let chapter_id = sqlx::query(
        "INSERT INTO chapter (manga_id, number, title, like_count, published_at) \
         VALUES (?, ?, ?, 0, ?)",
    )
    .bind(manga_id)
    .bind(number)
    .bind(title)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    for (position, image_url) in pages.iter().enumerate() {
        sqlx::query("INSERT INTO page (chapter_id, idx, image_url) VALUES (?, ?, ?)")
            .bind(chapter_id)
            .bind(position as i64 + 1)
            .bind(image_url)
            .execute(&mut *conn)
            .await?;
    }

    Ok(chapter_id)
}

impl MangaStore {
    /// Insert one manga, one chapter linked to it, and the chapter's pages
    /// as a single unit
    pub async fn seed(
        &self,
        manga: &NewManga,
        chapter: &NewChapter,
        pages: &[String],
    ) -> Result<SeedOutcome> {
        let mut tx = self.pool().begin().await?;

        let manga_id = insert_manga(&mut tx, manga).await?;
        let chapter_id = insert_chapter(
            &mut tx,
            manga_id,
            chapter.number,
            chapter.title.as_deref(),
            pages,
        )
        .await?;

        tx.commit().await?;

        info!(manga_id, chapter_id, pages = pages.len(), slug = %manga.slug, "Seeded content");
        Ok(SeedOutcome {
            manga_id,
            chapter_id,
            pages: pages.len(),
        })
    }

    /// Add another chapter (with pages) to an existing manga
    pub async fn add_chapter(
        &self,
        manga_id: i64,
        number: i64,
        title: Option<&str>,
        pages: &[String],
    ) -> Result<i64> {
        let mut tx = self.pool().begin().await?;
        let chapter_id = insert_chapter(&mut tx, manga_id, number, title, pages).await?;
        tx.commit().await?;
        Ok(chapter_id)
    }

    /// Populate an empty catalog with a placeholder manga for frontend work.
    /// Returns `None` when the catalog already has content.
    ///
    /// The emptiness check and every insert share one transaction, so a
    /// failure part way leaves the catalog empty and the next start retries.
    pub async fn seed_demo_if_empty(&self) -> Result<Option<SeedOutcome>> {
        let mut tx = self.pool().begin().await?;

        let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM manga")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(None);
        }

        let manga = NewManga {
            slug: DEMO_SLUG.to_string(),
            title: "Demo Manga".to_string(),
            description: Some("Placeholder manga for frontend dev.".to_string()),
            cover_url: Some("https://placehold.co/300x450".to_string()),
            status: MangaStatus::Ongoing,
        };
        let manga_id = insert_manga(&mut tx, &manga).await?;

        let mut first_chapter = None;
        for number in 1..=DEMO_CHAPTERS {
            let title = format!("Chapter {number}");
            let chapter_id =
                insert_chapter(&mut tx, manga_id, number, Some(&title), &demo_pages(number)).await?;
            first_chapter.get_or_insert(chapter_id);
        }

        tx.commit().await?;

        info!(manga_id, chapters = DEMO_CHAPTERS, "Demo catalog created");
        Ok(first_chapter.map(|chapter_id| SeedOutcome {
            manga_id,
            chapter_id,
            pages: DEMO_PAGES_PER_CHAPTER,
        }))
    }
}

fn demo_pages(chapter_number: i64) -> Vec<String> {
    (1..=DEMO_PAGES_PER_CHAPTER)
        .map(|page| format!("https://placehold.co/800x1200?text=Ch{chapter_number}+Page{page}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::error::DbError;

    fn sample_manga(slug: &str) -> NewManga {
        NewManga {
            slug: slug.to_string(),
            title: "Sample".to_string(),
            description: Some("A sample manga".to_string()),
            cover_url: None,
            status: MangaStatus::Ongoing,
        }
    }

    #[tokio::test]
    async fn test_seed_assigns_sequential_page_indexes() {
        let store = MangaStore::in_memory().await.unwrap();
        let urls: Vec<String> = (1..=4).map(|i| format!("https://img.example/{i}.png")).collect();

        let outcome = store
            .seed(
                &sample_manga("sample"),
                &NewChapter {
                    number: 1,
                    title: None,
                },
                &urls,
            )
            .await
            .unwrap();
        assert_eq!(outcome.pages, 4);

        let pages = store.pages_for_chapter(outcome.chapter_id).await.unwrap();
        let indexes: Vec<_> = pages.iter().map(|p| p.idx).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4]);
        let stored: Vec<_> = pages.iter().map(|p| p.image_url.clone()).collect();
        assert_eq!(stored, urls);
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict_and_rolls_back() {
        let store = MangaStore::in_memory().await.unwrap();
        let chapter = NewChapter {
            number: 1,
            title: None,
        };

        store.seed(&sample_manga("dup"), &chapter, &[]).await.unwrap();
        let err = store.seed(&sample_manga("dup"), &chapter, &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        assert_eq!(store.count_manga().await.unwrap(), 1);
        let (chapters,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapter")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(chapters, 1);
    }

    #[tokio::test]
    async fn test_demo_seed_only_runs_on_empty_catalog() {
        let store = MangaStore::in_memory().await.unwrap();

        let outcome = store.seed_demo_if_empty().await.unwrap().unwrap();
        assert!(store.seed_demo_if_empty().await.unwrap().is_none());

        let manga = store.manga_by_slug(DEMO_SLUG).await.unwrap().unwrap();
        assert_eq!(manga.id, outcome.manga_id);

        let chapters = store.chapters_for_manga(manga.id).await.unwrap();
        assert_eq!(chapters.len(), 2);
        for chapter in chapters {
            assert_eq!(store.pages_for_chapter(chapter.id).await.unwrap().len(), 5);
        }
    }

    #[tokio::test]
    async fn test_failed_demo_bootstrap_leaves_catalog_empty() {
        let store = MangaStore::in_memory().await.unwrap();
        sqlx::query(
            "CREATE TRIGGER fail_second_chapter BEFORE INSERT ON chapter \
             WHEN NEW.number = 2 BEGIN SELECT RAISE(ABORT, 'chapter rejected'); END",
        )
        .execute(store.pool())
        .await
        .unwrap();

        assert!(store.seed_demo_if_empty().await.is_err());

        assert_eq!(store.count_manga().await.unwrap(), 0);
        let (chapters,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapter")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(chapters, 0);
        let (pages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM page")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(pages, 0);

        // Once the cause is gone the next start seeds normally
        sqlx::query("DROP TRIGGER fail_second_chapter")
            .execute(store.pool())
            .await
            .unwrap();
        let outcome = store.seed_demo_if_empty().await.unwrap().unwrap();
        let chapters = store.chapters_for_manga(outcome.manga_id).await.unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].id, outcome.chapter_id);
    }
}
