//! Manga, chapter and page queries, plus like counters

use tracing::debug;

use super::error::Result;
use super::models::{Chapter, Manga, Page, PageWindow};
use super::store::MangaStore;

const MANGA_COLUMNS: &str =
    "id, slug, title, description, cover_url, status, like_count, created_at, updated_at";
const CHAPTER_COLUMNS: &str = "id, manga_id, number, title, like_count, published_at";

/// Which neighbour of a chapter to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Lowercases the term the same way stored `*_search` columns are, then
/// escapes LIKE wildcards so user input matches literally
fn like_pattern(search: &str) -> String {
    let search = search.to_lowercase();
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl MangaStore {
    /// Page through the catalog, optionally filtered by a case-insensitive
    /// substring of title or description. Returns the page and the total
    /// number of matching rows.
    pub async fn search_manga(
        &self,
        search: Option<&str>,
        window: PageWindow,
    ) -> Result<(Vec<Manga>, i64)> {
        let search = search.filter(|s| !s.is_empty());

        let (total, items) = match search {
            Some(term) => {
                let pattern = like_pattern(term);
                let filter = "WHERE title_search LIKE ? ESCAPE '\\' \
                              OR description_search LIKE ? ESCAPE '\\'";

                let (total,): (i64,) =
                    sqlx::query_as(&format!("SELECT COUNT(*) FROM manga {filter}"))
                        .bind(&pattern)
                        .bind(&pattern)
                        .fetch_one(self.pool())
                        .await?;

                let items = sqlx::query_as::<_, Manga>(&format!(
                    "SELECT {MANGA_COLUMNS} FROM manga {filter} ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(&pattern)
                .bind(&pattern)
                .bind(window.limit)
                .bind(window.offset)
                .fetch_all(self.pool())
                .await?;

                (total, items)
            }
            None => {
                let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM manga")
                    .fetch_one(self.pool())
                    .await?;

                let items = sqlx::query_as::<_, Manga>(&format!(
                    "SELECT {MANGA_COLUMNS} FROM manga ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(window.limit)
                .bind(window.offset)
                .fetch_all(self.pool())
                .await?;

                (total, items)
            }
        };

        debug!(?search, total, returned = items.len(), "Catalog query");
        Ok((items, total))
    }

    pub async fn manga_by_slug(&self, slug: &str) -> Result<Option<Manga>> {
        let manga = sqlx::query_as::<_, Manga>(&format!(
            "SELECT {MANGA_COLUMNS} FROM manga WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        Ok(manga)
    }

    pub async fn manga_exists(&self, manga_id: i64) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM manga WHERE id = ?")
            .bind(manga_id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.is_some())
    }

    pub async fn count_manga(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM manga")
            .fetch_one(self.pool())
            .await?;

        Ok(count)
    }

    /// Chapters of a manga in reading order
    pub async fn chapters_for_manga(&self, manga_id: i64) -> Result<Vec<Chapter>> {
        let chapters = sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter WHERE manga_id = ? ORDER BY number ASC"
        ))
        .bind(manga_id)
        .fetch_all(self.pool())
        .await?;

        Ok(chapters)
    }

    pub async fn chapter_by_id(&self, chapter_id: i64) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter WHERE id = ?"
        ))
        .bind(chapter_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(chapter)
    }

    /// Pages of a chapter in display order
    pub async fn pages_for_chapter(&self, chapter_id: i64) -> Result<Vec<Page>> {
        let pages = sqlx::query_as::<_, Page>(
            "SELECT id, chapter_id, idx, image_url FROM page WHERE chapter_id = ? ORDER BY idx ASC",
        )
        .bind(chapter_id)
        .fetch_all(self.pool())
        .await?;

        Ok(pages)
    }

    /// Closest chapter of the same manga with a higher (`Next`) or lower
    /// (`Prev`) chapter number
    pub async fn adjacent_chapter(
        &self,
        current: &Chapter,
        direction: Direction,
    ) -> Result<Option<Chapter>> {
        let (comparison, order) = match direction {
            Direction::Next => (">", "ASC"),
            Direction::Prev => ("<", "DESC"),
        };

        let chapter = sqlx::query_as::<_, Chapter>(&format!(
            "SELECT {CHAPTER_COLUMNS} FROM chapter \
             WHERE manga_id = ? AND number {comparison} ? \
             ORDER BY number {order} LIMIT 1"
        ))
        .bind(current.manga_id)
        .bind(current.number)
        .fetch_optional(self.pool())
        .await?;

        Ok(chapter)
    }

    /// Increment a manga's like counter. Returns the new count, or `None`
    /// when no manga has this slug.
    pub async fn like_manga(&self, slug: &str) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE manga SET like_count = COALESCE(like_count, 0) + 1, updated_at = ? \
             WHERE slug = ? RETURNING like_count",
        )
        .bind(chrono::Utc::now())
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(count,)| count))
    }

    /// Increment a chapter's like counter. Returns the new count, or `None`
    /// when the chapter does not exist.
    pub async fn like_chapter(&self, chapter_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE chapter SET like_count = COALESCE(like_count, 0) + 1 \
             WHERE id = ? RETURNING like_count",
        )
        .bind(chapter_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(count,)| count))
    }
}
