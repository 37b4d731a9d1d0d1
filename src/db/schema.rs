//! Table and index definitions.
//!
//! Every statement uses IF NOT EXISTS, so `create_schema` is safe to run on
//! each startup.

use sqlx::SqlitePool;

use super::error::Result;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS manga (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT,
        cover_url TEXT,
        status TEXT NOT NULL DEFAULT 'ongoing' CHECK (status IN ('ongoing', 'completed')),
        like_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        -- Unicode-lowercased copies for search; SQLite LIKE only folds ASCII
        title_search TEXT NOT NULL DEFAULT '',
        description_search TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chapter (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        manga_id INTEGER NOT NULL,
        number INTEGER NOT NULL,
        title TEXT,
        like_count INTEGER NOT NULL DEFAULT 0,
        published_at TEXT NOT NULL,
        FOREIGN KEY (manga_id) REFERENCES manga(id) ON DELETE CASCADE,
        UNIQUE (manga_id, number)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS page (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        chapter_id INTEGER NOT NULL,
        idx INTEGER NOT NULL CHECK (idx >= 1),
        image_url TEXT NOT NULL,
        FOREIGN KEY (chapter_id) REFERENCES chapter(id) ON DELETE CASCADE,
        UNIQUE (chapter_id, idx)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comment (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        manga_id INTEGER,
        chapter_id INTEGER,
        user_name TEXT NOT NULL DEFAULT 'Anonymous',
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (manga_id) REFERENCES manga(id) ON DELETE CASCADE,
        FOREIGN KEY (chapter_id) REFERENCES chapter(id) ON DELETE CASCADE,
        CHECK ((manga_id IS NULL) <> (chapter_id IS NULL))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reading_progress (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_token TEXT NOT NULL,
        manga_id INTEGER NOT NULL,
        chapter_id INTEGER NOT NULL,
        page_index INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (manga_id) REFERENCES manga(id) ON DELETE CASCADE,
        FOREIGN KEY (chapter_id) REFERENCES chapter(id) ON DELETE CASCADE,
        UNIQUE (user_token, manga_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_chapter_manga ON chapter(manga_id)",
    "CREATE INDEX IF NOT EXISTS idx_comment_manga ON comment(manga_id)",
    "CREATE INDEX IF NOT EXISTS idx_comment_chapter ON comment(chapter_id)",
];

/// Creates all tables and indexes required by the API.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::debug!(statements = STATEMENTS.len(), "Schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_create_schema_is_idempotent() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_schema(&pool).await.unwrap();
        create_schema(&pool).await.unwrap();

        for table in ["manga", "chapter", "page", "comment", "reading_progress"] {
            let query = format!("SELECT COUNT(*) FROM {table}");
            let (count,): (i64,) = sqlx::query_as(&query).fetch_one(&pool).await.unwrap();
            assert_eq!(count, 0);
        }
    }
}
