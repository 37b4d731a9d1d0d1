use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

use super::error::Result;
use super::schema::create_schema;

/// SQLite-backed store for the manga catalog, comments and reading progress
///
/// Each method borrows a pooled connection for the duration of one statement
/// or one transaction; nothing is held across calls.
#[derive(Clone)]
pub struct MangaStore {
    pool: SqlitePool,
}

impl MangaStore {
    /// Connect to the configured database and ensure the schema exists
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(url = %config.url, "Opening SQLite store");

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool).await?;
        info!("SQLite store opened successfully");
        Ok(store)
    }

    /// Fresh in-memory database with the full schema (tests and demos)
    ///
    /// A single long-lived connection keeps the database alive.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating tables if needed
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        create_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip `SELECT 1` to prove the database is reachable
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_in_memory_store_pings() {
        let store = MangaStore::in_memory().await.unwrap();
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_creates_database_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("otaku.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 2,
            seed_demo: false,
        };

        let store = MangaStore::connect(&config).await.unwrap();
        store.ping().await.unwrap();
        store.close().await;

        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_ping_fails_after_close() {
        let store = MangaStore::in_memory().await.unwrap();
        store.close().await;
        assert!(store.ping().await.is_err());
    }
}
