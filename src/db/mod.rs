//! SQLite persistence for the manga catalog
//!
//! `MangaStore` wraps a `sqlx` connection pool. Queries are grouped by
//! resource:
//!
//! - `catalog`: manga listing/search, chapter and page lookups, like counters
//! - `comments`: append-only comments attached to a manga or a chapter
//! - `progress`: per-device reading progress (one row per token and manga)
//! - `seed`: transactional bulk insert of manga, chapter and pages
//!
//! ## Usage
//!
//! ```rust,ignore
//! use otaku::db::MangaStore;
//!
//! let store = MangaStore::connect(&config.database).await?;
//! let manga = store.manga_by_slug("demo-manga").await?;
//! ```

mod catalog;
mod comments;
pub mod error;
pub mod models;
mod progress;
mod schema;
mod seed;
mod store;

pub use catalog::Direction;
pub use error::{DbError, Result};
pub use models::{
    Chapter, Comment, CommentTarget, Manga, MangaStatus, NewChapter, NewManga, Page, PageWindow,
    ReadingProgress, SeedOutcome,
};
pub use seed::DEMO_SLUG;
pub use store::MangaStore;
