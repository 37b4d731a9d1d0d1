//! Request and response shapes for the public API.
//!
//! Persisted records from [`crate::db`] never leave the process directly;
//! each endpoint serializes one of the response types below.
//!
//! # Catalog page
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "id": 1,
//!       "slug": "demo-manga",
//!       "title": "Demo Manga",
//!       "description": "Placeholder manga for frontend dev.",
//!       "cover_url": "https://placehold.co/300x450",
//!       "status": "ongoing",
//!       "like_count": 0
//!     }
//!   ],
//!   "total": 1,
//!   "page": 1,
//!   "page_size": 20,
//!   "pages": 1
//! }
//! ```
//!
//! # Comment submission
//!
//! ```json
//! { "user_name": "Reader", "text": "Great chapter!", "website": "" }
//! ```
//!
//! `website` is a honeypot: real clients leave it empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{Chapter, Comment, Manga, MangaStatus, NewChapter, NewManga, Page, ReadingProgress};
use crate::observability::MetricsSnapshot;

/// `?search=&page=&page_size=` for the catalog, `?page=&page_size=` for comments
///
/// Kept signed so out-of-range values reach field validation instead of
/// failing to parse.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MangaSummary {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub status: MangaStatus,
    pub like_count: i64,
}

impl From<&Manga> for MangaSummary {
    fn from(manga: &Manga) -> Self {
        Self {
            id: manga.id,
            slug: manga.slug.clone(),
            title: manga.title.clone(),
            description: manga.description.clone(),
            cover_url: manga.cover_url.clone(),
            status: manga.status,
            like_count: manga.like_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PaginatedMangaResponse {
    pub items: Vec<MangaSummary>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub pages: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChapterSummary {
    pub id: i64,
    pub number: i64,
    pub title: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl From<&Chapter> for ChapterSummary {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id,
            number: chapter.number,
            title: chapter.title.clone(),
            published_at: chapter.published_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MangaDetail {
    #[serde(flatten)]
    pub summary: MangaSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub chapters: Vec<ChapterSummary>,
}

impl MangaDetail {
    pub fn new(manga: &Manga, chapters: &[Chapter]) -> Self {
        Self {
            summary: MangaSummary::from(manga),
            created_at: manga.created_at,
            updated_at: manga.updated_at,
            chapters: chapters.iter().map(ChapterSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PageOut {
    pub id: i64,
    pub index: i64,
    pub image_url: String,
}

impl From<Page> for PageOut {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            index: page.idx,
            image_url: page.image_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChapterDetail {
    pub id: i64,
    pub manga_id: i64,
    pub number: i64,
    pub title: Option<String>,
    pub like_count: i64,
    pub published_at: DateTime<Utc>,
    pub pages: Vec<PageOut>,
}

impl ChapterDetail {
    pub fn new(chapter: Chapter, pages: Vec<Page>) -> Self {
        Self {
            id: chapter.id,
            manga_id: chapter.manga_id,
            number: chapter.number,
            title: chapter.title,
            like_count: chapter.like_count,
            published_at: chapter.published_at,
            pages: pages.into_iter().map(PageOut::from).collect(),
        }
    }
}

/// Neighbouring chapter for reader navigation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChapterNav {
    pub id: i64,
    pub number: i64,
    pub title: Option<String>,
}

impl From<Chapter> for ChapterNav {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            number: chapter.number,
            title: chapter.title,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct LikeResponse {
    pub like_count: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommentCreate {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Honeypot; hidden from humans, filled in by form bots
    #[serde(default)]
    pub website: Option<String>,
}

impl CommentCreate {
    pub fn is_bot(&self) -> bool {
        self.website.as_deref().is_some_and(|value| !value.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CommentOut {
    pub id: i64,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentOut {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            user_name: comment.user_name,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProgressCreate {
    pub manga_id: i64,
    pub chapter_id: i64,
    #[serde(default = "default_page_index")]
    pub page_index: i64,
}

fn default_page_index() -> i64 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProgressOut {
    pub manga_id: i64,
    pub chapter_id: i64,
    pub page_index: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<ReadingProgress> for ProgressOut {
    fn from(progress: ReadingProgress) -> Self {
        Self {
            manga_id: progress.manga_id,
            chapter_id: progress.chapter_id,
            page_index: progress.page_index,
            updated_at: progress.updated_at,
        }
    }
}

/// Body of `POST /admin/seed`
#[derive(Debug, Deserialize, Clone)]
pub struct SeedRequest {
    pub manga: NewManga,
    pub chapter: NewChapter,
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeedResponse {
    pub manga_id: i64,
    pub chapter_id: i64,
    pub pages: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub counters: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
pub struct DbHealthResponse {
    pub db: String,
}
