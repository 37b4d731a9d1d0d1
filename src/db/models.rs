//! Persisted records and the inputs used to create them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Publication status of a manga
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MangaStatus {
    #[default]
    Ongoing,
    Completed,
}

impl MangaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MangaStatus::Ongoing => "ongoing",
            MangaStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MangaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown manga status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for MangaStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ongoing" => Ok(MangaStatus::Ongoing),
            "completed" => Ok(MangaStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for MangaStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Manga {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: MangaStatus,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub number: i64,
    pub title: Option<String>,
    pub like_count: i64,
    pub published_at: DateTime<Utc>,
}

/// A single page image; `idx` is 1-based and unique within its chapter
#[derive(Debug, Clone, FromRow)]
pub struct Page {
    pub id: i64,
    pub chapter_id: i64,
    pub idx: i64,
    pub image_url: String,
}

/// What a comment is attached to. Exactly one owner per comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTarget {
    Manga(i64),
    Chapter(i64),
}

impl CommentTarget {
    pub(crate) fn columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            CommentTarget::Manga(id) => (Some(id), None),
            CommentTarget::Chapter(id) => (None, Some(id)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub manga_id: Option<i64>,
    pub chapter_id: Option<i64>,
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn target(&self) -> Option<CommentTarget> {
        match (self.manga_id, self.chapter_id) {
            (Some(id), None) => Some(CommentTarget::Manga(id)),
            (None, Some(id)) => Some(CommentTarget::Chapter(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReadingProgress {
    pub id: i64,
    pub user_token: String,
    pub manga_id: i64,
    pub chapter_id: i64,
    pub page_index: i64,
    pub updated_at: DateTime<Utc>,
}

/// Manga fields accepted by the admin seed
#[derive(Debug, Clone, Deserialize)]
pub struct NewManga {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub status: MangaStatus,
}

/// Chapter fields accepted by the admin seed
#[derive(Debug, Clone, Deserialize)]
pub struct NewChapter {
    pub number: i64,
    #[serde(default)]
    pub title: Option<String>,
}

/// Identifiers produced by one seed transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub manga_id: i64,
    pub chapter_id: i64,
    pub pages: usize,
}

/// LIMIT/OFFSET window for paginated queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    /// Window for a 1-based page number
    pub fn new(page: u32, page_size: u32) -> Self {
        let page = i64::from(page.max(1));
        let page_size = i64::from(page_size);
        Self {
            limit: page_size,
            offset: (page - 1) * page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        assert_eq!("ongoing".parse::<MangaStatus>(), Ok(MangaStatus::Ongoing));
        assert_eq!(MangaStatus::Completed.to_string(), "completed");
        assert!("hiatus".parse::<MangaStatus>().is_err());
    }

    #[test]
    fn test_comment_target_columns() {
        assert_eq!(CommentTarget::Manga(3).columns(), (Some(3), None));
        assert_eq!(CommentTarget::Chapter(7).columns(), (None, Some(7)));
    }

    #[test]
    fn test_page_window_offsets() {
        assert_eq!(PageWindow::new(1, 20), PageWindow { limit: 20, offset: 0 });
        assert_eq!(PageWindow::new(3, 10), PageWindow { limit: 10, offset: 20 });
    }
}
