//! Stateless request helpers shared by the handlers

use axum::http::HeaderMap;

use crate::db::PageWindow;

pub const USER_TOKEN_HEADER: &str = "x-user-token";
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";
pub const ANONYMOUS_TOKEN: &str = "anonymous";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.page_size)
    }
}

/// Number of pages needed for `total` rows; zero rows means zero pages
pub fn page_count(total: i64, page_size: u32) -> i64 {
    let page_size = i64::from(page_size.max(1));
    (total.max(0) + page_size - 1) / page_size
}

/// Device token from `X-User-Token`, taken verbatim. Only a missing or
/// non-UTF-8 header falls back to "anonymous".
pub fn user_token(headers: &HeaderMap) -> String {
    headers
        .get(USER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(ANONYMOUS_TOKEN)
        .to_string()
}

pub fn admin_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}
