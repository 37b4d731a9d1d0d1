use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::error::ApiError;
use super::models::{CommentCreate, FieldError, ListParams, ProgressCreate, SeedRequest};
use super::utils::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Pagination};

pub const COMMENT_MIN_LENGTH: usize = 2;
pub const COMMENT_MAX_LENGTH: usize = 2000;
pub const USER_NAME_MAX_LENGTH: usize = 50;
pub const DEFAULT_USER_NAME: &str = "Anonymous";

/// Links in comments: explicit schemes, `www.`, or a bare `name.tld` token
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(https?://|www\.|[a-z0-9-]+\.(com|org|net|io|co|dev|app|xyz|info|biz|me))")
        .expect("URL pattern is a valid regex")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Comment must be at least {} characters", COMMENT_MIN_LENGTH)]
    TextTooShort,
    #[error("Comment must not exceed {} characters", COMMENT_MAX_LENGTH)]
    TextTooLong,
    #[error("Links are not allowed in comments")]
    LinkInText,
    #[error("Username must not exceed {} characters", USER_NAME_MAX_LENGTH)]
    UserNameTooLong,
    #[error("Links are not allowed in username")]
    LinkInUserName,
    #[error("page must be at least 1")]
    PageOutOfRange,
    #[error("page_size must be between 1 and {}", MAX_PAGE_SIZE)]
    PageSizeOutOfRange,
    #[error("page_index must be at least 1")]
    PageIndexOutOfRange,
    #[error("slug must not be empty or contain whitespace")]
    InvalidSlug,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("chapter number must not be negative")]
    NegativeChapterNumber,
    #[error("page {0} has an empty image url")]
    EmptyPageUrl(usize),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TextTooShort
            | ValidationError::TextTooLong
            | ValidationError::LinkInText => "text",
            ValidationError::UserNameTooLong | ValidationError::LinkInUserName => "user_name",
            ValidationError::PageOutOfRange => "page",
            ValidationError::PageSizeOutOfRange => "page_size",
            ValidationError::PageIndexOutOfRange => "page_index",
            ValidationError::InvalidSlug => "manga.slug",
            ValidationError::EmptyTitle => "manga.title",
            ValidationError::NegativeChapterNumber => "chapter.number",
            ValidationError::EmptyPageUrl(_) => "pages",
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError::new(err.field(), err.to_string())
    }
}

/// Turns collected violations into the API error, or passes `value` through
fn finish<T>(value: T, violations: Vec<ValidationError>) -> Result<T, ApiError> {
    if violations.is_empty() {
        Ok(value)
    } else {
        Err(ApiError::Validation(
            violations.into_iter().map(FieldError::from).collect(),
        ))
    }
}

pub fn contains_link(value: &str) -> bool {
    URL_PATTERN.is_match(value)
}

/// Comment fields after trimming and defaulting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanComment {
    pub user_name: String,
    pub text: String,
}

pub fn clean_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    let length = text.chars().count();

    if length < COMMENT_MIN_LENGTH {
        return Err(ValidationError::TextTooShort);
    }
    if length > COMMENT_MAX_LENGTH {
        return Err(ValidationError::TextTooLong);
    }
    if contains_link(text) {
        return Err(ValidationError::LinkInText);
    }

    Ok(text.to_string())
}

pub fn clean_user_name(user_name: Option<&str>) -> Result<String, ValidationError> {
    let user_name = user_name.map(str::trim).unwrap_or_default();
    if user_name.is_empty() {
        return Ok(DEFAULT_USER_NAME.to_string());
    }

    if user_name.chars().count() > USER_NAME_MAX_LENGTH {
        return Err(ValidationError::UserNameTooLong);
    }
    if contains_link(user_name) {
        return Err(ValidationError::LinkInUserName);
    }

    Ok(user_name.to_string())
}

/// Validate both comment fields, reporting every violation at once
pub fn validate_comment(payload: &CommentCreate) -> Result<CleanComment, ApiError> {
    let text = clean_text(&payload.text);
    let user_name = clean_user_name(payload.user_name.as_deref());

    match (text, user_name) {
        (Ok(text), Ok(user_name)) => Ok(CleanComment { user_name, text }),
        (text, user_name) => Err(ApiError::Validation(
            [text.err(), user_name.err()]
                .into_iter()
                .flatten()
                .map(FieldError::from)
                .collect(),
        )),
    }
}

/// What a honeypot submission gets echoed back as: trimmed, never validated
pub fn echo_comment(payload: &CommentCreate) -> CleanComment {
    let user_name = payload
        .user_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_USER_NAME);

    CleanComment {
        user_name: user_name.to_string(),
        text: payload.text.trim().to_string(),
    }
}

/// `page >= 1`, `1 <= page_size <= 100`, page size defaults to 20
pub fn validate_list_params(params: &ListParams) -> Result<Pagination, ApiError> {
    let mut violations = Vec::new();

    let page = params.page.unwrap_or(1);
    if page < 1 || page > i64::from(u32::MAX) {
        violations.push(ValidationError::PageOutOfRange);
    }

    let page_size = params.page_size.unwrap_or(i64::from(DEFAULT_PAGE_SIZE));
    if !(1..=i64::from(MAX_PAGE_SIZE)).contains(&page_size) {
        violations.push(ValidationError::PageSizeOutOfRange);
    }

    finish((), violations)?;
    Ok(Pagination::new(page as u32, page_size as u32))
}

pub fn validate_progress(payload: &ProgressCreate) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    if payload.page_index < 1 {
        violations.push(ValidationError::PageIndexOutOfRange);
    }

    finish((), violations)
}

pub fn validate_seed(payload: &SeedRequest) -> Result<(), ApiError> {
    let mut violations = Vec::new();

    let slug = payload.manga.slug.as_str();
    if slug.is_empty() || slug.chars().any(char::is_whitespace) {
        violations.push(ValidationError::InvalidSlug);
    }

    if payload.manga.title.trim().is_empty() {
        violations.push(ValidationError::EmptyTitle);
    }

    if payload.chapter.number < 0 {
        violations.push(ValidationError::NegativeChapterNumber);
    }

    for (position, url) in payload.pages.iter().enumerate() {
        if url.trim().is_empty() {
            violations.push(ValidationError::EmptyPageUrl(position + 1));
        }
    }

    finish((), violations)
}
