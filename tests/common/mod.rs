#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use otaku::api::{self, AppState};
use otaku::config::{Config, DEV_ADMIN_SEED_KEY};
use otaku::db::{MangaStatus, MangaStore, NewChapter, NewManga, SeedOutcome};

/// Router over a fresh in-memory store; the store handle is returned for direct setup
pub async fn build_test_app() -> (Router, MangaStore) {
    build_test_app_with(Config::default()).await
}

pub async fn build_test_app_with(config: Config) -> (Router, MangaStore) {
    let store = MangaStore::in_memory()
        .await
        .expect("Failed to open in-memory store");
    let state = AppState::new(config, store.clone());

    (api::router(state), store)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body is not JSON")
    };

    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn with_header(mut request: Request<Body>, name: &'static str, value: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(name, value.parse().unwrap());
    request
}

pub fn admin(request: Request<Body>) -> Request<Body> {
    with_header(request, "x-admin-key", DEV_ADMIN_SEED_KEY)
}

pub fn page_urls(slug: &str, chapter: i64, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("https://img.example/{slug}/{chapter}/{i}.png"))
        .collect()
}

/// Insert a manga with one chapter straight into the store
pub async fn seed_manga(
    store: &MangaStore,
    slug: &str,
    title: &str,
    description: Option<&str>,
) -> SeedOutcome {
    let manga = NewManga {
        slug: slug.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        cover_url: None,
        status: MangaStatus::Ongoing,
    };
    let chapter = NewChapter {
        number: 1,
        title: Some("Chapter 1".to_string()),
    };

    store
        .seed(&manga, &chapter, &page_urls(slug, 1, 3))
        .await
        .expect("Failed to seed manga")
}
