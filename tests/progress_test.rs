mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::*;

const TOKEN: &str = "device-1";

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn as_device(request: Request<Body>) -> Request<Body> {
    with_header(request, "x-user-token", TOKEN)
}

#[tokio::test]
async fn test_missing_progress_is_null() {
    let (app, store) = build_test_app().await;
    let seeded = seed_manga(&store, "fresh", "Fresh", None).await;

    let (status, body) = send(&app, as_device(get(&format!("/api/v1/progress/{}", seeded.manga_id)))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_saving_twice_keeps_one_row_with_latest_values() {
    let (app, store) = build_test_app().await;
    let seeded = seed_manga(&store, "reread", "Reread", None).await;
    let second = store
        .add_chapter(seeded.manga_id, 2, None, &page_urls("reread", 2, 4))
        .await
        .unwrap();

    let first_save = json!({ "manga_id": seeded.manga_id, "chapter_id": seeded.chapter_id, "page_index": 3 });
    let (status, body) = send(&app, as_device(post_json("/api/v1/progress/", &first_save))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["page_index"], 3);

    let second_save = json!({ "manga_id": seeded.manga_id, "chapter_id": second, "page_index": 2 });
    let (status, body) = send(&app, as_device(post_json("/api/v1/progress", &second_save))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["chapter_id"], second);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reading_progress")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let (_, body) = send(&app, as_device(get(&format!("/api/v1/progress/{}", seeded.manga_id)))).await;
    assert_eq!(body["manga_id"], seeded.manga_id);
    assert_eq!(body["chapter_id"], second);
    assert_eq!(body["page_index"], 2);

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["counters"]["progress_saved"], 2);
}

#[tokio::test]
async fn test_progress_is_scoped_to_user_token() {
    let (app, store) = build_test_app().await;
    let seeded = seed_manga(&store, "shared", "Shared", None).await;
    let uri = format!("/api/v1/progress/{}", seeded.manga_id);

    // No header means the shared "anonymous" token
    let payload = json!({ "manga_id": seeded.manga_id, "chapter_id": seeded.chapter_id });
    let (status, body) = send(&app, post_json("/api/v1/progress/", &payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["page_index"], 1);

    let (_, body) = send(&app, get(&uri)).await;
    assert_eq!(body["chapter_id"], seeded.chapter_id);

    let request = with_header(get(&uri), "x-user-token", "anonymous");
    let (_, body) = send(&app, request).await;
    assert_eq!(body["chapter_id"], seeded.chapter_id);

    let (_, body) = send(&app, as_device(get(&uri))).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_progress_rejects_unknown_references() {
    let (app, store) = build_test_app().await;
    let seeded = seed_manga(&store, "mine", "Mine", None).await;
    let other = seed_manga(&store, "theirs", "Theirs", None).await;

    let unknown_manga = json!({ "manga_id": 9999, "chapter_id": seeded.chapter_id });
    let (status, body) = send(&app, as_device(post_json("/api/v1/progress/", &unknown_manga))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Manga not found");

    let foreign_chapter = json!({ "manga_id": seeded.manga_id, "chapter_id": other.chapter_id });
    let (status, body) = send(&app, as_device(post_json("/api/v1/progress/", &foreign_chapter))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Chapter not found");

    let bad_page = json!({ "manga_id": seeded.manga_id, "chapter_id": seeded.chapter_id, "page_index": 0 });
    let (status, body) = send(&app, as_device(post_json("/api/v1/progress/", &bad_page))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "page_index");

    let missing_field = json!({ "manga_id": seeded.manga_id });
    let (status, _) = send(&app, as_device(post_json("/api/v1/progress/", &missing_field))).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_delete_progress_is_idempotent() {
    let (app, store) = build_test_app().await;
    let seeded = seed_manga(&store, "done", "Done", None).await;
    let uri = format!("/api/v1/progress/{}", seeded.manga_id);

    let payload = json!({ "manga_id": seeded.manga_id, "chapter_id": seeded.chapter_id, "page_index": 2 });
    let (status, _) = send(&app, as_device(post_json("/api/v1/progress/", &payload))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, as_device(delete(&uri))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, body) = send(&app, as_device(get(&uri))).await;
    assert!(body.is_null());

    let (status, _) = send(&app, as_device(delete(&uri))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Unknown manga is still a no-op
    let (status, _) = send(&app, as_device(delete("/api/v1/progress/9999"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
