use std::net::SocketAddr;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    decompression::RequestDecompressionLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use uuid::Uuid;

use super::{services, state::AppState};
use crate::config::{Config, CorsConfig};
use crate::db::MangaStore;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Time-ordered `x-request-id` values
#[derive(Clone, Copy, Debug, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// `*` allows any origin without credentials. An explicit origin list allows
/// credentials and mirrors whatever methods and headers the preflight asks for.
fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    if cors.allows_any() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = AllowOrigin::list(
        cors.allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok()),
    );

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Full application router with middleware attached
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config.server.max_body_bytes;
    let cors = cors_layer(&state.config.cors);

    Router::new()
        // Both spellings of the collection paths are in use by clients
        .route("/api/v1/manga", get(services::list_manga))
        .route("/api/v1/manga/", get(services::list_manga))
        .route("/api/v1/manga/{slug}", get(services::get_manga))
        .route("/api/v1/manga/{slug}/like", post(services::like_manga))
        .route(
            "/api/v1/manga/{slug}/comments",
            get(services::list_manga_comments).post(services::create_manga_comment),
        )
        .route("/api/v1/chapters/{id}", get(services::get_chapter))
        .route("/api/v1/chapters/{id}/like", post(services::like_chapter))
        .route("/api/v1/chapters/{id}/next", get(services::next_chapter))
        .route("/api/v1/chapters/{id}/prev", get(services::prev_chapter))
        .route(
            "/api/v1/chapters/{id}/comments",
            get(services::list_chapter_comments).post(services::create_chapter_comment),
        )
        .route("/api/v1/progress", post(services::save_progress))
        .route("/api/v1/progress/", post(services::save_progress))
        .route(
            "/api/v1/progress/{manga_id}",
            get(services::get_progress).delete(services::delete_progress),
        )
        .route("/admin/seed", post(services::seed_content))
        .route("/health", get(services::health))
        .route("/db-health", get(services::db_health))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(RequestDecompressionLayer::new()),
        )
}

/// Open the store, bootstrap demo content if asked to, and serve until a
/// shutdown signal arrives
pub async fn run(config: Config, address: Option<SocketAddr>) -> Result<(), AnyError> {
    let address = address.unwrap_or(config.server.bind_addr);
    info!(env = ?config.server.env, %address, "Starting otaku API");

    let store = MangaStore::connect(&config.database)
        .await
        .map_err(|e| format!("Failed to open database: {e}"))?;

    if config.database.seed_demo {
        store.seed_demo_if_empty().await?;
    }

    let state = AppState::new(config, store.clone());
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "otaku API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Database pool closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
