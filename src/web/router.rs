//! Router configuration for the Web API.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    copy_entry, create_dir, delete_entry, download, list, login, logout, move_entry, rename,
    status, stream_file, upload, AppState,
};
use super::middleware::{create_cors_layer, require_session, security_headers};

/// Create the main API router.
pub fn create_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/status", get(status));

    // Uploads pass through the body limit before the handler sees them;
    // leave headroom above the per-file cap for multipart framing.
    let body_limit = (state.max_upload_size as usize).saturating_add(1024 * 1024);

    let file_routes = Router::new()
        .route("/list", get(list))
        .route("/download", get(download))
        .route("/stream", get(stream_file))
        .route("/upload", post(upload))
        .route("/rename", post(rename))
        .route("/move", post(move_entry))
        .route("/copy", post(copy_entry))
        .route("/create-dir", post(create_dir))
        .route("/delete", delete(delete_entry))
        .layer(middleware::from_fn_with_state(
            state.auth_state(),
            require_session,
        ))
        .layer(DefaultBodyLimit::max(body_limit));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(security_headers)),
        )
        .with_state(state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use tempfile::TempDir;

    #[test]
    fn test_create_router() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.files.root_path = temp_dir.path().display().to_string();

        let state = Arc::new(AppState::new(&config).unwrap());
        let _router = create_router(state, &[]);
    }

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }
}
