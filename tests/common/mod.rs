//! Test helpers for Web API tests.
//!
//! Builds an in-process TestServer over a temporary file tree, with
//! authentication either enabled or disabled.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use filegate::web::handlers::AppState;
use filegate::web::router::{create_health_router, create_router};
use filegate::Config;

/// Username accepted by auth-enabled test servers.
pub const TEST_USERNAME: &str = "admin";

/// Password accepted by auth-enabled test servers.
pub const TEST_PASSWORD: &str = "hunter2";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "filegate_session";

/// Create a test configuration rooted at `root`.
pub fn create_test_config(root: &Path, with_auth: bool) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.files.root_path = root.display().to_string();
    config.files.max_upload_size_mb = 1;

    if with_auth {
        config.auth.username = TEST_USERNAME.to_string();
        config.auth.password = TEST_PASSWORD.to_string();
    }

    config
}

/// Create a test server over a fresh temporary root directory.
///
/// The TempDir must be kept alive for the duration of the test.
pub fn create_test_server(with_auth: bool) -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(temp_dir.path(), with_auth);

    let state = Arc::new(AppState::new(&config).expect("Failed to create app state"));
    let router = create_router(state, &[]).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, temp_dir)
}

/// Log in with the test credentials and return the session cookie.
pub async fn login(server: &TestServer) -> Cookie<'static> {
    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "username": TEST_USERNAME,
            "password": TEST_PASSWORD
        }))
        .await;

    response.assert_status_ok();
    response.cookie(SESSION_COOKIE)
}

/// Write a file below the served root, creating parent directories.
pub fn write_file(root: &Path, relative: &str, data: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    std::fs::write(path, data).expect("Failed to write file");
}

/// Deterministic non-repeating byte pattern of the given length.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
