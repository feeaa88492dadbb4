//! API handlers for the Web API.

pub mod auth;
pub mod files;

pub use auth::*;
pub use files::*;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{MemorySessionStore, SessionStore};
use crate::config::{AuthConfig, Config};
use crate::sandbox::PathSandbox;
use crate::web::middleware::AuthState;
use crate::Result;

/// Application state shared across handlers.
pub struct AppState {
    /// Sandbox every client path is resolved through.
    pub sandbox: PathSandbox,
    /// Session store backing the auth gate.
    pub sessions: Arc<dyn SessionStore>,
    /// Credential configuration.
    pub auth: AuthConfig,
    /// Maximum upload size per file, in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Build application state from configuration.
    ///
    /// Creates the root directory if missing and an in-memory session
    /// store with the configured sliding expiry.
    pub fn new(config: &Config) -> Result<Self> {
        let sandbox = PathSandbox::new(&config.files.root_path)?;
        let ttl = Duration::from_secs(config.auth.session_ttl_days * 24 * 60 * 60);

        Ok(Self {
            sandbox,
            sessions: Arc::new(MemorySessionStore::with_ttl(ttl)),
            auth: config.auth.clone(),
            max_upload_size: config.files.max_upload_size_mb * 1024 * 1024,
        })
    }

    /// State handed to the authentication gate.
    pub fn auth_state(&self) -> AuthState {
        AuthState {
            enabled: self.auth.enabled(),
            sessions: self.sessions.clone(),
        }
    }

    /// Max-Age for the session cookie.
    pub fn cookie_max_age(&self) -> time::Duration {
        time::Duration::days(self.auth.session_ttl_days as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_app_state_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.files.root_path = temp_dir.path().join("root").display().to_string();
        config.files.max_upload_size_mb = 2;

        let state = AppState::new(&config).unwrap();
        assert!(state.sandbox.root().exists());
        assert_eq!(state.max_upload_size, 2 * 1024 * 1024);
        assert!(!state.auth_state().enabled);
        assert_eq!(state.cookie_max_age(), time::Duration::days(7));
    }
}
