//! Authentication for filegate.
//!
//! Credentials are a single username/password pair from configuration;
//! successful logins are tracked as in-memory sessions with a sliding
//! expiry, correlated to clients through an opaque cookie token.

pub mod session;

pub use session::{MemorySessionStore, Session, SessionStore, DEFAULT_SESSION_TTL_SECS};

use crate::config::AuthConfig;

/// Check a login attempt against the configured credential pair.
///
/// With authentication disabled every attempt succeeds.
pub fn verify_credentials(auth: &AuthConfig, username: &str, password: &str) -> bool {
    if !auth.enabled() {
        return true;
    }
    username == auth.username && password == auth.password
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_auth() -> AuthConfig {
        AuthConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            session_ttl_days: 7,
        }
    }

    #[test]
    fn test_verify_credentials_match() {
        let auth = enabled_auth();
        assert!(verify_credentials(&auth, "admin", "hunter2"));
    }

    #[test]
    fn test_verify_credentials_mismatch() {
        let auth = enabled_auth();
        assert!(!verify_credentials(&auth, "admin", "wrong"));
        assert!(!verify_credentials(&auth, "other", "hunter2"));
        assert!(!verify_credentials(&auth, "", ""));
    }

    #[test]
    fn test_verify_credentials_disabled_auth_accepts_anything() {
        let auth = AuthConfig::default();
        assert!(verify_credentials(&auth, "anyone", "anything"));
    }
}
