//! Session token management.
//!
//! Sessions live in memory only; a process restart logs everyone out.
//! Expiry is sliding (activity resets the clock) and enforced lazily at
//! validation time rather than by a background sweep.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::RngCore;
use tracing::{debug, info};

/// Default session lifetime: 7 days of inactivity.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Number of random bytes in a session token (128 bits of entropy).
const TOKEN_BYTES: usize = 16;

/// A logged-in session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Username the session was created for.
    pub owner: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last successful validation; drives the sliding expiry.
    last_seen: Instant,
}

impl Session {
    fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            created_at: Utc::now(),
            last_seen: Instant::now(),
        }
    }

    /// Whether the session has been idle longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.last_seen.elapsed() > ttl
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}

/// Server-side store of active sessions.
///
/// Implementations must be safe to share across concurrent requests;
/// every operation is atomic with respect to concurrent callers.
pub trait SessionStore: Send + Sync {
    /// Create a session for `owner` and return its opaque token.
    fn create(&self, owner: &str) -> String;

    /// Validate a token, refreshing its expiry window on success.
    ///
    /// Unknown and expired tokens both return false; an expired entry is
    /// removed on this first failed lookup.
    fn validate(&self, token: &str) -> bool;

    /// Remove a session. Idempotent.
    fn revoke(&self, token: &str);
}

/// In-memory [`SessionStore`] behind a mutex-guarded map.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Create a store with the default 7-day sliding expiry.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    /// Create a store with a custom sliding expiry.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of sessions currently held, including not-yet-reaped
    /// expired entries.
    pub fn session_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate a 32-hex-character token from 128 bits of CSPRNG output.
    ///
    /// With this entropy budget a collision across live sessions is
    /// negligible; no explicit collision check is made.
    fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        let mut token = String::with_capacity(TOKEN_BYTES * 2);
        for byte in bytes {
            token.push_str(&format!("{byte:02x}"));
        }
        token
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, owner: &str) -> String {
        let token = Self::generate_token();
        self.lock().insert(token.clone(), Session::new(owner));
        info!(owner = %owner, "session created");
        token
    }

    fn validate(&self, token: &str) -> bool {
        let mut sessions = self.lock();
        match sessions.get_mut(token) {
            Some(session) if !session.is_expired(self.ttl) => {
                session.touch();
                true
            }
            Some(_) => {
                sessions.remove(token);
                debug!("session expired");
                false
            }
            None => false,
        }
    }

    fn revoke(&self, token: &str) {
        if self.lock().remove(token).is_some() {
            info!("session revoked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread::sleep;

    #[test]
    fn test_create_and_validate() {
        let store = MemorySessionStore::new();

        let token = store.create("admin");
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(store.validate(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = MemorySessionStore::new();

        let first = store.create("admin");
        let second = store.create("admin");
        assert_ne!(first, second);
        assert_eq!(store.session_count(), 2);
    }

    #[test]
    fn test_validate_unknown_token() {
        let store = MemorySessionStore::new();
        assert!(!store.validate("deadbeefdeadbeefdeadbeefdeadbeef"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let store = MemorySessionStore::new();

        let token = store.create("admin");
        store.revoke(&token);
        assert!(!store.validate(&token));

        // A second revoke of the same token is a no-op.
        store.revoke(&token);
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_expiry_is_lazy() {
        let store = MemorySessionStore::with_ttl(Duration::from_millis(20));

        let token = store.create("admin");
        sleep(Duration::from_millis(40));

        // Entry is still held until the first failed validation reaps it.
        assert_eq!(store.session_count(), 1);
        assert!(!store.validate(&token));
        assert_eq!(store.session_count(), 0);
    }

    #[test]
    fn test_validation_slides_the_expiry_window() {
        let store = MemorySessionStore::with_ttl(Duration::from_millis(80));

        let token = store.create("admin");

        // Keep validating at half the TTL; the session must outlive
        // several multiples of the TTL measured from creation.
        for _ in 0..5 {
            sleep(Duration::from_millis(40));
            assert!(store.validate(&token));
        }

        sleep(Duration::from_millis(120));
        assert!(!store.validate(&token));
    }

    #[test]
    fn test_valid_before_ttl_invalid_after() {
        let store = MemorySessionStore::with_ttl(Duration::from_millis(60));

        let token = store.create("admin");
        sleep(Duration::from_millis(20));
        assert!(store.validate(&token));

        sleep(Duration::from_millis(100));
        assert!(!store.validate(&token));
    }

    #[test]
    fn test_concurrent_logins_and_validations() {
        let store = Arc::new(MemorySessionStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let owner = format!("user{i}");
                    let token = store.create(&owner);
                    for _ in 0..100 {
                        assert!(store.validate(&token));
                    }
                    token
                })
            })
            .collect();

        let tokens: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(store.session_count(), 8);
        for token in tokens {
            assert!(store.validate(&token));
        }
    }
}
