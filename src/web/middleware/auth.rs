//! Session authentication middleware.
//!
//! Protected routers are wrapped with [`require_session`]: requests
//! without a valid session cookie are answered with 401 and a `needAuth`
//! flag before any handler runs. When authentication is disabled the
//! gate passes everything through untouched.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::SessionStore;
use crate::web::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "filegate_session";

/// Shared state of the authentication gate.
#[derive(Clone)]
pub struct AuthState {
    /// Whether authentication is enabled at all.
    pub enabled: bool,
    /// Store consulted for cookie tokens.
    pub sessions: Arc<dyn SessionStore>,
}

impl AuthState {
    /// Whether the cookies in `jar` identify a live session.
    ///
    /// Always true when authentication is disabled. A positive answer
    /// slides the session's expiry window.
    pub fn is_authenticated(&self, jar: &CookieJar) -> bool {
        if !self.enabled {
            return true;
        }
        match session_token(jar) {
            Some(token) => self.sessions.validate(&token),
            None => false,
        }
    }
}

/// Extract the session token from a cookie jar.
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// Build the session cookie set on login.
pub fn session_cookie(token: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Build the cookie used to clear the session on logout.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}

/// Middleware gating a router behind a valid session.
pub async fn require_session(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(request).await;
    }

    let jar = CookieJar::from_headers(request.headers());
    if !auth.is_authenticated(&jar) {
        return ApiError::auth_required().into_response();
    }

    next.run(request).await
}
