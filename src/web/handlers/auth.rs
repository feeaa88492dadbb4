//! Authentication handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

use crate::auth::verify_credentials;
use crate::web::dto::{LoginRequest, OkResponse, StatusResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{removal_cookie, session_cookie, session_token};

/// POST /api/auth/login - exchange credentials for a session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<OkResponse>), ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    if !verify_credentials(&state.auth, &req.username, &req.password) {
        warn!(username = %req.username, "login failed: invalid credentials");
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = state.sessions.create(&req.username);
    let cookie = session_cookie(token, state.cookie_max_age());
    info!(username = %req.username, "login successful");

    Ok((jar.add(cookie), Json(OkResponse::new())))
}

/// POST /api/auth/logout - revoke the session and clear the cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<OkResponse>) {
    if let Some(token) = session_token(&jar) {
        state.sessions.revoke(&token);
    }

    (jar.remove(removal_cookie()), Json(OkResponse::new()))
}

/// GET /api/auth/status - report auth mode and session validity.
pub async fn status(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<StatusResponse> {
    let auth = state.auth_state();

    Json(StatusResponse {
        auth_enabled: auth.enabled,
        authenticated: auth.is_authenticated(&jar),
    })
}
