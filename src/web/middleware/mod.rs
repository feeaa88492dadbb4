//! Middleware for the Web API.

pub mod auth;
pub mod cors;
pub mod security;

pub use auth::{
    removal_cookie, require_session, session_cookie, session_token, AuthState, SESSION_COOKIE,
};
pub use cors::create_cors_layer;
pub use security::security_headers;
