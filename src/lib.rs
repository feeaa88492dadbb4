//! Filegate - a sandboxed remote file manager.
//!
//! Serves a single directory tree over HTTP: directory listing, upload,
//! download, copy, move, rename, delete, and media streaming with HTTP
//! range support, optionally gated behind a cookie session.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod sandbox;
pub mod stream;
pub mod web;

pub use auth::{MemorySessionStore, Session, SessionStore};
pub use config::Config;
pub use error::{FilegateError, Result};
pub use sandbox::PathSandbox;
pub use web::{AppState, WebServer};
