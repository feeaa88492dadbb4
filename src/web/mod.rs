//! Web API module for filegate.
//!
//! REST endpoints for authentication and file management, plus the
//! streaming endpoint media players point at.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
