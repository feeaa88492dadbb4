//! API error handling for the Web API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::FilegateError;

/// JSON body of an error reply.
///
/// `needAuth` is only present on replies that should send the client to
/// the login screen, so a 401 for a missing session is distinguishable
/// from other 401 causes.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Set when the client must (re-)authenticate.
    #[serde(rename = "needAuth", skip_serializing_if = "is_false")]
    pub need_auth: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    need_auth: bool,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            need_auth: false,
        }
    }

    /// Create a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Create the "no valid session" error carrying the `needAuth` flag.
    pub fn auth_required() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
            need_auth: true,
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Create an internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Status code this error replies with.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            need_auth: self.need_auth,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<FilegateError> for ApiError {
    fn from(err: FilegateError) -> Self {
        match &err {
            FilegateError::InvalidPath(_) => ApiError::bad_request("Invalid path"),
            FilegateError::AuthRequired => ApiError::auth_required(),
            FilegateError::NotStreamable(name) => {
                ApiError::bad_request(format!("Cannot stream a directory: {name}"))
            }
            FilegateError::RangeNotSatisfiable { .. } => {
                ApiError::new(StatusCode::RANGE_NOT_SATISFIABLE, err.to_string())
            }
            FilegateError::NotFound(_) => ApiError::not_found(err.to_string()),
            FilegateError::Validation(msg) => ApiError::bad_request(msg.clone()),
            FilegateError::Io(_) | FilegateError::Config(_) => {
                tracing::error!("internal error: {err}");
                ApiError::internal(err.to_string())
            }
        }
    }
}
