//! Error types for filegate.

use thiserror::Error;

/// Common error type for filegate.
#[derive(Error, Debug)]
pub enum FilegateError {
    /// Client-supplied path is malformed or escapes the sandbox root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Request lacks a valid session.
    #[error("authentication required")]
    AuthRequired,

    /// A directory was requested where a regular file is required.
    #[error("not streamable: {0}")]
    NotStreamable(String),

    /// A Range header could not be satisfied against the file size.
    #[error("range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable {
        /// Total size of the resource the range was checked against.
        size: u64,
    },

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filegate operations.
pub type Result<T> = std::result::Result<T, FilegateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_display() {
        let err = FilegateError::InvalidPath("../secret".to_string());
        assert_eq!(err.to_string(), "invalid path: ../secret");
    }

    #[test]
    fn test_auth_required_display() {
        assert_eq!(
            FilegateError::AuthRequired.to_string(),
            "authentication required"
        );
    }

    #[test]
    fn test_range_not_satisfiable_display() {
        let err = FilegateError::RangeNotSatisfiable { size: 1000 };
        assert_eq!(
            err.to_string(),
            "range not satisfiable for resource of 1000 bytes"
        );
    }

    #[test]
    fn test_not_found_display() {
        let err = FilegateError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: FilegateError = io_err.into();
        assert!(matches!(err, FilegateError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FilegateError::AuthRequired)
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
