//! Error types for ridewatch.

use thiserror::Error;

/// Result type alias using ridewatch's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ridewatch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authenticated but not authorized
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed or out-of-policy field value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness violation or row-count mismatch
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, invalid, or expired credentials
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a `NotFound` naming the entity kind and id.
    pub fn not_found(kind: &str, id: i64) -> Self {
        Error::NotFound(format!("{} {} not found", kind, id))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("lost report 42".to_string());
        assert_eq!(err.to_string(), "Not found: lost report 42");
    }

    #[test]
    fn test_not_found_helper() {
        let err = Error::not_found("camera", 7);
        assert_eq!(err.to_string(), "Not found: camera 7 not found");
    }

    #[test]
    fn test_error_display_forbidden() {
        let err = Error::Forbidden("not the report owner".to_string());
        assert_eq!(err.to_string(), "Forbidden: not the report owner");
    }

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("timestamp in the future".to_string());
        assert_eq!(err.to_string(), "Validation error: timestamp in the future");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = Error::Conflict("email already registered".to_string());
        assert_eq!(err.to_string(), "Conflict: email already registered");
    }

    #[test]
    fn test_error_display_unauthenticated() {
        let err = Error::Unauthenticated("token expired".to_string());
        assert_eq!(err.to_string(), "Unauthenticated: token expired");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
