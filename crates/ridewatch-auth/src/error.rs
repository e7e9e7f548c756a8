//! Error types for authentication operations.

use thiserror::Error;

/// Result alias for authentication operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Authentication errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token signature is valid but `exp` has passed.
    #[error("Token expired")]
    Expired,

    /// Token is malformed, has a bad signature, or carries bad claims.
    #[error("Invalid token: {0}")]
    Invalid(String),

    /// Signing secret shorter than the required minimum.
    #[error("Signing secret too short (minimum {0} bytes required)")]
    WeakSecret(usize),

    /// Token lifetime is zero or longer than the supported maximum.
    #[error("Token lifetime out of range: {0}s")]
    TtlOutOfRange(u64),

    /// Password shorter than the required minimum.
    #[error("Password too short (minimum {0} characters required)")]
    WeakPassword(usize),

    /// Hashing or encoding failed.
    #[error("Hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for ridewatch_core::Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Expired | AuthError::Invalid(_) => {
                ridewatch_core::Error::Unauthenticated(err.to_string())
            }
            AuthError::WeakPassword(_) => ridewatch_core::Error::Validation(err.to_string()),
            AuthError::WeakSecret(_) | AuthError::TtlOutOfRange(_) => {
                ridewatch_core::Error::Config(err.to_string())
            }
            AuthError::Hashing(_) => ridewatch_core::Error::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_map_to_unauthenticated() {
        let err: ridewatch_core::Error = AuthError::Expired.into();
        assert!(matches!(err, ridewatch_core::Error::Unauthenticated(_)));

        let err: ridewatch_core::Error = AuthError::Invalid("bad signature".into()).into();
        assert!(matches!(err, ridewatch_core::Error::Unauthenticated(_)));
    }

    #[test]
    fn test_weak_password_maps_to_validation() {
        let err: ridewatch_core::Error = AuthError::WeakPassword(8).into();
        assert!(matches!(err, ridewatch_core::Error::Validation(_)));
        assert!(err.to_string().contains("minimum 8"));
    }

    #[test]
    fn test_ttl_out_of_range_maps_to_config() {
        let err: ridewatch_core::Error = AuthError::TtlOutOfRange(0).into();
        assert!(matches!(err, ridewatch_core::Error::Config(_)));
    }
}
