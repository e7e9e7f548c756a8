//! HTTP error translation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ridewatch_auth::AuthError;

/// Error returned by handlers. Every variant renders as
/// `{"error": "<message>"}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ridewatch_core::Error> for ApiError {
    fn from(err: ridewatch_core::Error) -> Self {
        use ridewatch_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            other => {
                // Internal detail stays in the log, not the response.
                tracing::error!(error = %other, "Unhandled error");
                ApiError::Internal("internal server error".to_string())
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ridewatch_core::Error::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridewatch_core::Error;

    #[test]
    fn test_core_errors_map_to_status() {
        let cases = [
            (Error::NotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (Error::Validation("x".into()), StatusCode::BAD_REQUEST),
            (Error::Conflict("x".into()), StatusCode::CONFLICT),
            (Error::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::Serialization("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let err = ApiError::from(Error::Config("secret path /etc/x".into()));
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn test_auth_errors_are_unauthorized() {
        assert_eq!(
            ApiError::from(AuthError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::WeakPassword(8)).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
