//! Bearer-token authentication.
//!
//! Usage:
//! ```ignore
//! async fn my_handler(RequireAuth(claims): RequireAuth) -> ApiResult<Json<Thing>> {
//!     require_admin(&claims)?;
//!     // ... handler logic
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use ridewatch_core::Claims;

use crate::error::ApiError;
use crate::AppState;

/// Extractor that requires a valid bearer token and yields its claims.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Claims);

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let claims = state.tokens.validate(token).map_err(|e| {
            tracing::debug!(subsystem = "api", component = "auth", error = %e, "Token rejected");
            ApiError::from(e)
        })?;

        Ok(RequireAuth(claims))
    }
}

pub fn require_admin(claims: &Claims) -> Result<(), ApiError> {
    if !claims.is_admin {
        return Err(ApiError::Forbidden("admin access required".to_string()));
    }
    Ok(())
}

/// Owner of the resource or an admin.
pub fn require_owner_or_admin(claims: &Claims, owner_id: i64) -> Result<(), ApiError> {
    if !claims.can_view(owner_id) {
        return Err(ApiError::Forbidden(
            "not permitted to access this resource".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn claims(user_id: i64, is_admin: bool) -> Claims {
        Claims {
            user_id,
            is_admin,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_admin_gate() {
        assert!(require_admin(&claims(1, true)).is_ok());
        assert!(matches!(
            require_admin(&claims(1, false)),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn test_admin_id_does_not_grant_ownership() {
        assert!(require_owner_or_admin(&claims(7, false), 7).is_ok());
        assert!(require_owner_or_admin(&claims(8, false), 7).is_err());
        assert!(require_owner_or_admin(&claims(8, true), 7).is_ok());
    }
}
