//! Login endpoints for users and admins.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ridewatch_auth::verify_login;
use ridewatch_core::{AdminRepository, Credentials, UserRepository};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

fn check_credentials(found: Option<Credentials>, password: &str) -> ApiResult<i64> {
    let verified = verify_login(password, found.as_ref().map(|c| c.password_hash.as_str()));
    match found {
        Some(creds) if verified => Ok(creds.id),
        _ => Err(ApiError::Unauthorized("invalid email or password".to_string())),
    }
}

fn issue(state: &AppState, id: i64, is_admin: bool) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens.issue(id, is_admin)?;
    Ok(Json(TokenResponse {
        token,
        expires_in: state.tokens.ttl_secs(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Wrong email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let found = state.db.users.find_credentials(body.email.trim()).await?;
    let user_id = check_credentials(found, &body.password).map_err(|e| {
        warn!(subsystem = "api", component = "auth", op = "login", "Login failed");
        e
    })?;
    info!(subsystem = "api", component = "auth", op = "login", user_id, "User logged in");
    issue(&state, user_id, false)
}

#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Wrong email or password")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let found = state.db.admins.find_credentials(body.email.trim()).await?;
    let admin_id = check_credentials(found, &body.password).map_err(|e| {
        warn!(subsystem = "api", component = "auth", op = "admin_login", "Admin login failed");
        e
    })?;
    info!(
        subsystem = "api",
        component = "auth",
        op = "admin_login",
        user_id = admin_id,
        is_admin = true,
        "Admin logged in"
    );
    issue(&state, admin_id, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ridewatch_auth::hash_password;

    #[test]
    fn test_check_credentials() {
        let hash = hash_password("correct horse").unwrap();
        let creds = || {
            Some(Credentials {
                id: 5,
                password_hash: hash.clone(),
            })
        };
        assert_eq!(check_credentials(creds(), "correct horse").unwrap(), 5);
        assert!(matches!(
            check_credentials(creds(), "wrong horse"),
            Err(ApiError::Unauthorized(_))
        ));
        assert!(check_credentials(None, "correct horse").is_err());
    }

    #[test]
    fn test_token_response_uses_camel_case() {
        let body = serde_json::to_value(TokenResponse {
            token: "t".to_string(),
            expires_in: 60,
        })
        .unwrap();
        assert_eq!(body["expiresIn"], 60);
    }
}
