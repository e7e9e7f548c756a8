//! User registration and profile endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use ridewatch_auth::hash_password;
use ridewatch_core::{CreateUserRequest, UpdateUserRequest, User, UserRepository};

use super::{require_text, PageQuery};
use crate::auth::{require_admin, require_owner_or_admin, RequireAuth};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

pub(crate) fn check_email(email: &str) -> ApiResult<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiError::BadRequest(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, body = User),
        (status = 400, description = "Invalid input or weak password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    require_text("name", &body.name)?;
    check_email(&body.email)?;
    let password_hash = hash_password(&body.password)?;

    let user = state
        .db
        .users
        .create(CreateUserRequest {
            name: body.name.trim().to_string(),
            email: body.email.trim().to_string(),
            phone: body.phone.filter(|p| !p.trim().is_empty()),
            password_hash,
        })
        .await?;
    info!(subsystem = "api", op = "register_user", user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses((status = 200, body = User), (status = 401))
)]
pub async fn get_me(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
) -> ApiResult<Json<User>> {
    if claims.is_admin {
        return Err(ApiError::Forbidden(
            "admin accounts have no user profile".to_string(),
        ));
    }
    Ok(Json(state.db.users.get(claims.user_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses((status = 200, body = User), (status = 403), (status = 404))
)]
pub async fn get_user(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    require_owner_or_admin(&claims, id)?;
    Ok(Json(state.db.users.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer" = [])),
    params(PageQuery),
    responses((status = 200, body = [User]), (status = 403))
)]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<User>>> {
    require_admin(&claims)?;
    Ok(Json(state.db.users.list(page.into()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses((status = 200, body = User), (status = 403), (status = 404))
)]
pub async fn update_user(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    require_owner_or_admin(&claims, id)?;
    if let Some(name) = &body.name {
        require_text("name", name)?;
    }
    Ok(Json(state.db.users.update(id, body).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_owner_or_admin(&claims, id)?;
    state.db.users.delete(id).await?;
    info!(
        subsystem = "api",
        op = "delete_user",
        user_id = id,
        is_admin = claims.is_admin,
        "User deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
