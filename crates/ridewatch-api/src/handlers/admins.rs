//! Admin account management. Admin-only.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use ridewatch_auth::hash_password;
use ridewatch_core::{Admin, AdminRepository, CreateAdminRequest};

use super::users::check_email;
use super::{require_text, PageQuery};
use crate::auth::{require_admin, RequireAuth};
use crate::{ApiResult, AppState};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/admins",
    tag = "Admins",
    security(("bearer" = [])),
    request_body = RegisterAdminRequest,
    responses((status = 201, body = Admin), (status = 403), (status = 409))
)]
pub async fn create_admin(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<RegisterAdminRequest>,
) -> ApiResult<(StatusCode, Json<Admin>)> {
    require_admin(&claims)?;
    require_text("name", &body.name)?;
    check_email(&body.email)?;
    let password_hash = hash_password(&body.password)?;

    let admin = state
        .db
        .admins
        .create(CreateAdminRequest {
            name: body.name.trim().to_string(),
            email: body.email.trim().to_string(),
            password_hash,
        })
        .await?;
    info!(
        subsystem = "api",
        op = "create_admin",
        user_id = claims.user_id,
        admin_id = admin.id,
        "Admin created"
    );
    Ok((StatusCode::CREATED, Json(admin)))
}

#[utoipa::path(
    get,
    path = "/api/admins",
    tag = "Admins",
    security(("bearer" = [])),
    params(PageQuery),
    responses((status = 200, body = [Admin]), (status = 403))
)]
pub async fn list_admins(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Admin>>> {
    require_admin(&claims)?;
    Ok(Json(state.db.admins.list(page.into()).await?))
}
