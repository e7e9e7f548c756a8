//! Camera registry. Any authenticated caller reads; admins write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use ridewatch_core::{Camera, CameraRepository, CreateCameraRequest, UpdateCameraRequest};

use super::PageQuery;
use crate::auth::{require_admin, RequireAuth};
use crate::{ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/cameras",
    tag = "Cameras",
    security(("bearer" = [])),
    params(PageQuery),
    responses((status = 200, body = [Camera]))
)]
pub async fn list_cameras(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Camera>>> {
    Ok(Json(state.db.cameras.list(page.into()).await?))
}

#[utoipa::path(
    post,
    path = "/api/cameras",
    tag = "Cameras",
    security(("bearer" = [])),
    request_body = CreateCameraRequest,
    responses((status = 201, body = Camera), (status = 400), (status = 403))
)]
pub async fn create_camera(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<CreateCameraRequest>,
) -> ApiResult<(StatusCode, Json<Camera>)> {
    require_admin(&claims)?;
    body.validate()?;
    let camera = state.db.cameras.create(body).await?;
    info!(subsystem = "api", op = "create_camera", camera_id = camera.id, "Camera registered");
    Ok((StatusCode::CREATED, Json(camera)))
}

#[utoipa::path(
    get,
    path = "/api/cameras/{id}",
    tag = "Cameras",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Camera id")),
    responses((status = 200, body = Camera), (status = 404))
)]
pub async fn get_camera(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Camera>> {
    Ok(Json(state.db.cameras.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/cameras/{id}",
    tag = "Cameras",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Camera id")),
    request_body = UpdateCameraRequest,
    responses((status = 200, body = Camera), (status = 400), (status = 403), (status = 404))
)]
pub async fn update_camera(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCameraRequest>,
) -> ApiResult<Json<Camera>> {
    require_admin(&claims)?;
    let current = state.db.cameras.get(id).await?;
    body.validate(&current)?;
    Ok(Json(state.db.cameras.update(id, body).await?))
}

#[utoipa::path(
    delete,
    path = "/api/cameras/{id}",
    tag = "Cameras",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Camera id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_camera(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&claims)?;
    state.db.cameras.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
