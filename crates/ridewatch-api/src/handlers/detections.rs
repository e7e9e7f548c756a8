//! Camera sightings. Written by the ingest pipeline under admin credentials.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use ridewatch_core::{
    validate_incident_time, CreateDetectedRequest, Detected, DetectedFilter, DetectedRepository,
    Page,
};

use crate::auth::{require_admin, RequireAuth};
use crate::{ApiResult, AppState};

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListDetectionsQuery {
    pub camera_id: Option<i64>,
    pub is_suspect: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/detections",
    tag = "Detections",
    security(("bearer" = [])),
    params(ListDetectionsQuery),
    responses((status = 200, body = [Detected]))
)]
pub async fn list_detections(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Query(q): Query<ListDetectionsQuery>,
) -> ApiResult<Json<Vec<Detected>>> {
    let filter = DetectedFilter {
        camera_id: q.camera_id,
        is_suspect: q.is_suspect,
        page: Page {
            limit: q.limit,
            offset: q.offset,
        },
    };
    Ok(Json(state.db.detections.list(filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/detections",
    tag = "Detections",
    security(("bearer" = [])),
    request_body = CreateDetectedRequest,
    responses((status = 201, body = Detected), (status = 400), (status = 403))
)]
pub async fn create_detection(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<CreateDetectedRequest>,
) -> ApiResult<(StatusCode, Json<Detected>)> {
    require_admin(&claims)?;
    validate_incident_time(body.timestamp, Utc::now())?;
    let detected = state.db.detections.create(body).await?;
    info!(
        subsystem = "api",
        op = "create_detection",
        detected_id = detected.id,
        camera_id = detected.camera_id,
        "Detection recorded"
    );
    Ok((StatusCode::CREATED, Json(detected)))
}

#[utoipa::path(
    get,
    path = "/api/detections/{id}",
    tag = "Detections",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Detection id")),
    responses((status = 200, body = Detected), (status = 404))
)]
pub async fn get_detection(
    State(state): State<AppState>,
    RequireAuth(_claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Detected>> {
    Ok(Json(state.db.detections.get(id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/detections/{id}",
    tag = "Detections",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Detection id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_detection(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&claims)?;
    state.db.detections.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
