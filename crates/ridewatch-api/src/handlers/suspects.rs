//! Matcher output. Admins write; report owners read their own.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use ridewatch_core::{
    Claims, CreateSuspectRequest, LostReportRepository, Suspect, SuspectRepository,
};

use crate::auth::{require_admin, require_owner_or_admin, RequireAuth};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSuspectsQuery {
    /// Lost report whose suspects to list.
    pub lost_id: Option<i64>,
}

async fn authorize_report(state: &AppState, claims: &Claims, lost_id: i64) -> ApiResult<()> {
    let owner = state
        .db
        .lost_reports
        .owner_of(lost_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("lost report {} not found", lost_id)))?;
    require_owner_or_admin(claims, owner)
}

#[utoipa::path(
    get,
    path = "/api/suspects",
    tag = "Suspects",
    security(("bearer" = [])),
    params(ListSuspectsQuery),
    responses((status = 200, body = [Suspect]), (status = 400), (status = 403), (status = 404))
)]
pub async fn list_suspects(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Query(q): Query<ListSuspectsQuery>,
) -> ApiResult<Json<Vec<Suspect>>> {
    let lost_id = q
        .lost_id
        .ok_or_else(|| ApiError::BadRequest("lost_id query parameter is required".to_string()))?;
    authorize_report(&state, &claims, lost_id).await?;
    Ok(Json(state.db.suspects.list_for_report(lost_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/suspects",
    tag = "Suspects",
    security(("bearer" = [])),
    request_body = CreateSuspectRequest,
    responses((status = 201, body = Suspect), (status = 400), (status = 403), (status = 409))
)]
pub async fn create_suspect(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<CreateSuspectRequest>,
) -> ApiResult<(StatusCode, Json<Suspect>)> {
    require_admin(&claims)?;
    body.validate()?;
    let suspect = state.db.suspects.create(body).await?;
    info!(
        subsystem = "api",
        op = "create_suspect",
        suspect_id = suspect.id,
        lost_id = suspect.lost_id,
        rank = suspect.rank,
        "Suspect recorded"
    );
    Ok((StatusCode::CREATED, Json(suspect)))
}

#[utoipa::path(
    get,
    path = "/api/suspects/{id}",
    tag = "Suspects",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Suspect id")),
    responses((status = 200, body = Suspect), (status = 403), (status = 404))
)]
pub async fn get_suspect(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Suspect>> {
    let suspect = state.db.suspects.get(id).await?;
    authorize_report(&state, &claims, suspect.lost_id).await?;
    Ok(Json(suspect))
}

#[utoipa::path(
    delete,
    path = "/api/suspects/{id}",
    tag = "Suspects",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Suspect id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_suspect(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&claims)?;
    state.db.suspects.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
