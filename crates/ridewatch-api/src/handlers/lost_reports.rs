//! Lost report endpoints.
//!
//! `PATCH` runs the authorization policy, merges the permitted fields into
//! the stored report, and persists the result. A request that changes
//! nothing is answered with the stored report and never reaches the
//! database write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use ridewatch_core::{
    aggregate_result, decide_report_mutation, merge_report, Claims, CreateLostReportRequest, Error,
    LostReport, LostReportFilter, LostReportRepository, LostStatus, Page, ReportField,
    ReportUpdate, ResultView, VehicleRepository,
};

use crate::auth::{require_owner_or_admin, RequireAuth};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListLostReportsQuery {
    /// Owner filter; admins only.
    pub user_id: Option<i64>,
    pub status: Option<LostStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn scoped_filter(claims: &Claims, q: ListLostReportsQuery) -> LostReportFilter {
    LostReportFilter {
        user_id: if claims.is_admin {
            q.user_id
        } else {
            Some(claims.user_id)
        },
        status: q.status,
        page: Page {
            limit: q.limit,
            offset: q.offset,
        },
    }
}

/// The vehicle named by a report must exist and belong to the report's owner.
async fn check_vehicle_owner(state: &AppState, vehicle_id: i64, owner_id: i64) -> ApiResult<()> {
    let vehicle = match state.db.vehicles.get(vehicle_id).await {
        Ok(vehicle) => vehicle,
        Err(Error::NotFound(_)) => {
            return Err(ApiError::BadRequest(format!(
                "vehicle {} does not exist",
                vehicle_id
            )))
        }
        Err(e) => return Err(e.into()),
    };
    if vehicle.user_id != owner_id {
        return Err(ApiError::Forbidden(format!(
            "vehicle {} is not registered to the report owner",
            vehicle_id
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/lost-reports",
    tag = "Lost Reports",
    security(("bearer" = [])),
    params(ListLostReportsQuery),
    responses((status = 200, body = [LostReport]))
)]
pub async fn list_lost_reports(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Query(q): Query<ListLostReportsQuery>,
) -> ApiResult<Json<Vec<LostReport>>> {
    Ok(Json(state.db.lost_reports.list(scoped_filter(&claims, q)).await?))
}

#[utoipa::path(
    post,
    path = "/api/lost-reports",
    tag = "Lost Reports",
    security(("bearer" = [])),
    request_body = CreateLostReportRequest,
    responses((status = 201, body = LostReport), (status = 400), (status = 403))
)]
pub async fn create_lost_report(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<CreateLostReportRequest>,
) -> ApiResult<(StatusCode, Json<LostReport>)> {
    if claims.is_admin {
        return Err(ApiError::Forbidden(
            "lost reports are filed by vehicle owners".to_string(),
        ));
    }
    body.validate(Utc::now())?;
    check_vehicle_owner(&state, body.vehicle_id, claims.user_id).await?;

    let report = state.db.lost_reports.create(claims.user_id, body).await?;
    info!(
        subsystem = "api",
        op = "create_lost_report",
        user_id = claims.user_id,
        lost_id = report.id,
        "Lost report filed"
    );
    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/lost-reports/{id}",
    tag = "Lost Reports",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Lost report id")),
    responses((status = 200, body = LostReport), (status = 403), (status = 404))
)]
pub async fn get_lost_report(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<LostReport>> {
    let report = state.db.lost_reports.get(id).await?;
    require_owner_or_admin(&claims, report.user_id)?;
    Ok(Json(report))
}

#[utoipa::path(
    patch,
    path = "/api/lost-reports/{id}",
    tag = "Lost Reports",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Lost report id")),
    request_body = ReportUpdate,
    responses(
        (status = 200, body = LostReport, description = "Updated report, or the stored report when nothing changed"),
        (status = 400, description = "Future timestamp, blank address, or unknown vehicle"),
        (status = 403, description = "No attempted change is permitted"),
        (status = 404)
    )
)]
pub async fn update_lost_report(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
    Json(update): Json<ReportUpdate>,
) -> ApiResult<Json<LostReport>> {
    let existing = state.db.lost_reports.get(id).await?;
    let decision = decide_report_mutation(&claims, &existing, &update, Utc::now())?.into_result()?;

    if decision.is_noop() {
        debug!(
            subsystem = "api",
            op = "update_lost_report",
            lost_id = id,
            user_id = claims.user_id,
            "No changes; write skipped"
        );
        return Ok(Json(existing));
    }

    if decision.allows(ReportField::VehicleId) {
        if let Some(vehicle_id) = update.vehicle_id {
            check_vehicle_owner(&state, vehicle_id, existing.user_id).await?;
        }
    }

    let merged = merge_report(&existing, &update, &decision);
    let saved = state.db.lost_reports.replace(&merged).await?;

    info!(
        subsystem = "api",
        op = "update_lost_report",
        lost_id = id,
        user_id = claims.user_id,
        is_admin = claims.is_admin,
        allowed_count = decision.allowed_fields.len(),
        "Lost report updated"
    );
    Ok(Json(saved))
}

#[utoipa::path(
    delete,
    path = "/api/lost-reports/{id}",
    tag = "Lost Reports",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Lost report id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_lost_report(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let owner = state
        .db
        .lost_reports
        .owner_of(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("lost report {} not found", id)))?;
    if !claims.owns(owner) {
        return Err(ApiError::Forbidden(
            "only the reporting user may delete a lost report".to_string(),
        ));
    }
    state.db.lost_reports.delete(id).await?;
    info!(
        subsystem = "api",
        op = "delete_lost_report",
        lost_id = id,
        user_id = claims.user_id,
        "Lost report deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/lost-reports/{id}/result",
    tag = "Lost Reports",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Lost report id")),
    responses((status = 200, body = ResultView), (status = 403), (status = 404))
)]
pub async fn get_lost_report_result(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<ResultView>> {
    Ok(Json(aggregate_result(&state.db, id, &claims).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims(user_id: i64, is_admin: bool) -> Claims {
        Claims {
            user_id,
            is_admin,
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[test]
    fn test_list_scope() {
        let q = ListLostReportsQuery {
            user_id: Some(3),
            status: Some(LostStatus::Open),
            ..Default::default()
        };
        let user = scoped_filter(&claims(9, false), q);
        assert_eq!(user.user_id, Some(9));
        assert_eq!(user.status, Some(LostStatus::Open));
        assert_eq!(scoped_filter(&claims(1, true), q).user_id, Some(3));
    }

    #[test]
    fn test_list_query_parses_status() {
        let q: ListLostReportsQuery =
            serde_json::from_str(r#"{"status": "processing", "limit": 5}"#).unwrap();
        assert_eq!(q.status, Some(LostStatus::Processing));
        assert_eq!(q.limit, Some(5));
    }
}
