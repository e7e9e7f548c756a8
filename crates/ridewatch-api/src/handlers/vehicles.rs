//! Vehicle registration. Users manage their own vehicles; admins see all.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use ridewatch_core::{
    Claims, CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleFilter,
    VehicleRepository,
};

use super::require_text;
use crate::auth::{require_owner_or_admin, RequireAuth};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListVehiclesQuery {
    /// Owner filter; admins only. Users always see their own vehicles.
    pub user_id: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn scoped_filter(claims: &Claims, q: ListVehiclesQuery) -> VehicleFilter {
    VehicleFilter {
        user_id: if claims.is_admin {
            q.user_id
        } else {
            Some(claims.user_id)
        },
        page: ridewatch_core::Page {
            limit: q.limit,
            offset: q.offset,
        },
    }
}

/// Load a vehicle the requester may act on.
pub(crate) async fn load_vehicle(state: &AppState, claims: &Claims, id: i64) -> ApiResult<Vehicle> {
    let vehicle = state.db.vehicles.get(id).await?;
    require_owner_or_admin(claims, vehicle.user_id)?;
    Ok(vehicle)
}

#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Vehicles",
    security(("bearer" = [])),
    params(ListVehiclesQuery),
    responses((status = 200, body = [Vehicle]))
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Query(q): Query<ListVehiclesQuery>,
) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(state.db.vehicles.list(scoped_filter(&claims, q)).await?))
}

#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Vehicles",
    security(("bearer" = [])),
    request_body = CreateVehicleRequest,
    responses((status = 201, body = Vehicle), (status = 400), (status = 409))
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Json(body): Json<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<Vehicle>)> {
    if claims.is_admin {
        return Err(ApiError::Forbidden(
            "vehicles are registered by their owners".to_string(),
        ));
    }
    body.validate()?;
    let vehicle = state.db.vehicles.create(claims.user_id, body).await?;
    info!(
        subsystem = "api",
        op = "create_vehicle",
        user_id = claims.user_id,
        vehicle_id = vehicle.id,
        "Vehicle registered"
    );
    Ok((StatusCode::CREATED, Json(vehicle)))
}

#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    responses((status = 200, body = Vehicle), (status = 403), (status = 404))
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vehicle>> {
    Ok(Json(load_vehicle(&state, &claims, id).await?))
}

#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    request_body = UpdateVehicleRequest,
    responses((status = 200, body = Vehicle), (status = 403), (status = 404))
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
    Json(body): Json<UpdateVehicleRequest>,
) -> ApiResult<Json<Vehicle>> {
    load_vehicle(&state, &claims, id).await?;
    if let Some(plate) = &body.plate_number {
        require_text("plate_number", plate)?;
    }
    Ok(Json(state.db.vehicles.update(id, body).await?))
}

#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Vehicles",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Vehicle id")),
    responses((status = 204), (status = 403), (status = 404))
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    RequireAuth(claims): RequireAuth,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    load_vehicle(&state, &claims, id).await?;
    state.db.vehicles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
