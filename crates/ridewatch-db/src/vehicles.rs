//! Vehicle repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    CreateVehicleRequest, Error, Result, UpdateVehicleRequest, Vehicle, VehicleFilter,
    VehicleRepository,
};

use crate::{classify, expect_one};

const VEHICLE_COLUMNS: &str = "id, user_id, plate_number, brand, model, color, created_at";

fn plate_conflict(err: sqlx::Error) -> Error {
    match classify(err) {
        Error::Conflict(_) => Error::Conflict("plate number already registered".to_string()),
        other => other,
    }
}

/// PostgreSQL implementation of VehicleRepository.
#[derive(Clone)]
pub struct PgVehicleRepository {
    pool: Pool<Postgres>,
}

impl PgVehicleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn create(&self, user_id: i64, req: CreateVehicleRequest) -> Result<Vehicle> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "INSERT INTO vehicle (user_id, plate_number, brand, model, color)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            VEHICLE_COLUMNS
        ))
        .bind(user_id)
        .bind(req.plate_number.trim())
        .bind(&req.brand)
        .bind(&req.model)
        .bind(&req.color)
        .fetch_one(&self.pool)
        .await
        .map_err(plate_conflict)
    }

    async fn get(&self, id: i64) -> Result<Vehicle> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicle WHERE id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::not_found("vehicle", id))
    }

    async fn list(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicle
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
             ORDER BY id
             LIMIT $2 OFFSET $3",
            VEHICLE_COLUMNS
        ))
        .bind(filter.user_id)
        .bind(clamp_limit(filter.page.limit))
        .bind(filter.page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, id: i64, req: UpdateVehicleRequest) -> Result<Vehicle> {
        sqlx::query_as::<_, Vehicle>(&format!(
            "UPDATE vehicle
             SET plate_number = COALESCE($2, plate_number),
                 brand = COALESCE($3, brand),
                 model = COALESCE($4, model),
                 color = COALESCE($5, color)
             WHERE id = $1
             RETURNING {}",
            VEHICLE_COLUMNS
        ))
        .bind(id)
        .bind(req.plate_number.as_deref().map(str::trim))
        .bind(&req.brand)
        .bind(&req.model)
        .bind(&req.color)
        .fetch_optional(&self.pool)
        .await
        .map_err(plate_conflict)?
        .ok_or_else(|| Error::not_found("vehicle", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM vehicle WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "vehicle", id)
    }
}
