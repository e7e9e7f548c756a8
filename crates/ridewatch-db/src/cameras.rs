//! Camera repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    Camera, CameraRepository, CreateCameraRequest, Error, Page, Result, UpdateCameraRequest,
};

use crate::{classify, expect_one};

const CAMERA_COLUMNS: &str = "id, name, latitude, longitude, address, is_active, created_at";

/// PostgreSQL implementation of CameraRepository.
#[derive(Clone)]
pub struct PgCameraRepository {
    pool: Pool<Postgres>,
}

impl PgCameraRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CameraRepository for PgCameraRepository {
    async fn create(&self, req: CreateCameraRequest) -> Result<Camera> {
        let camera = sqlx::query_as::<_, Camera>(&format!(
            "INSERT INTO camera (name, latitude, longitude, address, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CAMERA_COLUMNS
        ))
        .bind(req.name.trim())
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.address)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        info!(subsystem = "db", component = "cameras", op = "create", camera_id = camera.id, "Camera registered");
        Ok(camera)
    }

    async fn get(&self, id: i64) -> Result<Camera> {
        sqlx::query_as::<_, Camera>(&format!("SELECT {} FROM camera WHERE id = $1", CAMERA_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::not_found("camera", id))
    }

    async fn list(&self, page: Page) -> Result<Vec<Camera>> {
        sqlx::query_as::<_, Camera>(&format!(
            "SELECT {} FROM camera ORDER BY id LIMIT $1 OFFSET $2",
            CAMERA_COLUMNS
        ))
        .bind(clamp_limit(page.limit))
        .bind(page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, id: i64, req: UpdateCameraRequest) -> Result<Camera> {
        sqlx::query_as::<_, Camera>(&format!(
            "UPDATE camera
             SET name = COALESCE($2, name),
                 latitude = COALESCE($3, latitude),
                 longitude = COALESCE($4, longitude),
                 address = COALESCE($5, address),
                 is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {}",
            CAMERA_COLUMNS
        ))
        .bind(id)
        .bind(req.name.as_deref().map(str::trim))
        .bind(req.latitude)
        .bind(req.longitude)
        .bind(&req.address)
        .bind(req.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or_else(|| Error::not_found("camera", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM camera WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "camera", id)
    }
}
