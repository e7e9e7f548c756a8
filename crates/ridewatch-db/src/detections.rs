//! Detection repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    CreateDetectedRequest, Detected, DetectedFilter, DetectedRepository, Error, Result,
};

use crate::{classify, expect_one};

const DETECTED_COLUMNS: &str =
    "id, camera_id, timestamp, person_image_id, motorcycle_image_id, is_suspect, created_at";

/// PostgreSQL implementation of DetectedRepository.
#[derive(Clone)]
pub struct PgDetectedRepository {
    pool: Pool<Postgres>,
}

impl PgDetectedRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DetectedRepository for PgDetectedRepository {
    async fn create(&self, req: CreateDetectedRequest) -> Result<Detected> {
        sqlx::query_as::<_, Detected>(&format!(
            "INSERT INTO detected (camera_id, timestamp, person_image_id, motorcycle_image_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            DETECTED_COLUMNS
        ))
        .bind(req.camera_id)
        .bind(req.timestamp)
        .bind(req.person_image_id)
        .bind(req.motorcycle_image_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)
    }

    async fn get(&self, id: i64) -> Result<Detected> {
        sqlx::query_as::<_, Detected>(&format!(
            "SELECT {} FROM detected WHERE id = $1",
            DETECTED_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::not_found("detection", id))
    }

    async fn list(&self, filter: DetectedFilter) -> Result<Vec<Detected>> {
        sqlx::query_as::<_, Detected>(&format!(
            "SELECT {} FROM detected
             WHERE ($1::BIGINT IS NULL OR camera_id = $1)
               AND ($2::BOOLEAN IS NULL OR is_suspect = $2)
             ORDER BY timestamp DESC, id DESC
             LIMIT $3 OFFSET $4",
            DETECTED_COLUMNS
        ))
        .bind(filter.camera_id)
        .bind(filter.is_suspect)
        .bind(clamp_limit(filter.page.limit))
        .bind(filter.page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM detected WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "detection", id)
    }
}
