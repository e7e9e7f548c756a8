//! Suspect repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use ridewatch_core::{
    CreateSuspectRequest, Error, Result, Suspect, SuspectMatch, SuspectRepository,
};

use crate::{classify, expect_one};

const SUSPECT_COLUMNS: &str =
    "id, detected_id, lost_id, person_score, motor_score, final_score, rank, created_at";

/// PostgreSQL implementation of SuspectRepository.
#[derive(Clone)]
pub struct PgSuspectRepository {
    pool: Pool<Postgres>,
}

impl PgSuspectRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SuspectRepository for PgSuspectRepository {
    async fn create(&self, req: CreateSuspectRequest) -> Result<Suspect> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let suspect = sqlx::query_as::<_, Suspect>(&format!(
            "INSERT INTO suspect (detected_id, lost_id, person_score, motor_score, final_score, rank)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            SUSPECT_COLUMNS
        ))
        .bind(req.detected_id)
        .bind(req.lost_id)
        .bind(req.person_score)
        .bind(req.motor_score)
        .bind(req.final_score)
        .bind(req.rank)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match classify(e) {
            Error::Conflict(_) => Error::Conflict(format!(
                "detection {} is already a suspect for lost report {}",
                req.detected_id, req.lost_id
            )),
            other => other,
        })?;

        sqlx::query("UPDATE detected SET is_suspect = TRUE WHERE id = $1")
            .bind(req.detected_id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "suspects",
            op = "create",
            suspect_id = suspect.id,
            lost_id = suspect.lost_id,
            detected_id = suspect.detected_id,
            "Suspect recorded"
        );
        Ok(suspect)
    }

    async fn get(&self, id: i64) -> Result<Suspect> {
        sqlx::query_as::<_, Suspect>(&format!(
            "SELECT {} FROM suspect WHERE id = $1",
            SUSPECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::not_found("suspect", id))
    }

    async fn list_for_report(&self, lost_id: i64) -> Result<Vec<Suspect>> {
        sqlx::query_as::<_, Suspect>(&format!(
            "SELECT {} FROM suspect WHERE lost_id = $1 ORDER BY rank ASC, final_score DESC, id ASC",
            SUSPECT_COLUMNS
        ))
        .bind(lost_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn matches_for_report(&self, lost_id: i64) -> Result<Vec<SuspectMatch>> {
        let rows = sqlx::query_as::<_, SuspectMatch>(
            r#"
            SELECT s.id AS suspect_id,
                   s.rank,
                   s.person_score,
                   s.motor_score,
                   s.final_score,
                   d.timestamp AS detected_at,
                   c.id AS camera_id,
                   c.name AS camera_name,
                   c.latitude,
                   c.longitude,
                   mi.path AS motorcycle_image_path,
                   pi.path AS person_image_path
            FROM suspect s
            JOIN detected d ON d.id = s.detected_id
            JOIN camera c ON c.id = d.camera_id
            LEFT JOIN image mi ON mi.id = d.motorcycle_image_id
            LEFT JOIN image pi ON pi.id = d.person_image_id
            WHERE s.lost_id = $1
            ORDER BY s.rank ASC, s.final_score DESC, s.id ASC
            "#,
        )
        .bind(lost_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "suspects",
            op = "matches_for_report",
            lost_id,
            result_count = rows.len(),
            "Suspect join fetched"
        );
        Ok(rows)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM suspect WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "suspect", id)
    }
}
