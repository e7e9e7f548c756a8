//! Lost report repository implementation.
//!
//! `replace` writes exactly the fields an owner or admin may change. The
//! owning user and the matcher-linked detection are never written after
//! insert, regardless of what the caller passes in. Concurrent writers are
//! not serialized; the later `replace` wins.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::info;

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    CreateLostReportRequest, Error, LostReport, LostReportFilter, LostReportRepository,
    LostStatus, Result,
};

use crate::{classify, expect_one};

const REPORT_COLUMNS: &str = "id, user_id, timestamp, vehicle_id, address, status, detected_id, \
                              evidence_image_id, created_at, updated_at";

fn row_to_report(r: PgRow) -> Result<LostReport> {
    let status: String = r.get("status");
    Ok(LostReport {
        id: r.get("id"),
        user_id: r.get("user_id"),
        timestamp: r.get("timestamp"),
        vehicle_id: r.get("vehicle_id"),
        address: r.get("address"),
        status: LostStatus::parse(&status)
            .ok_or_else(|| Error::Internal(format!("unknown lost report status '{}'", status)))?,
        detected_id: r.get("detected_id"),
        evidence_image_id: r.get("evidence_image_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

/// PostgreSQL implementation of LostReportRepository.
#[derive(Clone)]
pub struct PgLostReportRepository {
    pool: Pool<Postgres>,
}

impl PgLostReportRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LostReportRepository for PgLostReportRepository {
    async fn create(&self, user_id: i64, req: CreateLostReportRequest) -> Result<LostReport> {
        let row = sqlx::query(&format!(
            "INSERT INTO lost_report (user_id, timestamp, vehicle_id, address, status, evidence_image_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(user_id)
        .bind(req.timestamp)
        .bind(req.vehicle_id)
        .bind(req.address.trim())
        .bind(LostStatus::Open.as_str())
        .bind(req.evidence_image_id)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        let report = row_to_report(row)?;
        info!(
            subsystem = "db",
            component = "lost_reports",
            op = "create",
            lost_id = report.id,
            user_id,
            "Lost report filed"
        );
        Ok(report)
    }

    async fn get(&self, id: i64) -> Result<LostReport> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM lost_report WHERE id = $1",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::not_found("lost report", id))?;
        row_to_report(row)
    }

    async fn list(&self, filter: LostReportFilter) -> Result<Vec<LostReport>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM lost_report
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY timestamp DESC, id DESC
             LIMIT $3 OFFSET $4",
            REPORT_COLUMNS
        ))
        .bind(filter.user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(clamp_limit(filter.page.limit))
        .bind(filter.page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(row_to_report).collect()
    }

    async fn replace(&self, report: &LostReport) -> Result<LostReport> {
        let row = sqlx::query(&format!(
            "UPDATE lost_report
             SET timestamp = $2,
                 vehicle_id = $3,
                 address = $4,
                 status = $5,
                 evidence_image_id = $6,
                 updated_at = now()
             WHERE id = $1
             RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(report.id)
        .bind(report.timestamp)
        .bind(report.vehicle_id)
        .bind(&report.address)
        .bind(report.status.as_str())
        .bind(report.evidence_image_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or_else(|| Error::not_found("lost report", report.id))?;

        let updated = row_to_report(row)?;
        info!(
            subsystem = "db",
            component = "lost_reports",
            op = "replace",
            lost_id = updated.id,
            status = %updated.status,
            "Lost report updated"
        );
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM lost_report WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "lost report", id)
    }

    async fn owner_of(&self, id: i64) -> Result<Option<i64>> {
        sqlx::query_scalar::<_, i64>("SELECT user_id FROM lost_report WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
