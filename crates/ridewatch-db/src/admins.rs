//! Admin repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    Admin, AdminRepository, CreateAdminRequest, Credentials, Error, Page, Result,
};

use crate::{classify, expect_one};

/// PostgreSQL implementation of AdminRepository.
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: Pool<Postgres>,
}

impl PgAdminRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn create(&self, req: CreateAdminRequest) -> Result<Admin> {
        let admin = sqlx::query_as::<_, Admin>(
            "INSERT INTO admin (name, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, name, email, created_at",
        )
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(&req.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match classify(e) {
            Error::Conflict(_) => Error::Conflict("email already registered".to_string()),
            other => other,
        })?;

        info!(subsystem = "db", component = "admins", op = "create", admin_id = admin.id, "Admin created");
        Ok(admin)
    }

    async fn get(&self, id: i64) -> Result<Admin> {
        sqlx::query_as::<_, Admin>("SELECT id, name, email, created_at FROM admin WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::not_found("admin", id))
    }

    async fn list(&self, page: Page) -> Result<Vec<Admin>> {
        sqlx::query_as::<_, Admin>(
            "SELECT id, name, email, created_at FROM admin ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(clamp_limit(page.limit))
        .bind(page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM admin WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "admin", id)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
        sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM admin WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
