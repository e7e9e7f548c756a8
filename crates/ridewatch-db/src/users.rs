//! User repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;

use ridewatch_core::defaults::clamp_limit;
use ridewatch_core::{
    CreateUserRequest, Credentials, Error, Page, Result, UpdateUserRequest, User, UserRepository,
};

use crate::{classify, expect_one};

const USER_COLUMNS: &str = "id, name, email, phone, created_at";

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO app_user (name, email, phone, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(&req.phone)
        .bind(&req.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match classify(e) {
            Error::Conflict(_) => Error::Conflict("email already registered".to_string()),
            other => other,
        })?;

        info!(subsystem = "db", component = "users", op = "create", user_id = user.id, "User created");
        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM app_user WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::not_found("user", id))
    }

    async fn list(&self, page: Page) -> Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM app_user ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(clamp_limit(page.limit))
        .bind(page.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)
    }

    async fn update(&self, id: i64, req: UpdateUserRequest) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE app_user
             SET name = COALESCE($2, name),
                 phone = COALESCE($3, phone)
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&req.name)
        .bind(&req.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify)?
        .ok_or_else(|| Error::not_found("user", id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM app_user WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "user", id)
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
        sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM app_user WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)
    }
}
