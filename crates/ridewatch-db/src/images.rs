//! Image metadata repository implementation.
//!
//! Files themselves live on disk; this table records their paths.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use ridewatch_core::{
    CreateImageRequest, Error, Image, ImageKind, ImageRepository, Result,
};

use crate::{classify, expect_one};

fn row_to_image(r: PgRow) -> Result<Image> {
    let kind: String = r.get("kind");
    Ok(Image {
        id: r.get("id"),
        path: r.get("path"),
        kind: ImageKind::parse(&kind)
            .ok_or_else(|| Error::Internal(format!("unknown image kind '{}'", kind)))?,
        created_at: r.get("created_at"),
    })
}

/// PostgreSQL implementation of ImageRepository.
#[derive(Clone)]
pub struct PgImageRepository {
    pool: Pool<Postgres>,
}

impl PgImageRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    async fn create(&self, req: CreateImageRequest) -> Result<Image> {
        let row = sqlx::query(
            "INSERT INTO image (path, kind) VALUES ($1, $2)
             RETURNING id, path, kind, created_at",
        )
        .bind(&req.path)
        .bind(req.kind.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        row_to_image(row)
    }

    async fn get(&self, id: i64) -> Result<Image> {
        let row = sqlx::query("SELECT id, path, kind, created_at FROM image WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| Error::not_found("image", id))?;
        row_to_image(row)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM image WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        expect_one(result.rows_affected(), "image", id)
    }
}
