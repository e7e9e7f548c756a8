//! # ridewatch-db
//!
//! PostgreSQL persistence layer for ridewatch.
//!
//! This crate provides:
//! - Connection pool management
//! - One repository per entity implementing the `ridewatch-core` traits
//! - The suspect/detection/camera join behind lost-report results
//! - Schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use ridewatch_db::{Database, LostReportRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/ridewatch").await?;
//!     let report = db.lost_reports.get(42).await?;
//!     println!("Report {} is {}", report.id, report.status);
//!     Ok(())
//! }
//! ```
pub mod admins;
pub mod cameras;
pub mod detections;
pub mod images;
pub mod lost_reports;
pub mod pool;
pub mod suspects;
pub mod users;
pub mod vehicles;

// Test fixtures for integration tests
pub mod test_fixtures;

use async_trait::async_trait;

// Re-export core types
pub use ridewatch_core::*;

pub use admins::PgAdminRepository;
pub use cameras::PgCameraRepository;
pub use detections::PgDetectedRepository;
pub use images::PgImageRepository;
pub use lost_reports::PgLostReportRepository;
pub use pool::{create_lazy_pool, create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use suspects::PgSuspectRepository;
pub use users::PgUserRepository;
pub use vehicles::PgVehicleRepository;

/// Classify a sqlx error into the core error taxonomy.
///
/// Unique violations become `Conflict`, foreign-key and check violations
/// become `Validation`, everything else stays a `Database` error.
pub(crate) fn classify(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return Error::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return Error::Validation(format!(
                "referenced record does not exist ({})",
                db_err.constraint().unwrap_or("foreign key")
            ));
        }
        if db_err.is_check_violation() {
            return Error::Validation(format!(
                "value violates {}",
                db_err.constraint().unwrap_or("check constraint")
            ));
        }
    }
    Error::Database(err)
}

/// `NotFound` unless exactly one row was affected.
pub(crate) fn expect_one(rows_affected: u64, kind: &str, id: i64) -> Result<()> {
    match rows_affected {
        0 => Err(Error::not_found(kind, id)),
        1 => Ok(()),
        n => Err(Error::Conflict(format!(
            "{} {}: expected one row, affected {}",
            kind, id, n
        ))),
    }
}

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub users: PgUserRepository,
    pub admins: PgAdminRepository,
    pub vehicles: PgVehicleRepository,
    pub cameras: PgCameraRepository,
    pub images: PgImageRepository,
    pub detections: PgDetectedRepository,
    pub lost_reports: PgLostReportRepository,
    pub suspects: PgSuspectRepository,
}

impl Database {
    /// Create a new database context from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            admins: PgAdminRepository::new(pool.clone()),
            vehicles: PgVehicleRepository::new(pool.clone()),
            cameras: PgCameraRepository::new(pool.clone()),
            images: PgImageRepository::new(pool.clone()),
            detections: PgDetectedRepository::new(pool.clone()),
            lost_reports: PgLostReportRepository::new(pool.clone()),
            suspects: PgSuspectRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect to database and create context.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[async_trait]
impl ResultSource for Database {
    async fn report_owner(&self, lost_id: i64) -> Result<Option<i64>> {
        self.lost_reports.owner_of(lost_id).await
    }

    async fn suspect_matches(&self, lost_id: i64) -> Result<Vec<SuspectMatch>> {
        self.suspects.matches_for_report(lost_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_one() {
        assert!(expect_one(1, "camera", 1).is_ok());
        assert!(matches!(expect_one(0, "camera", 1), Err(Error::NotFound(_))));
        assert!(matches!(expect_one(2, "camera", 1), Err(Error::Conflict(_))));
    }

    #[test]
    fn test_classify_passes_through_non_database_errors() {
        assert!(matches!(
            classify(sqlx::Error::RowNotFound),
            Error::Database(sqlx::Error::RowNotFound)
        ));
    }
}
