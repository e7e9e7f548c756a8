//! Repository traits for ridewatch entities.
//!
//! These are the persistence gateway seen by the rest of the system. Every
//! `get` fails with [`Error::NotFound`](crate::Error::NotFound) for a missing
//! row, every `delete` fails the same way when nothing was deleted, and
//! uniqueness violations surface as `Conflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::models::*;

/// Pagination shared by list requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// =============================================================================
// USERS AND ADMINS
// =============================================================================

/// Request for creating a user. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

/// Request for updating a user profile.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, req: CreateUserRequest) -> Result<User>;
    async fn get(&self, id: i64) -> Result<User>;
    async fn list(&self, page: Page) -> Result<Vec<User>>;
    async fn update(&self, id: i64, req: UpdateUserRequest) -> Result<User>;
    async fn delete(&self, id: i64) -> Result<()>;
    /// Credential lookup for login. Email comparison is case-insensitive.
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>>;
}

/// Request for creating an admin. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct CreateAdminRequest {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, req: CreateAdminRequest) -> Result<Admin>;
    async fn get(&self, id: i64) -> Result<Admin>;
    async fn list(&self, page: Page) -> Result<Vec<Admin>>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>>;
}

// =============================================================================
// VEHICLES AND CAMERAS
// =============================================================================

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateVehicleRequest {
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateVehicleRequest {
    pub plate_number: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleFilter {
    pub user_id: Option<i64>,
    pub page: Page,
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, user_id: i64, req: CreateVehicleRequest) -> Result<Vehicle>;
    async fn get(&self, id: i64) -> Result<Vehicle>;
    async fn list(&self, filter: VehicleFilter) -> Result<Vec<Vehicle>>;
    async fn update(&self, id: i64, req: UpdateVehicleRequest) -> Result<Vehicle>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateCameraRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateCameraRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

#[async_trait]
pub trait CameraRepository: Send + Sync {
    async fn create(&self, req: CreateCameraRequest) -> Result<Camera>;
    async fn get(&self, id: i64) -> Result<Camera>;
    async fn list(&self, page: Page) -> Result<Vec<Camera>>;
    async fn update(&self, id: i64, req: UpdateCameraRequest) -> Result<Camera>;
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// IMAGES AND DETECTIONS
// =============================================================================

#[derive(Debug, Clone)]
pub struct CreateImageRequest {
    pub path: String,
    pub kind: ImageKind,
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, req: CreateImageRequest) -> Result<Image>;
    async fn get(&self, id: i64) -> Result<Image>;
    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateDetectedRequest {
    pub camera_id: i64,
    pub timestamp: DateTime<Utc>,
    pub person_image_id: Option<i64>,
    pub motorcycle_image_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DetectedFilter {
    pub camera_id: Option<i64>,
    pub is_suspect: Option<bool>,
    pub page: Page,
}

#[async_trait]
pub trait DetectedRepository: Send + Sync {
    async fn create(&self, req: CreateDetectedRequest) -> Result<Detected>;
    async fn get(&self, id: i64) -> Result<Detected>;
    async fn list(&self, filter: DetectedFilter) -> Result<Vec<Detected>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// LOST REPORTS AND SUSPECTS
// =============================================================================

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateLostReportRequest {
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: i64,
    pub address: String,
    pub evidence_image_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LostReportFilter {
    pub user_id: Option<i64>,
    pub status: Option<LostStatus>,
    pub page: Page,
}

#[async_trait]
pub trait LostReportRepository: Send + Sync {
    /// Create a report owned by `user_id` with status `open`.
    async fn create(&self, user_id: i64, req: CreateLostReportRequest) -> Result<LostReport>;
    async fn get(&self, id: i64) -> Result<LostReport>;
    async fn list(&self, filter: LostReportFilter) -> Result<Vec<LostReport>>;
    /// Persist a merged report. `user_id` and `detected_id` are not written.
    async fn replace(&self, report: &LostReport) -> Result<LostReport>;
    async fn delete(&self, id: i64) -> Result<()>;
    /// Owning user id, or `None` if the report does not exist.
    async fn owner_of(&self, id: i64) -> Result<Option<i64>>;
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateSuspectRequest {
    pub detected_id: i64,
    pub lost_id: i64,
    pub person_score: f64,
    pub motor_score: f64,
    pub final_score: f64,
    pub rank: i32,
}

#[async_trait]
pub trait SuspectRepository: Send + Sync {
    /// Create a suspect and flag its detection as a suspect sighting.
    async fn create(&self, req: CreateSuspectRequest) -> Result<Suspect>;
    async fn get(&self, id: i64) -> Result<Suspect>;
    async fn list_for_report(&self, lost_id: i64) -> Result<Vec<Suspect>>;
    /// Suspects joined with detection, camera, and image paths,
    /// ordered by rank, then final score descending.
    async fn matches_for_report(&self, lost_id: i64) -> Result<Vec<SuspectMatch>>;
    async fn delete(&self, id: i64) -> Result<()>;
}

// =============================================================================
// REQUEST VALIDATION
// =============================================================================

fn require_nonempty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(crate::Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(crate::Error::Validation(format!(
            "coordinates out of range: ({}, {})",
            latitude, longitude
        )));
    }
    Ok(())
}

impl CreateVehicleRequest {
    pub fn validate(&self) -> Result<()> {
        require_nonempty("plate_number", &self.plate_number)
    }
}

impl CreateCameraRequest {
    pub fn validate(&self) -> Result<()> {
        require_nonempty("name", &self.name)?;
        check_coordinates(self.latitude, self.longitude)
    }
}

impl UpdateCameraRequest {
    /// Validates the coordinate pair after applying this update to `current`.
    pub fn validate(&self, current: &Camera) -> Result<()> {
        if let Some(name) = &self.name {
            require_nonempty("name", name)?;
        }
        check_coordinates(
            self.latitude.unwrap_or(current.latitude),
            self.longitude.unwrap_or(current.longitude),
        )
    }
}

impl CreateLostReportRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        require_nonempty("address", &self.address)?;
        crate::policy::validate_incident_time(self.timestamp, now)
    }
}

impl CreateSuspectRequest {
    pub fn validate(&self) -> Result<()> {
        for (name, score) in [
            ("person_score", self.person_score),
            ("motor_score", self.motor_score),
            ("final_score", self.final_score),
        ] {
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(crate::Error::Validation(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, score
                )));
            }
        }
        if self.rank < 1 {
            return Err(crate::Error::Validation(format!(
                "rank must be at least 1, got {}",
                self.rank
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn suspect(final_score: f64, rank: i32) -> CreateSuspectRequest {
        CreateSuspectRequest {
            detected_id: 1,
            lost_id: 2,
            person_score: 0.4,
            motor_score: 0.6,
            final_score,
            rank,
        }
    }

    #[test]
    fn test_suspect_scores_must_be_unit_interval() {
        assert!(suspect(0.0, 1).validate().is_ok());
        assert!(suspect(1.0, 3).validate().is_ok());
        assert!(suspect(1.01, 1).validate().is_err());
        assert!(suspect(f64::NAN, 1).validate().is_err());
        assert!(suspect(0.5, 0).validate().is_err());
    }

    #[test]
    fn test_camera_coordinates_checked() {
        let mut req = CreateCameraRequest {
            name: "Gate".to_string(),
            latitude: 13.7,
            longitude: 100.5,
            address: None,
            is_active: true,
        };
        assert!(req.validate().is_ok());
        req.latitude = 91.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_camera_create_defaults_active() {
        let req: CreateCameraRequest =
            serde_json::from_str(r#"{"name": "Gate", "latitude": 1.0, "longitude": 2.0}"#)
                .unwrap();
        assert!(req.is_active);
    }

    #[test]
    fn test_lost_report_create_rejects_future_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut req = CreateLostReportRequest {
            timestamp: now + Duration::minutes(4),
            vehicle_id: 1,
            address: "Main St".to_string(),
            evidence_image_id: None,
        };
        assert!(req.validate(now).is_ok());
        req.timestamp = now + Duration::minutes(6);
        assert!(matches!(
            req.validate(now),
            Err(crate::Error::Validation(_))
        ));
        req.timestamp = now;
        req.address = "   ".to_string();
        assert!(req.validate(now).is_err());
    }
}
