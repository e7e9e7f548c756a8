//! Data model for ridewatch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ACCOUNTS
// =============================================================================

/// A registered vehicle owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An operator account with admin capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Stored credential for a login lookup. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
}

/// Authenticated identity for the lifetime of one request.
///
/// Produced by the token service from a verified token; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Whether these claims identify the owning user of a resource.
    ///
    /// Admin ids live in a separate id space from user ids, so admin claims
    /// never count as ownership even when the numbers coincide.
    pub fn owns(&self, owner_id: i64) -> bool {
        !self.is_admin && self.user_id == owner_id
    }

    /// Owner or admin.
    pub fn can_view(&self, owner_id: i64) -> bool {
        self.is_admin || self.owns(owner_id)
    }
}

// =============================================================================
// VEHICLES AND CAMERAS
// =============================================================================

/// A vehicle registered by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Vehicle {
    pub id: i64,
    pub user_id: i64,
    pub plate_number: String,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// A surveillance camera feeding detections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Camera {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// IMAGES AND DETECTIONS
// =============================================================================

/// What an uploaded image depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Person,
    Motorcycle,
    Evidence,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Person => "person",
            ImageKind::Motorcycle => "motorcycle",
            ImageKind::Evidence => "evidence",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "person" => Some(ImageKind::Person),
            "motorcycle" => Some(ImageKind::Motorcycle),
            "evidence" => Some(ImageKind::Evidence),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Image {
    pub id: i64,
    /// Path relative to the upload root, as recorded at upload time.
    pub path: String,
    pub kind: ImageKind,
    pub created_at: DateTime<Utc>,
}

/// A sighting event from a camera feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Detected {
    pub id: i64,
    pub camera_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_image_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motorcycle_image_id: Option<i64>,
    pub is_suspect: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// LOST REPORTS
// =============================================================================

/// Lifecycle state of a lost report. Only admins move it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum LostStatus {
    #[default]
    Open,
    Processing,
    Matched,
    Closed,
}

impl LostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LostStatus::Open => "open",
            LostStatus::Processing => "processing",
            LostStatus::Matched => "matched",
            LostStatus::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(LostStatus::Open),
            "processing" => Some(LostStatus::Processing),
            "matched" => Some(LostStatus::Matched),
            "closed" => Some(LostStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for LostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filed claim that a vehicle is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LostReport {
    pub id: i64,
    /// Reporting user. Immutable after creation.
    pub user_id: i64,
    /// When the vehicle went missing.
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: i64,
    pub address: String,
    pub status: LostStatus,
    /// Detection linked by the matcher, if any. Not user-editable.
    pub detected_id: Option<i64>,
    pub evidence_image_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SUSPECTS AND RESULTS
// =============================================================================

/// A scored candidate match between a detection and a lost report.
///
/// Produced by the external matcher; scores are displayed, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct Suspect {
    pub id: i64,
    pub detected_id: i64,
    pub lost_id: i64,
    pub person_score: f64,
    pub motor_score: f64,
    pub final_score: f64,
    /// 1 = best match.
    pub rank: i32,
    pub created_at: DateTime<Utc>,
}

/// One suspect row joined with its detection, camera, and image paths.
///
/// This is the shape the persistence layer hands to the result aggregator.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SuspectMatch {
    pub suspect_id: i64,
    pub rank: i32,
    pub person_score: f64,
    pub motor_score: f64,
    pub final_score: f64,
    pub detected_at: DateTime<Utc>,
    pub camera_id: i64,
    pub camera_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub motorcycle_image_path: Option<String>,
    pub person_image_path: Option<String>,
}

/// Whether the matcher has produced anything for a report yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum AnalysisStatus {
    #[serde(rename = "Processing or No Suspects Found")]
    Processing,
    #[serde(rename = "Completed")]
    Completed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Processing => "Processing or No Suspects Found",
            AnalysisStatus::Completed => "Completed",
        }
    }
}

/// Camera fields exposed in a result view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CameraInfo {
    pub camera_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One suspect as presented to the report owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SuspectInfo {
    pub suspect_id: i64,
    pub detected_at: DateTime<Utc>,
    pub person_score: f64,
    pub motor_score: f64,
    pub final_score: f64,
    pub rank: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_image_url: Option<String>,
    pub camera: CameraInfo,
}

/// Client-facing result projection for one lost report. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResultView {
    pub lost_report_id: i64,
    pub analysis_status: AnalysisStatus,
    pub suspects: Vec<SuspectInfo>,
}
