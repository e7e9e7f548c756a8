//! Field-level write permission for lost-report mutations.
//!
//! A [`ReportUpdate`] is sparse: a field is "attempted" only when it is
//! present in the payload *and* differs from the stored report. Fields that
//! are present but equal to the current value are no-ops, never denials.
//!
//! Precedence:
//!
//! 1. Admin claims with a changed `status` → exactly `{status}` is allowed.
//! 2. Owner claims → each attempted owner field (`timestamp`, `address`,
//!    `vehicle_id`, `evidence_image_id`) is allowed; a new `timestamp` more
//!    than five minutes ahead of `now` or a blank `address` is a
//!    validation error.
//! 3. Otherwise, any attempted field makes the decision a `Forbidden`
//!    rejection. Requesters who are neither owner nor admin are always
//!    rejected.
//! 4. `user_id` and `detected_id` are never writable here.
//!
//! When nothing is allowed and nothing was rejected the decision is a no-op:
//! callers echo the stored report and skip the write.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::defaults::future_timestamp_tolerance;
use crate::error::{Error, Result};
use crate::models::{Claims, LostReport, LostStatus};

/// A lost-report field that a mutation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Timestamp,
    Address,
    VehicleId,
    EvidenceImageId,
    Status,
}

impl ReportField {
    /// Fields an owner may change.
    pub const OWNER_FIELDS: [ReportField; 4] = [
        ReportField::Timestamp,
        ReportField::Address,
        ReportField::VehicleId,
        ReportField::EvidenceImageId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportField::Timestamp => "timestamp",
            ReportField::Address => "address",
            ReportField::VehicleId => "vehicle_id",
            ReportField::EvidenceImageId => "evidence_image_id",
            ReportField::Status => "status",
        }
    }
}

/// Proposed partial update to a lost report.
///
/// Every field is optional; `None` means "not sent". `evidence_image_id`
/// and `detected_id` are nullable columns, so they carry a second layer:
/// `Some(None)` means "sent as null".
#[derive(Debug, Clone, Default, PartialEq, Deserialize, utoipa::ToSchema)]
pub struct ReportUpdate {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<i64>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub evidence_image_id: Option<Option<i64>>,
    #[serde(default)]
    pub status: Option<LostStatus>,
    /// Accepted only to be ignored.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Accepted only to be ignored.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i64>, nullable)]
    pub detected_id: Option<Option<i64>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ReportUpdate {
    /// `address` as it would be stored: surrounding whitespace removed.
    pub fn trimmed_address(&self) -> Option<&str> {
        self.address.as_deref().map(str::trim)
    }

    /// Fields present in this update whose value differs from `existing`.
    ///
    /// Protected fields (`user_id`, `detected_id`) are never reported.
    pub fn changed_fields(&self, existing: &LostReport) -> BTreeSet<ReportField> {
        let mut changed = BTreeSet::new();
        if self.timestamp.is_some_and(|t| t != existing.timestamp) {
            changed.insert(ReportField::Timestamp);
        }
        if self
            .trimmed_address()
            .is_some_and(|a| a != existing.address)
        {
            changed.insert(ReportField::Address);
        }
        if self.vehicle_id.is_some_and(|v| v != existing.vehicle_id) {
            changed.insert(ReportField::VehicleId);
        }
        if self
            .evidence_image_id
            .is_some_and(|e| e != existing.evidence_image_id)
        {
            changed.insert(ReportField::EvidenceImageId);
        }
        if self.status.is_some_and(|s| s != existing.status) {
            changed.insert(ReportField::Status);
        }
        changed
    }
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// At least one field may be written.
    Permitted,
    /// Owner or admin, but nothing would change.
    NoChanges,
    /// Requester may not make any of the attempted changes.
    Forbidden,
}

/// Output of [`decide_report_mutation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationDecision {
    pub allowed_fields: BTreeSet<ReportField>,
    pub rejected: bool,
    pub reason: DecisionReason,
}

impl MutationDecision {
    fn forbidden() -> Self {
        Self {
            allowed_fields: BTreeSet::new(),
            rejected: true,
            reason: DecisionReason::Forbidden,
        }
    }

    fn permitted(allowed_fields: BTreeSet<ReportField>) -> Self {
        if allowed_fields.is_empty() {
            Self {
                allowed_fields,
                rejected: false,
                reason: DecisionReason::NoChanges,
            }
        } else {
            Self {
                allowed_fields,
                rejected: false,
                reason: DecisionReason::Permitted,
            }
        }
    }

    /// True when the caller should echo the stored report and skip the write.
    pub fn is_noop(&self) -> bool {
        !self.rejected && self.allowed_fields.is_empty()
    }

    pub fn allows(&self, field: ReportField) -> bool {
        self.allowed_fields.contains(&field)
    }

    /// Turn a rejection into [`Error::Forbidden`].
    pub fn into_result(self) -> Result<Self> {
        if self.rejected {
            Err(Error::Forbidden(
                "not permitted to modify this lost report".to_string(),
            ))
        } else {
            Ok(self)
        }
    }
}

/// Reject incident times more than five minutes ahead of `now`.
pub fn validate_incident_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if timestamp > now + future_timestamp_tolerance() {
        return Err(Error::Validation(format!(
            "timestamp {} is in the future",
            timestamp.to_rfc3339()
        )));
    }
    Ok(())
}

/// Decide which fields of `update` the requester may apply to `existing`.
///
/// Returns `Err(Error::Validation)` only when an owner would otherwise be
/// allowed to write a timestamp that lies too far in the future or a blank
/// address. Denials are
/// reported through [`MutationDecision::rejected`].
pub fn decide_report_mutation(
    claims: &Claims,
    existing: &LostReport,
    update: &ReportUpdate,
    now: DateTime<Utc>,
) -> Result<MutationDecision> {
    let is_owner = claims.owns(existing.user_id);

    if !is_owner && !claims.is_admin {
        debug!(
            subsystem = "policy",
            op = "decide",
            user_id = claims.user_id,
            lost_id = existing.id,
            "Requester is neither owner nor admin"
        );
        return Ok(MutationDecision::forbidden());
    }

    let attempted = update.changed_fields(existing);

    if claims.is_admin && attempted.contains(&ReportField::Status) {
        return Ok(MutationDecision::permitted(BTreeSet::from([
            ReportField::Status,
        ])));
    }

    let mut allowed = BTreeSet::new();
    if is_owner {
        for field in ReportField::OWNER_FIELDS {
            if attempted.contains(&field) {
                allowed.insert(field);
            }
        }
        if allowed.contains(&ReportField::Timestamp) {
            if let Some(timestamp) = update.timestamp {
                validate_incident_time(timestamp, now)?;
            }
        }
        if allowed.contains(&ReportField::Address)
            && update.trimmed_address().is_some_and(str::is_empty)
        {
            return Err(Error::Validation("address must not be empty".to_string()));
        }
    }

    if allowed.is_empty() && !attempted.is_empty() {
        debug!(
            subsystem = "policy",
            op = "decide",
            user_id = claims.user_id,
            is_admin = claims.is_admin,
            lost_id = existing.id,
            attempted = ?attempted,
            "No attempted field is permitted"
        );
        return Ok(MutationDecision::forbidden());
    }

    Ok(MutationDecision::permitted(allowed))
}
