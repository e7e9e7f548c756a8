//! Applying a permitted mutation to a stored lost report.

use crate::models::LostReport;
use crate::policy::{MutationDecision, ReportField, ReportUpdate};

/// Produce the report state to persist.
///
/// Only fields in `decision.allowed_fields` are taken from `update`; every
/// other field, including `user_id`, `detected_id`, and the bookkeeping
/// timestamps, comes from `existing`. Pure: nothing is written until the
/// caller persists the returned value.
pub fn merge_report(
    existing: &LostReport,
    update: &ReportUpdate,
    decision: &MutationDecision,
) -> LostReport {
    let mut merged = existing.clone();

    for field in &decision.allowed_fields {
        match field {
            ReportField::Timestamp => {
                if let Some(timestamp) = update.timestamp {
                    merged.timestamp = timestamp;
                }
            }
            ReportField::Address => {
                if let Some(address) = update.trimmed_address() {
                    merged.address = address.to_string();
                }
            }
            ReportField::VehicleId => {
                if let Some(vehicle_id) = update.vehicle_id {
                    merged.vehicle_id = vehicle_id;
                }
            }
            ReportField::EvidenceImageId => {
                if let Some(evidence_image_id) = update.evidence_image_id {
                    merged.evidence_image_id = evidence_image_id;
                }
            }
            ReportField::Status => {
                if let Some(status) = update.status {
                    merged.status = status;
                }
            }
        }
    }

    merged
}
