//! Structured logging field name constants for ridewatch.
//!
//! All crates use these names for `tracing` fields so that log queries
//! work the same way across the api, db, and auth subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, request rejected for policy reasons |
//! | INFO  | Lifecycle events (startup, shutdown), writes that succeeded |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-row iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one HTTP request (UUIDv7).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "auth", "policy", "results"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "lost_reports", "token_service"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "decide", "merge", "aggregate", "replace"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Authenticated requester id.
pub const USER_ID: &str = "user_id";

/// Whether the requester holds admin capability.
pub const IS_ADMIN: &str = "is_admin";

/// Lost report id being operated on.
pub const LOST_ID: &str = "lost_id";

/// Suspect id being operated on.
pub const SUSPECT_ID: &str = "suspect_id";

/// Detection id being operated on.
pub const DETECTED_ID: &str = "detected_id";

pub const VEHICLE_ID: &str = "vehicle_id";
pub const CAMERA_ID: &str = "camera_id";
pub const IMAGE_ID: &str = "image_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows or items returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of fields a mutation decision allowed.
pub const ALLOWED_COUNT: &str = "allowed_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Every field name above, for consistency checks.
pub const ALL_FIELDS: &[&str] = &[
    REQUEST_ID,
    SUBSYSTEM,
    COMPONENT,
    OPERATION,
    USER_ID,
    IS_ADMIN,
    LOST_ID,
    SUSPECT_ID,
    DETECTED_ID,
    VEHICLE_ID,
    CAMERA_ID,
    IMAGE_ID,
    DURATION_MS,
    RESULT_COUNT,
    ALLOWED_COUNT,
    POOL_SIZE,
    POOL_IDLE,
    DB_TABLE,
    SUCCESS,
    ERROR_MSG,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique() {
        let unique: HashSet<_> = ALL_FIELDS.iter().collect();
        assert_eq!(unique.len(), ALL_FIELDS.len());
    }

    #[test]
    fn test_field_names_are_snake_case() {
        for name in ALL_FIELDS {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "{}",
                name
            );
        }
    }
}
