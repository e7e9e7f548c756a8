//! Shared constants for ridewatch.

use chrono::Duration;

/// How far past "now" an incident timestamp may lie before it is rejected.
///
/// Absorbs clock drift between client devices and the server.
pub const FUTURE_TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

/// [`FUTURE_TIMESTAMP_TOLERANCE_SECS`] as a `chrono::Duration`.
pub fn future_timestamp_tolerance() -> Duration {
    Duration::seconds(FUTURE_TIMESTAMP_TOLERANCE_SECS)
}

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Upper bound on page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Minimum accepted password length for users and admins.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Clamp a caller-supplied page size into `1..=MAX_LIST_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_is_five_minutes() {
        assert_eq!(future_timestamp_tolerance(), Duration::minutes(5));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-3)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(20)), 20);
    }
}
