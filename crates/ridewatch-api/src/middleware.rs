//! Request-id generation and rate limiting.

use std::num::NonZeroU32;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use governor::{Quota, RateLimiter};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use ridewatch_core::{Error, Result};

use crate::config::RateLimitConfig;
use crate::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Global rate limiter type (direct quota, not keyed per client).
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// `requests` per `period_secs`, refilled evenly, with the full count as burst.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Result<GlobalRateLimiter> {
    let burst = NonZeroU32::new(config.requests)
        .ok_or_else(|| Error::Config("RATE_LIMIT_REQUESTS must be non-zero".to_string()))?;
    let replenish = Duration::from_secs(config.period_secs) / config.requests;
    let quota = Quota::with_period(replenish)
        .ok_or_else(|| Error::Config("RATE_LIMIT_PERIOD_SECS must be non-zero".to_string()))?
        .allow_burst(burst);
    Ok(RateLimiter::direct(quota))
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_allows_burst_then_rejects() {
        let limiter = build_rate_limiter(&RateLimitConfig {
            enabled: true,
            requests: 3,
            period_secs: 60,
        })
        .unwrap();
        for _ in 0..3 {
            assert!(limiter.check().is_ok());
        }
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_zero_requests_rejected() {
        let result = build_rate_limiter(&RateLimitConfig {
            enabled: true,
            requests: 0,
            period_secs: 60,
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_period_rejected() {
        let result = build_rate_limiter(&RateLimitConfig {
            enabled: true,
            requests: 10,
            period_secs: 0,
        });
        assert!(result.is_err());
    }
}
