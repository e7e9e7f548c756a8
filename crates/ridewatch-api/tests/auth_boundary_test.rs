//! HTTP boundary tests that need no database.
//!
//! This test suite validates:
//! - Missing, malformed, and expired tokens are rejected with 401
//! - Admin-only writes are refused for user tokens with 403
//! - Request validation runs before any query (400)
//! - Health, OpenAPI, and request-id plumbing

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;
use std::collections::HashMap;

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();
    let response = app.send(get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app();
    let response = app.send(get("/openapi.json", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/api/lost-reports/{id}"].is_object());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = test_app();
    for uri in ["/api/lost-reports", "/api/lost-reports/1/result", "/api/users/me"] {
        let response = app.send(get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = test_app();
    let response = app.send(get("/api/lost-reports", Some("not.a.jwt"))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = test_app();
    let stale = app
        .state
        .tokens
        .issue_at(1, false, Utc::now() - Duration::days(30))
        .unwrap();
    let response = app.send(get("/api/lost-reports", Some(stale.as_str()))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_unauthorized() {
    let app = test_app();
    let other = ridewatch_auth::TokenService::new(b"another-secret-another-secret-0000", 3600).unwrap();
    let token = other.issue(1, true).unwrap();
    let response = app.send(get("/api/users", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_cannot_create_camera() {
    let app = test_app();
    let token = app.user_token(3);
    let response = app
        .send(json_request(
            "POST",
            "/api/cameras",
            Some(token.as_str()),
            json!({"name": "Gate", "latitude": 1.0, "longitude": 2.0}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_camera_with_bad_coordinates_is_bad_request() {
    let app = test_app();
    let token = app.admin_token(1);
    let response = app
        .send(json_request(
            "POST",
            "/api/cameras",
            Some(token.as_str()),
            json!({"name": "Gate", "latitude": 123.0, "longitude": 2.0}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_cannot_list_users_or_create_suspects() {
    let app = test_app();
    let token = app.user_token(3);

    let response = app.send(get("/api/users", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(json_request(
            "POST",
            "/api/suspects",
            Some(token.as_str()),
            json!({
                "detected_id": 1, "lost_id": 1,
                "person_score": 0.5, "motor_score": 0.5, "final_score": 0.5, "rank": 1
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_future_lost_report_is_bad_request() {
    let app = test_app();
    let token = app.user_token(3);
    let response = app
        .send(json_request(
            "POST",
            "/api/lost-reports",
            Some(token.as_str()),
            json!({
                "timestamp": (Utc::now() + Duration::hours(2)).to_rfc3339(),
                "vehicle_id": 1,
                "address": "Main St"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_future_detection_is_bad_request() {
    let app = test_app();
    let token = app.admin_token(1);
    let response = app
        .send(json_request(
            "POST",
            "/api/detections",
            Some(token.as_str()),
            json!({
                "camera_id": 1,
                "timestamp": (Utc::now() + Duration::minutes(10)).to_rfc3339(),
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .is_some_and(|msg| msg.contains("in the future")));
}

#[tokio::test]
async fn test_admin_cannot_file_lost_report() {
    let app = test_app();
    let token = app.admin_token(1);
    let response = app
        .send(json_request(
            "POST",
            "/api/lost-reports",
            Some(token.as_str()),
            json!({
                "timestamp": Utc::now().to_rfc3339(),
                "vehicle_id": 1,
                "address": "Main St"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_suspect_list_requires_lost_id() {
    let app = test_app();
    let token = app.user_token(3);
    let response = app.send(get("/api/suspects", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_with_short_password_is_bad_request() {
    let app = test_app();
    let response = app
        .send(json_request(
            "POST",
            "/api/users",
            None,
            json!({"name": "Rider", "email": "rider@example.com", "password": "short"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_rejects_excess_requests() {
    let app = test_app_with(HashMap::from([
        ("RATE_LIMIT_ENABLED", "true"),
        ("RATE_LIMIT_REQUESTS", "2"),
        ("RATE_LIMIT_PERIOD_SECS", "3600"),
    ]));
    assert_eq!(app.send(get("/health", None)).await.status(), StatusCode::OK);
    assert_eq!(app.send(get("/health", None)).await.status(), StatusCode::OK);
    assert_eq!(
        app.send(get("/health", None)).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}
