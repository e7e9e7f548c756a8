//! PATCH /api/lost-reports/{id} against a migrated database.
//!
//! This test suite validates:
//! - Unchanged values are echoed back without touching the stored row
//! - Vehicle changes must name an existing vehicle of the report owner
//! - Strangers are refused, admins write only the status
//! - Blank addresses are rejected and padded ones stored trimmed
//!
//! Run with `cargo test -p ridewatch-api -- --ignored`.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

use ridewatch_core::{LostReportRepository, LostStatus};
use ridewatch_db::test_fixtures::TestDataBuilder;

fn report_uri(lost_id: i64) -> String {
    format!("/api/lost-reports/{}", lost_id)
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_unchanged_patch_skips_write() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let data = TestDataBuilder::new(db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();
    let before = db.lost_reports.get(lost_id).await.unwrap();

    let token = app.user_token(data.user_id);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({
                "address": before.address,
                "vehicle_id": before.vehicle_id,
                "user_id": data.user_id + 1000,
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], lost_id);
    assert_eq!(body["address"], before.address.as_str());

    let after = db.lost_reports.get(lost_id).await.unwrap();
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after, before);

    data.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_owner_address_change_is_stored_trimmed() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let data = TestDataBuilder::new(db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();

    let token = app.user_token(data.user_id);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({"address": "  88 Riverside Rd  "}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = db.lost_reports.get(lost_id).await.unwrap();
    assert_eq!(stored.address, "88 Riverside Rd");
    assert_eq!(stored.user_id, data.user_id);

    data.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_blank_address_is_bad_request() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let data = TestDataBuilder::new(db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();

    let token = app.user_token(data.user_id);
    let response = app
        .send(patch(&report_uri(lost_id), &token, json!({"address": "   "})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        db.lost_reports.get(lost_id).await.unwrap().address,
        "Fixture Road"
    );

    data.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_vehicle_of_another_user_is_forbidden() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let owner = TestDataBuilder::new(db).with_report().build().await;
    let other = TestDataBuilder::new(db).build().await;
    let lost_id = owner.lost_id.unwrap();

    let token = app.user_token(owner.user_id);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({"vehicle_id": other.vehicle_id}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        db.lost_reports.get(lost_id).await.unwrap().vehicle_id,
        owner.vehicle_id
    );

    owner.cleanup(db).await;
    other.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_unknown_vehicle_is_bad_request() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let data = TestDataBuilder::new(db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();

    let token = app.user_token(data.user_id);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({"vehicle_id": i64::MAX}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    data.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_stranger_patch_is_forbidden() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let owner = TestDataBuilder::new(db).with_report().build().await;
    let stranger = TestDataBuilder::new(db).build().await;
    let lost_id = owner.lost_id.unwrap();
    let before = db.lost_reports.get(lost_id).await.unwrap();

    let token = app.user_token(stranger.user_id);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({"address": "Somewhere Else"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(db.lost_reports.get(lost_id).await.unwrap(), before);

    owner.cleanup(db).await;
    stranger.cleanup(db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_admin_close_persists_only_status() {
    let app = test_app_with_db().await;
    let db = &app.state.db;
    let data = TestDataBuilder::new(db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();
    let before = db.lost_reports.get(lost_id).await.unwrap();

    let token = app.admin_token(1);
    let response = app
        .send(patch(
            &report_uri(lost_id),
            &token,
            json!({"status": "closed", "address": "Admin Avenue"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "closed");

    let after = db.lost_reports.get(lost_id).await.unwrap();
    assert_eq!(after.status, LostStatus::Closed);
    assert_eq!(after.address, before.address);
    assert_eq!(after.timestamp, before.timestamp);
    assert_eq!(after.vehicle_id, before.vehicle_id);
    assert_eq!(after.user_id, before.user_id);

    data.cleanup(db).await;
}
