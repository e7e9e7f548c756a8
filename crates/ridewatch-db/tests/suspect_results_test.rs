//! Integration tests for the suspect join behind lost report results.
//!
//! This test suite validates:
//! - Creating a suspect flags its detection
//! - `matches_for_report` returns camera and image data in rank order
//! - The aggregator reads through `Database` as a `ResultSource`
//! - Duplicate (lost report, detection) pairs conflict
//!
//! **IMPORTANT**: These tests require a fully migrated PostgreSQL database.
//! Run migrations first: `sqlx migrate run`

use chrono::{Duration, Utc};
use ridewatch_db::{
    aggregate_result,
    test_fixtures::{connect_test_db, TestDataBuilder},
    AnalysisStatus, Claims, CreateDetectedRequest, CreateSuspectRequest, DetectedRepository,
    Error, SuspectRepository,
};

fn suspect(detected_id: i64, lost_id: i64, final_score: f64, rank: i32) -> CreateSuspectRequest {
    CreateSuspectRequest {
        detected_id,
        lost_id,
        person_score: 0.5,
        motor_score: 0.9,
        final_score,
        rank,
    }
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_matches_are_rank_ordered_with_evidence_paths() {
    let db = connect_test_db().await;
    let data = TestDataBuilder::new(&db)
        .with_detection()
        .with_report()
        .build()
        .await;
    let lost_id = data.lost_id.unwrap();
    let first = data.detected_id.unwrap();

    let second = db
        .detections
        .create(CreateDetectedRequest {
            camera_id: data.camera_id.unwrap(),
            timestamp: Utc::now() - Duration::minutes(10),
            person_image_id: None,
            motorcycle_image_id: None,
        })
        .await
        .unwrap();

    db.suspects
        .create(suspect(second.id, lost_id, 0.6, 2))
        .await
        .unwrap();
    let top = db.suspects.create(suspect(first, lost_id, 0.9, 1)).await.unwrap();

    let flagged = db.detections.get(first).await.unwrap();
    assert!(flagged.is_suspect);

    let matches = db.suspects.matches_for_report(lost_id).await.unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].suspect_id, top.id);
    assert_eq!(matches[0].rank, 1);
    assert!(matches[0].motorcycle_image_path.is_some());
    assert_eq!(matches[1].rank, 2);
    assert_eq!(matches[1].motorcycle_image_path, None);

    let owner = Claims {
        user_id: data.user_id,
        is_admin: false,
        expires_at: Utc::now() + Duration::hours(1),
    };
    let view = aggregate_result(&db, lost_id, &owner).await.unwrap();
    assert_eq!(view.analysis_status, AnalysisStatus::Completed);
    assert!(view.suspects[0]
        .evidence_image_url
        .as_deref()
        .is_some_and(|u| u.starts_with("/uploads/")));

    let _ = db.detections.delete(second.id).await;
    data.cleanup(&db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_duplicate_suspect_pair_conflicts() {
    let db = connect_test_db().await;
    let data = TestDataBuilder::new(&db)
        .with_detection()
        .with_report()
        .build()
        .await;
    let lost_id = data.lost_id.unwrap();
    let detected_id = data.detected_id.unwrap();

    db.suspects
        .create(suspect(detected_id, lost_id, 0.8, 1))
        .await
        .unwrap();
    let duplicate = db.suspects.create(suspect(detected_id, lost_id, 0.7, 2)).await;
    assert!(matches!(duplicate, Err(Error::Conflict(_))));

    data.cleanup(&db).await;
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_report_without_suspects_is_processing() {
    let db = connect_test_db().await;
    let data = TestDataBuilder::new(&db).with_report().build().await;
    let lost_id = data.lost_id.unwrap();

    let admin = Claims {
        user_id: 1,
        is_admin: true,
        expires_at: Utc::now() + Duration::hours(1),
    };
    let view = aggregate_result(&db, lost_id, &admin).await.unwrap();
    assert_eq!(view.analysis_status, AnalysisStatus::Processing);
    assert!(view.suspects.is_empty());

    data.cleanup(&db).await;
}
