//! Suspect result view for one lost report.
//!
//! The aggregator checks access before it asks for a single suspect row, so
//! a requester who cannot see a report learns nothing about its matches.
//! Suspects are presented in the order the source returns them; the
//! PostgreSQL source orders by rank, then final score.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    AnalysisStatus, CameraInfo, Claims, ResultView, SuspectInfo, SuspectMatch,
};

/// Read access needed to build a [`ResultView`].
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Owning user of a lost report, or `None` if the report does not exist.
    async fn report_owner(&self, lost_id: i64) -> Result<Option<i64>>;

    /// Suspects for a lost report joined with detection and camera data.
    async fn suspect_matches(&self, lost_id: i64) -> Result<Vec<SuspectMatch>>;
}

/// Normalize a stored image path to a root-relative URL.
///
/// Leading slashes are stripped and exactly one is prepended, so
/// `normalize_image_url(normalize_image_url(p)) == normalize_image_url(p)`.
pub fn normalize_image_url(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

fn evidence_url(m: &SuspectMatch) -> Option<String> {
    [&m.motorcycle_image_path, &m.person_image_path]
        .into_iter()
        .flatten()
        .find(|p| !p.is_empty())
        .map(|p| normalize_image_url(p))
}

/// Assemble a view from already-authorized match rows. Pure.
pub fn build_result_view(lost_id: i64, matches: Vec<SuspectMatch>) -> ResultView {
    let analysis_status = if matches.is_empty() {
        AnalysisStatus::Processing
    } else {
        AnalysisStatus::Completed
    };

    let suspects = matches
        .into_iter()
        .map(|m| SuspectInfo {
            evidence_image_url: evidence_url(&m),
            suspect_id: m.suspect_id,
            detected_at: m.detected_at,
            person_score: m.person_score,
            motor_score: m.motor_score,
            final_score: m.final_score,
            rank: m.rank,
            camera: CameraInfo {
                camera_id: m.camera_id,
                name: m.camera_name,
                latitude: m.latitude,
                longitude: m.longitude,
            },
        })
        .collect();

    ResultView {
        lost_report_id: lost_id,
        analysis_status,
        suspects,
    }
}

/// Build the result view for `lost_id` on behalf of `claims`.
///
/// Fails with `NotFound` if the report does not exist and `Forbidden` if the
/// requester is neither its owner nor an admin. Issues at most two reads.
pub async fn aggregate_result<S>(source: &S, lost_id: i64, claims: &Claims) -> Result<ResultView>
where
    S: ResultSource + ?Sized,
{
    let start = Instant::now();

    let owner = source
        .report_owner(lost_id)
        .await?
        .ok_or_else(|| Error::not_found("lost report", lost_id))?;

    if !claims.can_view(owner) {
        warn!(
            subsystem = "results",
            op = "aggregate",
            lost_id,
            user_id = claims.user_id,
            "Result request denied"
        );
        return Err(Error::Forbidden(format!(
            "not permitted to view results for lost report {}",
            lost_id
        )));
    }

    let matches = source.suspect_matches(lost_id).await?;
    let view = build_result_view(lost_id, matches);

    debug!(
        subsystem = "results",
        op = "aggregate",
        lost_id,
        result_count = view.suspects.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Result view assembled"
    );

    Ok(view)
}
