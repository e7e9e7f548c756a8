//! Route handlers, one module per resource.

pub mod admins;
pub mod auth;
pub mod cameras;
pub mod detections;
pub mod health;
pub mod images;
pub mod lost_reports;
pub mod suspects;
pub mod users;
pub mod vehicles;

use ridewatch_core::Page;
use serde::Deserialize;

/// `?limit=&offset=` on list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum rows to return (1-500, default 50).
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<PageQuery> for Page {
    fn from(q: PageQuery) -> Self {
        Page {
            limit: q.limit,
            offset: q.offset,
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> crate::ApiResult<()> {
    if value.trim().is_empty() {
        return Err(crate::ApiError::BadRequest(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}
