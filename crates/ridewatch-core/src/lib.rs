//! # ridewatch-core
//!
//! Core types, traits, and decision logic for the ridewatch lost-vehicle
//! matching service.
//!
//! This crate provides the data model shared by every other ridewatch crate,
//! the repository traits the persistence layer implements, and the three
//! pieces of logic that decide what a request may see or change:
//!
//! - [`policy`]: field-level write permission for lost-report mutations
//! - [`merge`]: applying a permitted mutation to an existing report
//! - [`results`]: assembling the suspect result view for one lost report
//!
//! Nothing here performs I/O directly; storage is reached through the
//! traits in [`traits`].

pub mod defaults;
pub mod error;
pub mod logging;
pub mod merge;
pub mod models;
pub mod policy;
pub mod results;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use merge::merge_report;
pub use models::*;
pub use policy::{
    decide_report_mutation, validate_incident_time, DecisionReason, MutationDecision, ReportField,
    ReportUpdate,
};
pub use results::{aggregate_result, build_result_view, normalize_image_url, ResultSource};
pub use traits::*;
