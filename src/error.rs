//! Error types for schedule construction, validation, and queries.
//!
//! Infeasibility is not represented here. A schedule that cannot meet its
//! programs' requirements validates successfully with `is_valid() == false`.

use crate::models::CourseCode;
use crate::validation::ValidationIssue;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors surfaced by schedule operations.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// A declared program is not in the program catalog.
    #[error("invalid program: {0}")]
    InvalidProgram(String),

    /// A course identifier is malformed or not in the course catalog.
    #[error("invalid course: {0}")]
    InvalidCourse(String),

    /// A reason query named a requirement type the catalog does not know.
    #[error("unknown reason type: {0}")]
    UnknownReasonType(String),

    /// A cached query was made with no validation result available.
    #[error("schedule has not been validated since its last change")]
    NotValidated,

    /// The catalog is inconsistent with itself or with the schedule.
    #[error("catalog consistency check failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// A course already counted as incoming cannot also be placed in a term.
    #[error("course {0} is already incoming and cannot be assigned to a term")]
    AlreadyIncoming(CourseCode),

    /// A reason lookup needs filters that were not supplied.
    #[error("{reason} lookups require: {required}")]
    MissingFilter {
        reason: String,
        required: &'static str,
    },

    /// A catalog document is malformed or violates identifier uniqueness.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Reading or writing a schedule file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A schedule document could not be encoded or decoded.
    #[error("schedule format error: {0}")]
    Format(#[from] serde_json::Error),
}
