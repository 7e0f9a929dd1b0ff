//! Degree-requirement matching for multi-term course schedules.
//!
//! Given declared degree programs, completed ("incoming") courses, and a
//! partial plan of courses per term, decides whether every program's
//! requirements are met and records *why* each course counts toward
//! *which* requirement of *which* program.
//!
//! # Modules
//!
//! - **`models`**: Catalog reference data — `Course`, `Program`,
//!   `RequirementCategory`, `Eligibility` — and the term-bucket layout
//! - **`matcher`**: Greedy, order-deterministic assignment of courses to
//!   program categories, with cross-program course sharing
//! - **`reasons`**: Explanation index grouped by requirement type
//! - **`validation`**: Catalog consistency checks and the `Validator`
//! - **`schedule`**: The `Schedule` surface and its validation cache
//! - **`persistence`**: Schedule files (`save` / `from_file`)
//!
//! # Errors vs. infeasibility
//!
//! Unknown programs or courses are errors. A schedule that cannot satisfy
//! its programs is not: it validates with `is_valid() == Ok(false)` and a
//! reason index covering whatever could be matched.
//!
//! # Concurrency
//!
//! Validation is synchronous and pure. Catalogs are shared read-only as
//! `Arc<Catalog>`, so independent schedules may be validated on separate
//! threads.

pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod persistence;
pub mod reasons;
pub mod schedule;
pub mod validation;

pub use config::{MatchConfig, ScanOrder};
pub use error::{Result, ScheduleError};
pub use reasons::{ReasonEntry, ReasonIndex};
pub use schedule::Schedule;
