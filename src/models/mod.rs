//! Degree-planning domain models.
//!
//! Provides the catalog reference data (courses, programs, requirement
//! categories) and the term-bucket layout a schedule is built from.
//!
//! # Domain Mappings
//!
//! | degree-planner | Registrar term | Audit report |
//! |----------------|----------------|--------------|
//! | Course | Course offering | Credited course |
//! | RequirementCategory | Requirement block | Audit line |
//! | Program | Major/Minor | Degree plan |
//! | Bucket | Term | Term column |

mod bucket;
mod catalog;
mod course;
mod program;
mod requirement;

pub use bucket::{Bucket, TermBuckets, TermKey};
pub use catalog::Catalog;
pub use course::{Course, CourseCode, CourseSuffix};
pub use program::Program;
pub use requirement::{Eligibility, RequirementCategory, RequirementType};
