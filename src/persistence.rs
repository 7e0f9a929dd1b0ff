//! Schedule files.
//!
//! A schedule is stored as a table of `(bucket, course)` rows plus the
//! declared program list, encoded as JSON:
//!
//! ```json
//! {
//!   "programs": ["BA Physics"],
//!   "rows": [
//!     { "bucket": "incoming", "course": "THEO-1100" },
//!     { "bucket": "semester-1", "course": "PHYS-2100" }
//!   ]
//! }
//! ```
//!
//! Rows are written incoming first, then semesters and summers in key
//! order, then the non-term pool. Loading rebuilds the schedule through
//! the normal constructor, so programs and courses are re-checked against
//! the catalog. Matcher configuration is not stored.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{Bucket, Catalog, CourseCode};
use crate::schedule::Schedule;

/// On-disk form of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    /// Declared programs in order.
    pub programs: Vec<String>,
    /// One row per scheduled course.
    pub rows: Vec<ScheduleRow>,
}

/// One scheduled course and the bucket key it sits under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Bucket key (`incoming`, `semester-<k>`, `summer-<k>`, `non-term`).
    pub bucket: String,
    /// Course code.
    pub course: CourseCode,
}

impl ScheduleDocument {
    /// Captures a schedule's programs and course placements.
    pub fn from_schedule(schedule: &Schedule) -> Self {
        Self {
            programs: schedule.get_programs().to_vec(),
            rows: schedule
                .get_courses()
                .into_iter()
                .map(|(bucket, course)| ScheduleRow {
                    bucket: bucket.to_string(),
                    course,
                })
                .collect(),
        }
    }

    /// Rebuilds a schedule against a catalog.
    pub fn into_schedule(self, catalog: Arc<Catalog>) -> Result<Schedule> {
        let mut incoming = Vec::new();
        let mut buckets: Vec<(String, Vec<String>)> = Vec::new();

        for row in self.rows {
            let course = row.course.to_string();
            if Bucket::parse_key(&row.bucket).is_some_and(|b| b.is_incoming()) {
                incoming.push(course);
                continue;
            }
            match buckets.iter_mut().find(|(key, _)| *key == row.bucket) {
                Some((_, list)) => list.push(course),
                None => buckets.push((row.bucket, vec![course])),
            }
        }

        Schedule::with_courses(catalog, &self.programs, &incoming, buckets)
    }
}

impl Schedule {
    /// Writes the schedule to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &ScheduleDocument::from_schedule(self))?;
        writer.flush()?;
        tracing::debug!(courses = self.get_courses().len(), "Saved schedule to {:?}", path);
        Ok(())
    }

    /// Reads a schedule file written by [`Schedule::save`].
    pub fn from_file(catalog: Arc<Catalog>, path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let document: ScheduleDocument = serde_json::from_reader(reader)?;
        document.into_schedule(catalog)
    }

    /// Encodes the schedule in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&ScheduleDocument::from_schedule(self))?)
    }

    /// Decodes a schedule produced by [`Schedule::to_bytes`].
    pub fn from_bytes(catalog: Arc<Catalog>, bytes: &[u8]) -> Result<Self> {
        let document: ScheduleDocument = serde_json::from_slice(bytes)?;
        document.into_schedule(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::{Course, Eligibility, Program, RequirementCategory, RequirementType};

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        for c in ["THEO-1100", "PHYS-2100", "PHYS-3100", "PHYS-4100", "ART-1000", "MATH-1500"] {
            catalog = catalog.with_course(Course::parse(c).unwrap());
        }
        Arc::new(
            catalog
                .with_program(Program::new("BA Physics").with_category(
                    RequirementCategory::new(
                        "Physics",
                        RequirementType::ProgramRequired,
                        Eligibility::Stem("PHYS".into()),
                    )
                    .exactly(3),
                ))
                .with_program(Program::new("BA Art")),
        )
    }

    fn sample() -> Schedule {
        Schedule::with_courses(
            catalog(),
            &["BA Physics", "BA Art"],
            &["THEO-1100"],
            vec![
                ("semester-10", vec!["PHYS-4100"]),
                ("semester-2", vec!["PHYS-3100"]),
                ("semester-1", vec!["PHYS-2100"]),
                ("summer-1", vec!["MATH-1500"]),
                ("non-term", vec!["ART-1000"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_document_row_order() {
        let doc = ScheduleDocument::from_schedule(&sample());
        let buckets: Vec<&str> = doc.rows.iter().map(|r| r.bucket.as_str()).collect();
        assert_eq!(
            buckets,
            vec!["incoming", "semester-1", "semester-2", "semester-10", "summer-1", "non-term"]
        );
        assert_eq!(doc.programs, vec!["BA Physics", "BA Art"]);
    }

    #[test]
    fn test_file_round_trip() {
        let schedule = sample();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.json");

        schedule.save(&path).unwrap();
        let loaded = Schedule::from_file(catalog(), &path).unwrap();

        assert_eq!(loaded.get_programs(), schedule.get_programs());
        assert_eq!(loaded.get_courses(), schedule.get_courses());
        assert_eq!(loaded, schedule);
    }

    #[test]
    fn test_bytes_round_trip_preserves_verdict() {
        let mut schedule = sample();
        schedule.validate().unwrap();

        let mut loaded = Schedule::from_bytes(catalog(), &schedule.to_bytes().unwrap()).unwrap();
        assert!(!loaded.is_validated());
        loaded.validate().unwrap();
        assert_eq!(loaded.is_valid().unwrap(), schedule.is_valid().unwrap());
        assert_eq!(loaded.get_reasons().unwrap(), schedule.get_reasons().unwrap());
    }

    #[test]
    fn test_load_rechecks_catalog() {
        let doc = r#"{"programs":["BA Physics"],"rows":[{"bucket":"semester-1","course":"GHST-1000"}]}"#;
        let err = Schedule::from_bytes(catalog(), doc.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidCourse(_)));

        let doc = r#"{"programs":["BS Alchemy"],"rows":[]}"#;
        let err = Schedule::from_bytes(catalog(), doc.as_bytes()).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidProgram(_)));
    }

    #[test]
    fn test_malformed_document() {
        let err = Schedule::from_bytes(catalog(), b"not json").unwrap_err();
        assert!(matches!(err, ScheduleError::Format(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Schedule::from_file(catalog(), "/nonexistent/schedule.json").unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
    }
}
