//! Course and program catalog.
//!
//! Read-only reference data, loaded once and shared as `Arc<Catalog>`
//! by every schedule validated against it.
//!
//! # TOML form
//! ```toml
//! [[courses]]
//! code = "THEO-1100"
//! credits = 3
//!
//! [[programs]]
//! name = "BA Physics"
//!
//! [[programs.categories]]
//! name = "Theology"
//! type = "Core"
//! rule = { stem = "THEO" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use super::{Course, CourseCode, Program, RequirementType};
use crate::error::{Result, ScheduleError};

/// Program and course definitions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: BTreeMap<CourseCode, Course>,
    programs: Vec<Program>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    courses: Vec<Course>,
    #[serde(default)]
    programs: Vec<Program>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate course or program identifiers.
    pub fn from_parts(courses: Vec<Course>, programs: Vec<Program>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for course in courses {
            let code = course.code.clone();
            if map.insert(code.clone(), course).is_some() {
                return Err(ScheduleError::Catalog(format!("duplicate course {code}")));
            }
        }

        let mut seen = HashSet::new();
        for program in &programs {
            if !seen.insert(program.name.as_str()) {
                return Err(ScheduleError::Catalog(format!(
                    "duplicate program {}",
                    program.name
                )));
            }
        }

        Ok(Self {
            courses: map,
            programs,
        })
    }

    /// Parses a TOML catalog document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| ScheduleError::Catalog(e.to_string()))?;
        Self::from_parts(file.courses, file.programs)
    }

    /// Loads a TOML catalog from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|err| {
            tracing::warn!("Failed to read catalog at {:?}: {}", path, err);
            ScheduleError::Io(err)
        })?;
        let catalog = Self::from_toml_str(&content).inspect_err(|err| {
            tracing::warn!("Failed to parse catalog at {:?}: {}", path, err);
        })?;
        tracing::debug!(
            courses = catalog.courses.len(),
            programs = catalog.programs.len(),
            "Loaded catalog from {:?}",
            path
        );
        Ok(catalog)
    }

    /// Adds a course, replacing any course with the same code.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.insert(course.code.clone(), course);
        self
    }

    /// Adds a program, replacing any program with the same name.
    pub fn with_program(mut self, program: Program) -> Self {
        match self.programs.iter_mut().find(|p| p.name == program.name) {
            Some(existing) => *existing = program,
            None => self.programs.push(program),
        }
        self
    }

    /// Looks up a course by code.
    pub fn course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.get(code)
    }

    /// Whether the catalog defines a course.
    pub fn contains_course(&self, code: &CourseCode) -> bool {
        self.courses.contains_key(code)
    }

    /// All courses, ordered by code.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.courses.values()
    }

    /// Looks up a program by name.
    pub fn program(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name == name)
    }

    /// All programs in catalog order.
    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Names of every program the catalog offers.
    pub fn program_names(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.name.clone()).collect()
    }

    /// Requirement types declared by any category, plus the built-ins.
    pub fn requirement_types(&self) -> BTreeSet<RequirementType> {
        RequirementType::BUILTIN
            .into_iter()
            .chain(
                self.programs
                    .iter()
                    .flat_map(|p| p.categories.iter().map(|c| c.kind.clone())),
            )
            .collect()
    }

    /// Resolves a requirement type tag, if built in or declared.
    pub fn resolve_type(&self, tag: &str) -> Option<RequirementType> {
        if let Some(kind) = RequirementType::builtin(tag) {
            return Some(kind);
        }
        self.programs
            .iter()
            .flat_map(|p| p.categories.iter())
            .find(|c| c.kind.as_str() == tag)
            .map(|c| c.kind.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Eligibility, RequirementCategory};

    const SAMPLE: &str = r#"
[[courses]]
code = "THEO-1100"
title = "Intro to Theology"
credits = 3
tags = ["core"]

[[courses]]
code = "STAT-2000"
credits = 4

[[programs]]
name = "BA Physics"

[[programs.categories]]
name = "Theology"
type = "Core"
rule = { stem = "THEO" }

[[programs.categories]]
name = "Capstone"
type = "Capstone"
rule = { courses = ["STAT-2000"] }
min = 0
max = 1
"#;

    #[test]
    fn test_from_toml() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        let theo = catalog.course(&CourseCode::new("THEO", 1100)).unwrap();
        assert_eq!(theo.credits, 3);
        assert!(theo.has_tag("core"));

        let program = catalog.program("BA Physics").unwrap();
        assert_eq!(program.categories.len(), 2);
        assert_eq!(program.categories[0].kind, RequirementType::Core);
        assert_eq!((program.categories[0].min, program.categories[0].max), (1, 1));
        assert_eq!(program.categories[1].min, 0);
        assert_eq!(catalog.program_names(), vec!["BA Physics".to_string()]);
    }

    #[test]
    fn test_duplicate_course_rejected() {
        let doc = r#"
[[courses]]
code = "THEO-1100"
[[courses]]
code = "THEO-1100"
"#;
        let err = Catalog::from_toml_str(doc).unwrap_err();
        assert!(matches!(err, ScheduleError::Catalog(msg) if msg.contains("THEO-1100")));
    }

    #[test]
    fn test_duplicate_program_rejected() {
        let err = Catalog::from_parts(vec![], vec![Program::new("BA"), Program::new("BA")])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Catalog(_)));
    }

    #[test]
    fn test_malformed_toml_is_catalog_error() {
        assert!(matches!(
            Catalog::from_toml_str("[[courses]]\ncode = \"NODASH\""),
            Err(ScheduleError::Catalog(_))
        ));
    }

    #[test]
    fn test_resolve_type() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.resolve_type("Core"), Some(RequirementType::Core));
        assert_eq!(
            catalog.resolve_type("Capstone"),
            Some(RequirementType::Custom("Capstone".into()))
        );
        assert_eq!(catalog.resolve_type("Nonsense"), None);
        assert!(catalog
            .requirement_types()
            .contains(&RequirementType::ProgramElective));
    }

    #[test]
    fn test_builder_replaces_by_identifier() {
        let catalog = Catalog::new()
            .with_course(Course::parse("A-1").unwrap().with_credits(1))
            .with_course(Course::parse("A-1").unwrap().with_credits(3))
            .with_program(Program::new("P"))
            .with_program(Program::new("P").with_category(RequirementCategory::new(
                "c",
                RequirementType::Core,
                Eligibility::Stem("A".into()),
            )));
        assert_eq!(catalog.courses().count(), 1);
        assert_eq!(catalog.course(&CourseCode::new("A", 1)).unwrap().credits, 3);
        assert_eq!(catalog.programs().len(), 1);
        assert_eq!(catalog.program("P").unwrap().categories.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Catalog::load("/nonexistent/catalog.toml").unwrap_err();
        assert!(matches!(err, ScheduleError::Io(_)));
    }
}
