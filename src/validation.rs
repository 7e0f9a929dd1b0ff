//! Catalog consistency checks and validation orchestration.
//!
//! Before matching, the catalog is checked against itself and against the
//! schedule. Detects:
//! - Duplicate category names within a program
//! - Category ranges with `min > max`
//! - Eligibility rules naming courses the catalog does not define
//! - Declared programs or scheduled courses missing from the catalog
//!
//! A failed check is a hard error. A schedule that passes the checks but
//! cannot meet its requirements is a normal negative verdict.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::error::{Result, ScheduleError};
use crate::matcher::{MatchOutcome, Matcher};
use crate::models::{Bucket, Catalog, CourseCode};
use crate::reasons::ReasonIndex;

/// Consistency check result.
pub type ConsistencyResult = std::result::Result<(), Vec<ValidationIssue>>;

/// A catalog consistency problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of consistency problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueKind {
    /// Two categories of one program share a name.
    DuplicateCategory,
    /// A category's minimum exceeds its maximum.
    InvalidRange,
    /// An eligibility rule lists a course the catalog does not define.
    UnknownCourseReference,
    /// A schedule holds a course the catalog does not define.
    UnknownScheduledCourse,
    /// A schedule declares a program the catalog does not define.
    UnknownProgram,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks the declared programs and scheduled courses against the catalog.
///
/// Checks:
/// 1. Every declared program exists
/// 2. Category names are unique within each declared program
/// 3. Every category has `min <= max`
/// 4. Every course listed by an eligibility rule exists
/// 5. Every scheduled course exists
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(issues)` with all detected issues.
pub fn check_consistency(
    catalog: &Catalog,
    programs: &[String],
    pool: &[(Bucket, CourseCode)],
) -> ConsistencyResult {
    let mut issues = Vec::new();

    for name in programs {
        let Some(program) = catalog.program(name) else {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::UnknownProgram,
                format!("Program '{name}' is not in the catalog"),
            ));
            continue;
        };

        let mut category_names = HashSet::new();
        for cat in &program.categories {
            if !category_names.insert(cat.name.as_str()) {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::DuplicateCategory,
                    format!("Program '{}' declares category '{}' twice", name, cat.name),
                ));
            }

            if cat.min > cat.max {
                issues.push(ValidationIssue::new(
                    ValidationIssueKind::InvalidRange,
                    format!(
                        "Category '{}' of '{}' has min {} > max {}",
                        cat.name, name, cat.min, cat.max
                    ),
                ));
            }

            for code in cat.rule.listed_courses() {
                if !catalog.contains_course(code) {
                    issues.push(ValidationIssue::new(
                        ValidationIssueKind::UnknownCourseReference,
                        format!(
                            "Category '{}' of '{}' references unknown course '{}'",
                            cat.name, name, code
                        ),
                    ));
                }
            }
        }
    }

    for (bucket, code) in pool {
        if !catalog.contains_course(code) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::UnknownScheduledCourse,
                format!("Course '{code}' in {bucket} is not in the catalog"),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Outcome of one validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Whether every program's requirements are met.
    pub valid: bool,
    /// Per-program, per-category match details.
    pub outcome: MatchOutcome,
    /// Credited courses grouped by requirement type.
    pub reasons: ReasonIndex,
}

/// Runs consistency checks, matching, and reason indexing.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    matcher: Matcher,
}

impl Validator {
    /// Creates a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given matcher configuration.
    pub fn with_config(config: MatchConfig) -> Self {
        Self {
            matcher: Matcher::new().with_config(config),
        }
    }

    /// Validates a set of programs against a course pool.
    ///
    /// Fails with [`ScheduleError::Validation`] only when the consistency
    /// checks fail; an unsatisfiable schedule yields `valid == false`.
    pub fn run(
        &self,
        catalog: &Catalog,
        programs: &[String],
        pool: &[(Bucket, CourseCode)],
    ) -> Result<Validation> {
        check_consistency(catalog, programs, pool).map_err(ScheduleError::Validation)?;

        let outcome = self.matcher.match_programs(catalog, programs, pool)?;
        let reasons = ReasonIndex::from_outcome(&outcome);
        let valid = outcome.is_valid();

        tracing::info!(
            programs = programs.len(),
            courses = pool.len(),
            reasons = reasons.len(),
            valid,
            "Validated schedule"
        );

        Ok(Validation {
            valid,
            outcome,
            reasons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Eligibility, Program, RequirementCategory, RequirementType};

    fn code(s: &str) -> CourseCode {
        s.parse().unwrap()
    }

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_course(Course::parse("THEO-1100").unwrap())
            .with_course(Course::parse("STAT-2000").unwrap())
            .with_program(
                Program::new("BA Physics")
                    .with_category(RequirementCategory::new(
                        "Theology",
                        RequirementType::Core,
                        Eligibility::courses(vec![code("THEO-1100")]),
                    ))
                    .with_category(RequirementCategory::new(
                        "Elective",
                        RequirementType::ProgramElective,
                        Eligibility::Stem("STAT".into()),
                    )),
            )
    }

    fn programs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_consistent_input() {
        let pool = vec![(Bucket::Incoming, code("THEO-1100"))];
        assert!(check_consistency(&sample_catalog(), &programs(&["BA Physics"]), &pool).is_ok());
    }

    #[test]
    fn test_unknown_program() {
        let issues =
            check_consistency(&sample_catalog(), &programs(&["BS Alchemy"]), &[]).unwrap_err();
        assert!(issues
            .iter()
            .any(|e| e.kind == ValidationIssueKind::UnknownProgram));
    }

    #[test]
    fn test_duplicate_category() {
        let catalog = sample_catalog().with_program(
            Program::new("P")
                .with_category(RequirementCategory::new(
                    "Same",
                    RequirementType::Core,
                    Eligibility::Stem("THEO".into()),
                ))
                .with_category(RequirementCategory::new(
                    "Same",
                    RequirementType::Foundation,
                    Eligibility::Stem("THEO".into()),
                )),
        );
        let issues = check_consistency(&catalog, &programs(&["P"]), &[]).unwrap_err();
        assert!(issues
            .iter()
            .any(|e| e.kind == ValidationIssueKind::DuplicateCategory));
    }

    #[test]
    fn test_invalid_range() {
        let catalog = sample_catalog().with_program(Program::new("P").with_category(
            RequirementCategory::new("Bad", RequirementType::Core, Eligibility::Stem("X".into()))
                .with_range(3, 1),
        ));
        let issues = check_consistency(&catalog, &programs(&["P"]), &[]).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, ValidationIssueKind::InvalidRange);
        assert!(issues[0].message.contains("min 3 > max 1"));
    }

    #[test]
    fn test_unknown_course_reference() {
        let catalog = sample_catalog().with_program(Program::new("P").with_category(
            RequirementCategory::new(
                "Ghost",
                RequirementType::ProgramRequired,
                Eligibility::courses(vec![code("GHST-1000")]),
            ),
        ));
        let issues = check_consistency(&catalog, &programs(&["P"]), &[]).unwrap_err();
        assert!(issues
            .iter()
            .any(|e| e.kind == ValidationIssueKind::UnknownCourseReference
                && e.message.contains("GHST-1000")));
    }

    #[test]
    fn test_unknown_scheduled_course() {
        let pool = vec![(Bucket::semester("1"), code("GHST-1000"))];
        let issues =
            check_consistency(&sample_catalog(), &programs(&["BA Physics"]), &pool).unwrap_err();
        assert_eq!(issues[0].kind, ValidationIssueKind::UnknownScheduledCourse);
        assert!(issues[0].message.contains("semester-1"));
    }

    #[test]
    fn test_undeclared_program_not_checked() {
        // Broken programs the schedule does not declare are ignored.
        let catalog = sample_catalog().with_program(Program::new("Broken").with_category(
            RequirementCategory::new("Bad", RequirementType::Core, Eligibility::Stem("X".into()))
                .with_range(2, 0),
        ));
        assert!(check_consistency(&catalog, &programs(&["BA Physics"]), &[]).is_ok());
    }

    #[test]
    fn test_multiple_issues() {
        let pool = vec![(Bucket::NonTerm, code("GHST-1000"))];
        let issues =
            check_consistency(&sample_catalog(), &programs(&["Nope", "Nada"]), &pool).unwrap_err();
        assert!(issues.len() >= 3);
    }

    #[test]
    fn test_validator_infeasible_is_not_error() {
        let validation = Validator::new()
            .run(&sample_catalog(), &programs(&["BA Physics"]), &[])
            .unwrap();
        assert!(!validation.valid);
        assert!(validation.reasons.is_empty());
    }

    #[test]
    fn test_validator_feasible() {
        let pool = vec![
            (Bucket::Incoming, code("THEO-1100")),
            (Bucket::NonTerm, code("STAT-2000")),
        ];
        let validation = Validator::new()
            .run(&sample_catalog(), &programs(&["BA Physics"]), &pool)
            .unwrap();
        assert!(validation.valid);
        assert_eq!(validation.reasons.len(), 2);
        assert_eq!(
            validation
                .reasons
                .courses_for(&RequirementType::Core, None, None),
            vec![code("THEO-1100")]
        );
    }

    #[test]
    fn test_validator_surfaces_consistency_failure() {
        let pool = vec![(Bucket::NonTerm, code("GHST-1000"))];
        let err = Validator::new()
            .run(&sample_catalog(), &programs(&["BA Physics"]), &pool)
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(issues) if issues.len() == 1));
    }
}
