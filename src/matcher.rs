//! Greedy requirement matcher.
//!
//! # Algorithm
//!
//! 1. Build the course pool: incoming plus every term bucket, deduplicated
//!    (first occurrence wins) and sorted by the configured [`ScanOrder`].
//! 2. For each declared program, in declared order:
//!    a. Pass 1: for each category in declared order, credit eligible
//!       courses not yet used by this program until the category reaches
//!       `min`.
//!    b. Pass 2: same walk, topping each category up to `max`.
//! 3. A course used by one program stays available to every other program.
//! 4. Unmet categories do not stop the walk; every program and category is
//!    processed so the outcome describes the whole schedule.
//!
//! Validity is the conjunction of every category's `min` being met.
//!
//! This is not a backtracking solver: it may reject a schedule that some
//! other assignment would satisfy. Every credit is attributable to the
//! fixed scan order, which keeps explanations stable between runs.
//!
//! # Complexity
//! O(p * c * n) where p=programs, c=categories/program, n=pool size.

use std::collections::HashSet;

use crate::config::{MatchConfig, ScanOrder};
use crate::error::{Result, ScheduleError};
use crate::models::{Bucket, Catalog, Course, CourseCode, Program, RequirementType};

/// Result of matching one requirement category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutcome {
    /// Category name.
    pub name: String,
    /// Requirement type tag.
    pub kind: RequirementType,
    /// Required minimum.
    pub min: usize,
    /// Credited maximum.
    pub max: usize,
    /// Credited courses, in the order they were credited.
    pub assigned: Vec<CourseCode>,
}

impl CategoryOutcome {
    /// Whether the category reached its minimum.
    pub fn is_satisfied(&self) -> bool {
        self.assigned.len() >= self.min
    }

    /// Courses still needed to reach the minimum.
    pub fn shortfall(&self) -> usize {
        self.min.saturating_sub(self.assigned.len())
    }
}

/// Result of matching one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramOutcome {
    /// Program identifier.
    pub program: String,
    /// Per-category results in declared order.
    pub categories: Vec<CategoryOutcome>,
}

impl ProgramOutcome {
    /// Whether every category reached its minimum.
    pub fn is_satisfied(&self) -> bool {
        self.categories.iter().all(CategoryOutcome::is_satisfied)
    }

    /// Categories below their minimum.
    pub fn unmet(&self) -> impl Iterator<Item = &CategoryOutcome> {
        self.categories.iter().filter(|c| !c.is_satisfied())
    }
}

/// Result of matching every declared program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    /// Per-program results in declared order.
    pub programs: Vec<ProgramOutcome>,
}

impl MatchOutcome {
    /// Whether every program is satisfied.
    pub fn is_valid(&self) -> bool {
        self.programs.iter().all(ProgramOutcome::is_satisfied)
    }

    /// Finds the outcome for a program.
    pub fn program(&self, name: &str) -> Option<&ProgramOutcome> {
        self.programs.iter().find(|p| p.program == name)
    }
}

/// Greedy, order-deterministic requirement matcher.
///
/// # Example
/// ```
/// use degree_planner::matcher::Matcher;
/// use degree_planner::models::{
///     Bucket, Catalog, Course, Eligibility, Program, RequirementCategory, RequirementType,
/// };
///
/// let catalog = Catalog::new()
///     .with_course(Course::parse("THEO-1100").unwrap())
///     .with_program(Program::new("BA Physics").with_category(RequirementCategory::new(
///         "Theology",
///         RequirementType::Core,
///         Eligibility::Stem("THEO".into()),
///     )));
///
/// let pool = vec![(Bucket::Incoming, "THEO-1100".parse().unwrap())];
/// let outcome = Matcher::new()
///     .match_programs(&catalog, &["BA Physics".to_string()], &pool)
///     .unwrap();
/// assert!(outcome.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the default (chronological) scan order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Matches the pool against each program's categories.
    ///
    /// `pool` holds every course of the schedule with its bucket. Courses
    /// the catalog does not define are skipped; unknown programs are an
    /// error.
    pub fn match_programs(
        &self,
        catalog: &Catalog,
        programs: &[String],
        pool: &[(Bucket, CourseCode)],
    ) -> Result<MatchOutcome> {
        let resolved = programs
            .iter()
            .map(|name| {
                catalog
                    .program(name)
                    .ok_or_else(|| ScheduleError::InvalidProgram(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let pool = self.ordered_pool(catalog, pool);

        let programs = resolved
            .into_iter()
            .map(|program| match_program(program, &pool))
            .collect();

        Ok(MatchOutcome { programs })
    }

    /// Deduplicated pool of catalog courses in scan order.
    fn ordered_pool<'a>(
        &self,
        catalog: &'a Catalog,
        pool: &[(Bucket, CourseCode)],
    ) -> Vec<&'a Course> {
        let mut entries: Vec<(&Bucket, &CourseCode)> = pool.iter().map(|(b, c)| (b, c)).collect();
        // Chronological first so dedup keeps the earliest occurrence.
        entries.sort();

        let mut seen = HashSet::new();
        let mut courses: Vec<(&Bucket, &'a Course)> = Vec::with_capacity(entries.len());
        for (bucket, code) in entries {
            if !seen.insert(code) {
                continue;
            }
            match catalog.course(code) {
                Some(course) => courses.push((bucket, course)),
                None => tracing::warn!(course = %code, "Skipping course missing from catalog"),
            }
        }

        if self.config.scan_order == ScanOrder::ById {
            courses.sort_by(|a, b| a.1.code.cmp(&b.1.code));
        }

        courses.into_iter().map(|(_, course)| course).collect()
    }
}

fn match_program(program: &Program, pool: &[&Course]) -> ProgramOutcome {
    let mut used: HashSet<&CourseCode> = HashSet::new();
    let mut categories: Vec<CategoryOutcome> = program
        .categories
        .iter()
        .map(|cat| CategoryOutcome {
            name: cat.name.clone(),
            kind: cat.kind.clone(),
            min: cat.min,
            max: cat.max,
            assigned: Vec::new(),
        })
        .collect();

    // Pass 1 reaches minimums, pass 2 tops up to maximums.
    for pass in [Pass::Minimum, Pass::Maximum] {
        for (cat, outcome) in program.categories.iter().zip(categories.iter_mut()) {
            let target = match pass {
                Pass::Minimum => cat.min.min(cat.max),
                Pass::Maximum => cat.max,
            };
            for course in pool {
                if outcome.assigned.len() >= target {
                    break;
                }
                if used.contains(&course.code) || !cat.accepts(course) {
                    continue;
                }
                used.insert(&course.code);
                outcome.assigned.push(course.code.clone());
            }
        }
    }

    for outcome in &categories {
        tracing::debug!(
            program = %program.name,
            category = %outcome.name,
            kind = %outcome.kind,
            assigned = outcome.assigned.len(),
            min = outcome.min,
            max = outcome.max,
            satisfied = outcome.is_satisfied(),
            "Matched requirement category"
        );
    }

    ProgramOutcome {
        program: program.name.clone(),
        categories,
    }
}

#[derive(Debug, Clone, Copy)]
enum Pass {
    Minimum,
    Maximum,
}
