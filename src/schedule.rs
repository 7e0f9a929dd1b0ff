//! Student schedule: declared programs, incoming courses, and term buckets.
//!
//! A schedule is validated against its catalog with [`Schedule::validate`].
//! The result is cached until the schedule next changes.
//!
//! # Cache contract
//!
//! [`Schedule::is_valid`], [`Schedule::get_reasons`] and
//! [`Schedule::get_courses_for_reason`] never validate implicitly. They
//! return [`ScheduleError::NotValidated`] if `validate()` has not run since
//! construction or since the last mutation.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::MatchConfig;
use crate::error::{Result, ScheduleError};
use crate::models::{Bucket, Catalog, CourseCode, RequirementType, TermBuckets};
use crate::reasons::ReasonIndex;
use crate::validation::{Validation, Validator};

/// A multi-term course schedule for one student.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use degree_planner::models::{
///     Catalog, Course, Eligibility, Program, RequirementCategory, RequirementType,
/// };
/// use degree_planner::Schedule;
///
/// let catalog = Arc::new(
///     Catalog::new()
///         .with_course(Course::parse("THEO-1100").unwrap())
///         .with_program(Program::new("BA Physics").with_category(RequirementCategory::new(
///             "Theology",
///             RequirementType::Core,
///             Eligibility::Stem("THEO".into()),
///         ))),
/// );
///
/// let mut schedule =
///     Schedule::with_incoming(catalog, &["BA Physics"], &["THEO-1100"]).unwrap();
/// schedule.validate().unwrap();
/// assert!(schedule.is_valid().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Schedule {
    catalog: Arc<Catalog>,
    config: MatchConfig,
    programs: Vec<String>,
    incoming: BTreeSet<CourseCode>,
    terms: TermBuckets,
    cached: Option<Validation>,
}

impl Schedule {
    /// Creates a schedule with declared programs and no courses.
    pub fn new<P: AsRef<str>>(catalog: Arc<Catalog>, programs: &[P]) -> Result<Self> {
        Self::with_courses(catalog, programs, &[] as &[&str], Vec::<(&str, Vec<&str>)>::new())
    }

    /// Creates a schedule with declared programs and incoming courses.
    pub fn with_incoming<P, C>(catalog: Arc<Catalog>, programs: &[P], incoming: &[C]) -> Result<Self>
    where
        P: AsRef<str>,
        C: AsRef<str>,
    {
        Self::with_courses(catalog, programs, incoming, Vec::<(&str, Vec<&str>)>::new())
    }

    /// Creates a schedule from programs, incoming courses, and keyed term
    /// buckets.
    ///
    /// Bucket keys: `semester-<k>`, `summer-<k>`, `non-term` (and
    /// `incoming`). Entries under any other key are treated as additional
    /// incoming courses.
    ///
    /// # Errors
    /// - [`ScheduleError::InvalidProgram`] for a program not in the catalog
    /// - [`ScheduleError::InvalidCourse`] for a malformed or unknown course
    /// - [`ScheduleError::AlreadyIncoming`] for an incoming course that is
    ///   also placed in a term
    pub fn with_courses<P, C, K, V, S>(
        catalog: Arc<Catalog>,
        programs: &[P],
        incoming: &[C],
        courses: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self>
    where
        P: AsRef<str>,
        C: AsRef<str>,
        K: AsRef<str>,
        V: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schedule = Self {
            catalog,
            config: MatchConfig::default(),
            programs: Vec::new(),
            incoming: BTreeSet::new(),
            terms: TermBuckets::new(),
            cached: None,
        };

        for program in programs {
            schedule.add_program(program.as_ref())?;
        }
        for code in incoming {
            let code = schedule.resolve_course(code.as_ref())?;
            schedule.incoming.insert(code);
        }

        let mut placed = Vec::new();
        for (key, codes) in courses {
            let key = key.as_ref();
            let bucket = Bucket::parse_key(key).unwrap_or_else(|| {
                tracing::warn!(key, "Unclassified bucket key, treating courses as incoming");
                Bucket::Incoming
            });
            for code in codes {
                let code = schedule.resolve_course(code.as_ref())?;
                match bucket {
                    Bucket::Incoming => {
                        schedule.incoming.insert(code);
                    }
                    _ => placed.push((bucket.clone(), code)),
                }
            }
        }

        for (bucket, code) in placed {
            if schedule.incoming.contains(&code) {
                return Err(ScheduleError::AlreadyIncoming(code));
            }
            if !schedule.terms.insert(bucket.clone(), code.clone()) {
                tracing::debug!(
                    course = %code,
                    %bucket,
                    "Course already placed in an earlier bucket"
                );
            }
        }

        Ok(schedule)
    }

    /// Sets the matcher configuration.
    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self.invalidate();
        self
    }

    /// The catalog this schedule is validated against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Shared handle to the catalog.
    pub fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// The matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Declared programs in insertion order.
    pub fn get_programs(&self) -> &[String] {
        &self.programs
    }

    /// Incoming courses in code order.
    pub fn incoming(&self) -> impl Iterator<Item = &CourseCode> {
        self.incoming.iter()
    }

    /// Term-assigned courses.
    pub fn terms(&self) -> &TermBuckets {
        &self.terms
    }

    /// Every course with its bucket: incoming first, then term buckets in
    /// chronological order.
    pub fn get_courses(&self) -> Vec<(Bucket, CourseCode)> {
        self.incoming
            .iter()
            .map(|c| (Bucket::Incoming, c.clone()))
            .chain(self.terms.iter().map(|(b, c)| (b, c.clone())))
            .collect()
    }

    /// Every course with its bucket and credit weight, in
    /// [`Schedule::get_courses`] order.
    pub fn get_courses_with_credits(&self) -> Vec<(Bucket, CourseCode, u32)> {
        self.get_courses()
            .into_iter()
            .map(|(bucket, code)| {
                let credits = self.credits_of(&code);
                (bucket, code, credits)
            })
            .collect()
    }

    /// The bucket holding a course, if the schedule has it.
    pub fn bucket_of(&self, code: &CourseCode) -> Option<Bucket> {
        if self.incoming.contains(code) {
            Some(Bucket::Incoming)
        } else {
            self.terms.bucket_of(code)
        }
    }

    /// Whether the schedule has a course anywhere.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.bucket_of(code).is_some()
    }

    /// Credits of one bucket. Courses missing from the catalog count zero.
    pub fn bucket_credits(&self, bucket: &Bucket) -> u32 {
        let codes: Vec<&CourseCode> = match bucket {
            Bucket::Incoming => self.incoming.iter().collect(),
            other => self.terms.courses_in(other),
        };
        codes.into_iter().map(|c| self.credits_of(c)).sum()
    }

    /// Credits of every term-assigned course (incoming excluded).
    pub fn scheduled_credits(&self) -> u32 {
        self.terms.iter().map(|(_, c)| self.credits_of(c)).sum()
    }

    fn credits_of(&self, code: &CourseCode) -> u32 {
        self.catalog.course(code).map(|c| c.credits).unwrap_or(0)
    }

    // ======================== Validation ========================

    /// Matches the schedule against its programs and caches the verdict
    /// and reasons.
    ///
    /// Fails only on catalog consistency problems; an unsatisfiable
    /// schedule validates with `is_valid() == Ok(false)`.
    pub fn validate(&mut self) -> Result<()> {
        let validation = Validator::with_config(self.config.clone()).run(
            &self.catalog,
            &self.programs,
            &self.get_courses(),
        )?;
        self.cached = Some(validation);
        Ok(())
    }

    /// Whether a cached validation result is available.
    pub fn is_validated(&self) -> bool {
        self.cached.is_some()
    }

    /// The cached validation result.
    pub fn validation(&self) -> Result<&Validation> {
        self.cached.as_ref().ok_or(ScheduleError::NotValidated)
    }

    /// Cached verdict: whether every program's requirements are met.
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.validation()?.valid)
    }

    /// Cached reasons, grouped by requirement type.
    pub fn get_reasons(&self) -> Result<&ReasonIndex> {
        Ok(&self.validation()?.reasons)
    }

    /// Courses credited under a requirement type, optionally narrowed to a
    /// category name and/or program.
    ///
    /// # Errors
    /// - [`ScheduleError::UnknownReasonType`] if `reason` is neither a
    ///   built-in type nor declared by the catalog
    /// - [`ScheduleError::NotValidated`] if no cached result exists
    pub fn get_courses_for_reason(
        &self,
        reason: &str,
        name: Option<&str>,
        prog: Option<&str>,
    ) -> Result<Vec<CourseCode>> {
        let kind = self.resolve_reason(reason)?;
        Ok(self.get_reasons()?.courses_for(&kind, name, prog))
    }

    /// Catalog courses that would fit a requirement but are not yet in the
    /// schedule, in code order.
    ///
    /// Categories are taken from `prog` if given, otherwise from every
    /// declared program. Name-keyed types (`Core`, `Foundation`,
    /// `SkillsAndPerspective`, custom types) require `name`;
    /// `ProgramElective` requires both `name` and `prog`;
    /// `ProgramRequired` accepts either filter optionally.
    pub fn other_courses_for_reason(
        &self,
        reason: &str,
        name: Option<&str>,
        prog: Option<&str>,
    ) -> Result<Vec<CourseCode>> {
        let kind = self.resolve_reason(reason)?;
        let required = match kind {
            RequirementType::ProgramRequired => None,
            RequirementType::ProgramElective if name.is_none() || prog.is_none() => {
                Some("name and program")
            }
            RequirementType::ProgramElective => None,
            _ if name.is_none() => Some("name"),
            _ => None,
        };
        if let Some(required) = required {
            return Err(ScheduleError::MissingFilter {
                reason: kind.to_string(),
                required,
            });
        }

        let programs = match prog {
            Some(p) => vec![self
                .catalog
                .program(p)
                .ok_or_else(|| ScheduleError::InvalidProgram(p.to_string()))?],
            None => self
                .programs
                .iter()
                .filter_map(|p| self.catalog.program(p))
                .collect(),
        };

        let categories: Vec<_> = programs
            .iter()
            .flat_map(|p| p.categories.iter())
            .filter(|c| c.kind == kind && name.is_none_or(|n| c.name == n))
            .collect();

        Ok(self
            .catalog
            .courses()
            .filter(|course| !self.contains(&course.code))
            .filter(|course| categories.iter().any(|cat| cat.accepts(course)))
            .map(|course| course.code.clone())
            .collect())
    }

    // ======================== Mutation ========================

    /// Declares another program. Declaring a program twice is a no-op.
    pub fn add_program(&mut self, name: &str) -> Result<()> {
        if self.catalog.program(name).is_none() {
            return Err(ScheduleError::InvalidProgram(name.to_string()));
        }
        if !self.programs.iter().any(|p| p == name) {
            self.programs.push(name.to_string());
            self.invalidate();
        }
        Ok(())
    }

    /// Drops a declared program. Returns whether it was declared.
    pub fn remove_program(&mut self, name: &str) -> bool {
        let before = self.programs.len();
        self.programs.retain(|p| p != name);
        let removed = self.programs.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Marks a course as incoming, taking it out of any term bucket.
    pub fn add_incoming(&mut self, code: &str) -> Result<()> {
        let code = self.resolve_course(code)?;
        self.terms.remove(&code);
        self.incoming.insert(code);
        self.invalidate();
        Ok(())
    }

    /// Places a course in a bucket, moving it if it is already in a term.
    ///
    /// # Errors
    /// [`ScheduleError::AlreadyIncoming`] if the course is incoming and the
    /// target is a term bucket.
    pub fn assign(&mut self, code: &str, bucket: Bucket) -> Result<()> {
        if bucket.is_incoming() {
            return self.add_incoming(code);
        }
        let code = self.resolve_course(code)?;
        if self.incoming.contains(&code) {
            return Err(ScheduleError::AlreadyIncoming(code));
        }
        self.terms.remove(&code);
        self.terms.insert(bucket, code);
        self.invalidate();
        Ok(())
    }

    /// Removes a course from the schedule. Returns the bucket it was in.
    pub fn remove_course(&mut self, code: &str) -> Result<Option<Bucket>> {
        let code: CourseCode = code.parse()?;
        let removed = if self.incoming.remove(&code) {
            Some(Bucket::Incoming)
        } else {
            self.terms.remove(&code)
        };
        if removed.is_some() {
            self.invalidate();
        }
        Ok(removed)
    }

    /// Replaces every term bucket with the given semesters (keyed `1..=n`),
    /// and the incoming set if one is given.
    ///
    /// The schedule is left unchanged if any course is invalid.
    pub fn replace_courses<I, T, S>(&mut self, semesters: I, incoming: Option<&[S]>) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let new_incoming = match incoming {
            Some(list) => list
                .iter()
                .map(|c| self.resolve_course(c.as_ref()))
                .collect::<Result<BTreeSet<_>>>()?,
            None => self.incoming.clone(),
        };

        let mut terms = TermBuckets::new();
        for (i, semester) in semesters.into_iter().enumerate() {
            let bucket = Bucket::semester((i + 1).to_string());
            for code in semester {
                let code = self.resolve_course(code.as_ref())?;
                if new_incoming.contains(&code) {
                    return Err(ScheduleError::AlreadyIncoming(code));
                }
                terms.insert(bucket.clone(), code);
            }
        }

        self.incoming = new_incoming;
        self.terms = terms;
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    fn resolve_course(&self, code: &str) -> Result<CourseCode> {
        let parsed: CourseCode = code.parse()?;
        if self.catalog.contains_course(&parsed) {
            Ok(parsed)
        } else {
            Err(ScheduleError::InvalidCourse(code.to_string()))
        }
    }

    fn resolve_reason(&self, reason: &str) -> Result<RequirementType> {
        self.catalog
            .resolve_type(reason)
            .ok_or_else(|| ScheduleError::UnknownReasonType(reason.to_string()))
    }
}

impl PartialEq for Schedule {
    /// Schedules are equal when they declare the same programs and hold the
    /// same courses in the same buckets. Catalog, config, and cache state
    /// are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.programs == other.programs
            && self.incoming == other.incoming
            && self.terms == other.terms
    }
}
