//! Reason index: why each course counts, and toward what.
//!
//! Every credit the matcher hands out becomes one [`ReasonEntry`]. Entries
//! are grouped by requirement type for direct lookup; filters on category
//! name and program scan linearly within a type.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::matcher::MatchOutcome;
use crate::models::{CourseCode, RequirementType};

/// One credited course: `course` counts toward `category` of `program`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReasonEntry {
    /// Requirement type of the category.
    #[serde(rename = "type")]
    pub kind: RequirementType,
    /// Program the category belongs to.
    pub program: String,
    /// Category name.
    pub name: String,
    /// Credited course.
    pub course: CourseCode,
}

/// Reason entries grouped by requirement type.
///
/// Within a type, entries keep matcher order: programs in declared order,
/// categories in declared order, courses in credit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonIndex {
    by_type: BTreeMap<RequirementType, Vec<ReasonEntry>>,
}

impl ReasonIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a match outcome.
    pub fn from_outcome(outcome: &MatchOutcome) -> Self {
        let mut index = Self::new();
        for program in &outcome.programs {
            for category in &program.categories {
                for course in &category.assigned {
                    index.push(ReasonEntry {
                        kind: category.kind.clone(),
                        program: program.program.clone(),
                        name: category.name.clone(),
                        course: course.clone(),
                    });
                }
            }
        }
        index
    }

    /// Appends an entry under its type.
    pub fn push(&mut self, entry: ReasonEntry) {
        self.by_type.entry(entry.kind.clone()).or_default().push(entry);
    }

    /// Entries of one requirement type.
    pub fn get(&self, kind: &RequirementType) -> &[ReasonEntry] {
        self.by_type.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Requirement types with at least one entry.
    pub fn types(&self) -> impl Iterator<Item = &RequirementType> {
        self.by_type.keys()
    }

    /// Every entry, grouped by type.
    pub fn iter(&self) -> impl Iterator<Item = (&RequirementType, &[ReasonEntry])> {
        self.by_type.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Entries of a type, optionally narrowed to a category name and/or
    /// program.
    pub fn filter<'a>(
        &'a self,
        kind: &RequirementType,
        name: Option<&'a str>,
        program: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ReasonEntry> + 'a {
        self.get(kind).iter().filter(move |e| {
            name.is_none_or(|n| e.name == n) && program.is_none_or(|p| e.program == p)
        })
    }

    /// Distinct courses credited under a type and optional filters, in
    /// first-credit order.
    pub fn courses_for(
        &self,
        kind: &RequirementType,
        name: Option<&str>,
        program: Option<&str>,
    ) -> Vec<CourseCode> {
        let mut seen = HashSet::new();
        self.filter(kind, name, program)
            .filter(|e| seen.insert(&e.course))
            .map(|e| e.course.clone())
            .collect()
    }

    /// Every reason a course was credited, across all types.
    pub fn reasons_for_course(&self, course: &CourseCode) -> Vec<&ReasonEntry> {
        self.by_type
            .values()
            .flatten()
            .filter(|e| e.course == *course)
            .collect()
    }

    /// Reasons regrouped by course.
    pub fn by_course(&self) -> BTreeMap<&CourseCode, Vec<&ReasonEntry>> {
        let mut out: BTreeMap<&CourseCode, Vec<&ReasonEntry>> = BTreeMap::new();
        for entry in self.by_type.values().flatten() {
            out.entry(&entry.course).or_default().push(entry);
        }
        out
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    /// Whether no course was credited.
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
