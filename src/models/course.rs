//! Course model.
//!
//! A course is the unit that gets credited toward requirements. Courses are
//! identified by a typed code of the form `STEM-SUFFIX`, e.g. `THEO-1100`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// Course identifier: a subject stem plus a numeric or special suffix.
///
/// # Ordering
/// Codes sort by stem, then numeric suffixes (numerically) before special
/// suffixes (lexicographically). This is the order used by
/// [`ScanOrder::ById`](crate::config::ScanOrder::ById).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode {
    /// Subject stem (e.g. "THEO").
    pub stem: String,
    /// Number or special designator.
    pub suffix: CourseSuffix,
}

/// The part of a course code after the dash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CourseSuffix {
    /// Catalog number (e.g. 1100).
    Number(u32),
    /// Non-numeric designator (e.g. "SPEC", "1XXX").
    Special(String),
}

impl CourseCode {
    /// Creates a numbered course code.
    pub fn new(stem: impl Into<String>, number: u32) -> Self {
        Self {
            stem: stem.into(),
            suffix: CourseSuffix::Number(number),
        }
    }

    /// Catalog number, if the suffix is numeric.
    pub fn number(&self) -> Option<u32> {
        match self.suffix {
            CourseSuffix::Number(n) => Some(n),
            CourseSuffix::Special(_) => None,
        }
    }
}

impl FromStr for CourseCode {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stem, suffix) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| ScheduleError::InvalidCourse(s.to_string()))?;
        if stem.is_empty() || suffix.is_empty() {
            return Err(ScheduleError::InvalidCourse(s.to_string()));
        }
        let suffix = match canonical_number(suffix) {
            Some(n) => CourseSuffix::Number(n),
            None => CourseSuffix::Special(suffix.to_string()),
        };
        Ok(Self {
            stem: stem.to_string(),
            suffix,
        })
    }
}

/// Parses a suffix that renders back to itself as a number: ASCII digits
/// with no sign or leading zero.
fn canonical_number(suffix: &str) -> Option<u32> {
    let digits = suffix.bytes().all(|b| b.is_ascii_digit());
    if !digits || (suffix.len() > 1 && suffix.starts_with('0')) {
        return None;
    }
    suffix.parse().ok()
}

impl TryFrom<String> for CourseCode {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suffix {
            CourseSuffix::Number(n) => write!(f, "{}-{n}", self.stem),
            CourseSuffix::Special(s) => write!(f, "{}-{s}", self.stem),
        }
    }
}

/// A catalog course.
///
/// Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    pub code: CourseCode,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Credit weight.
    #[serde(default)]
    pub credits: u32,
    /// Category tags this course carries (e.g. "writing-intensive").
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Course {
    /// Creates a course with no title, credits, or tags.
    pub fn new(code: CourseCode) -> Self {
        Self {
            code,
            title: String::new(),
            credits: 0,
            tags: BTreeSet::new(),
        }
    }

    /// Parses a course code and creates the course.
    pub fn parse(code: &str) -> Result<Self, ScheduleError> {
        Ok(Self::new(code.parse()?))
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the credit weight.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = credits;
        self
    }

    /// Adds a category tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether this course carries a tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
