//! Term buckets: where a course sits in a schedule.
//!
//! Bucket keys arrive as strings (`"semester-3"`, `"summer-1"`,
//! `"non-term"`) and are decoded once into [`Bucket`]. Everything past
//! construction works with the typed form.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::CourseCode;

const SEMESTER_PREFIX: &str = "semester-";
const SUMMER_PREFIX: &str = "summer-";
const NON_TERM_KEY: &str = "non-term";
const INCOMING_KEY: &str = "incoming";

/// Ordering key of a semester or summer session (the text after the prefix).
///
/// Keys compare numerically when both parse as integers, so `"10"` sorts
/// after `"2"`. Numeric keys sort before non-numeric ones; non-numeric keys
/// compare lexicographically (`"2025-fall"` < `"2026-spring"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermKey(String);

impl TermKey {
    /// Wraps a key suffix.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw suffix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for TermKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for TermKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a course sits in a schedule.
///
/// Variant order is chronological: incoming courses first, then
/// semesters, then summer sessions, then the unscheduled pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Already completed before the schedule starts.
    Incoming,
    /// A regular semester.
    Semester(TermKey),
    /// A summer session.
    Summer(TermKey),
    /// Planned but not placed in any term.
    NonTerm,
}

impl Bucket {
    /// Semester bucket with the given key.
    pub fn semester(key: impl Into<String>) -> Self {
        Self::Semester(TermKey::new(key))
    }

    /// Summer bucket with the given key.
    pub fn summer(key: impl Into<String>) -> Self {
        Self::Summer(TermKey::new(key))
    }

    /// Decodes a bucket key. Returns `None` for unclassified keys.
    ///
    /// # Example
    /// ```
    /// use degree_planner::models::Bucket;
    ///
    /// assert_eq!(Bucket::parse_key("semester-2"), Some(Bucket::semester("2")));
    /// assert_eq!(Bucket::parse_key("non-term"), Some(Bucket::NonTerm));
    /// assert_eq!(Bucket::parse_key("transfer"), None);
    /// ```
    pub fn parse_key(key: &str) -> Option<Self> {
        if let Some(suffix) = key.strip_prefix(SEMESTER_PREFIX) {
            Some(Self::semester(suffix))
        } else if let Some(suffix) = key.strip_prefix(SUMMER_PREFIX) {
            Some(Self::summer(suffix))
        } else if key == NON_TERM_KEY {
            Some(Self::NonTerm)
        } else if key == INCOMING_KEY {
            Some(Self::Incoming)
        } else {
            None
        }
    }

    /// Whether this is the incoming set rather than a term bucket.
    pub fn is_incoming(&self) -> bool {
        matches!(self, Self::Incoming)
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incoming => f.write_str(INCOMING_KEY),
            Self::Semester(k) => write!(f, "{SEMESTER_PREFIX}{k}"),
            Self::Summer(k) => write!(f, "{SUMMER_PREFIX}{k}"),
            Self::NonTerm => f.write_str(NON_TERM_KEY),
        }
    }
}

/// Term-assigned courses of a schedule.
///
/// A course sits in at most one term bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermBuckets {
    semesters: BTreeMap<TermKey, BTreeSet<CourseCode>>,
    summers: BTreeMap<TermKey, BTreeSet<CourseCode>>,
    non_term: BTreeSet<CourseCode>,
}

impl TermBuckets {
    /// Creates empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a course in a term bucket.
    ///
    /// A course already held by another bucket stays in whichever of the two
    /// is chronologically earlier. Returns `false` if the course was not
    /// placed in `bucket`, or if `bucket` is [`Bucket::Incoming`].
    pub fn insert(&mut self, bucket: Bucket, code: CourseCode) -> bool {
        if bucket.is_incoming() {
            return false;
        }
        if let Some(existing) = self.bucket_of(&code) {
            if existing <= bucket {
                return false;
            }
            self.remove(&code);
        }
        match bucket {
            Bucket::Incoming => false,
            Bucket::Semester(k) => self.semesters.entry(k).or_default().insert(code),
            Bucket::Summer(k) => self.summers.entry(k).or_default().insert(code),
            Bucket::NonTerm => self.non_term.insert(code),
        }
    }

    /// Removes a course from whichever term bucket holds it.
    ///
    /// Returns the bucket it was removed from. Emptied semesters and summers
    /// are dropped.
    pub fn remove(&mut self, code: &CourseCode) -> Option<Bucket> {
        if self.non_term.remove(code) {
            return Some(Bucket::NonTerm);
        }
        if let Some(key) = remove_keyed(&mut self.semesters, code) {
            return Some(Bucket::Semester(key));
        }
        remove_keyed(&mut self.summers, code).map(Bucket::Summer)
    }

    /// The term bucket holding a course, if any.
    pub fn bucket_of(&self, code: &CourseCode) -> Option<Bucket> {
        self.iter().find(|(_, c)| *c == code).map(|(b, _)| b)
    }

    /// Whether any term bucket holds the course.
    pub fn contains(&self, code: &CourseCode) -> bool {
        self.bucket_of(code).is_some()
    }

    /// Courses of one bucket, in code order.
    pub fn courses_in(&self, bucket: &Bucket) -> Vec<&CourseCode> {
        match bucket {
            Bucket::Incoming => Vec::new(),
            Bucket::Semester(k) => self.semesters.get(k).into_iter().flatten().collect(),
            Bucket::Summer(k) => self.summers.get(k).into_iter().flatten().collect(),
            Bucket::NonTerm => self.non_term.iter().collect(),
        }
    }

    /// Non-empty buckets in chronological order.
    pub fn buckets(&self) -> Vec<Bucket> {
        let mut out: Vec<Bucket> = self
            .semesters
            .keys()
            .cloned()
            .map(Bucket::Semester)
            .chain(self.summers.keys().cloned().map(Bucket::Summer))
            .collect();
        if !self.non_term.is_empty() {
            out.push(Bucket::NonTerm);
        }
        out
    }

    /// Every term-assigned course with its bucket, in chronological order
    /// (semesters by key, summers by key, then non-term; code order within
    /// a bucket).
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &CourseCode)> + '_ {
        let semesters = self
            .semesters
            .iter()
            .flat_map(|(k, set)| set.iter().map(move |c| (Bucket::Semester(k.clone()), c)));
        let summers = self
            .summers
            .iter()
            .flat_map(|(k, set)| set.iter().map(move |c| (Bucket::Summer(k.clone()), c)));
        let non_term = self.non_term.iter().map(|c| (Bucket::NonTerm, c));
        semesters.chain(summers).chain(non_term)
    }

    /// Total number of term-assigned courses.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no course is term-assigned.
    pub fn is_empty(&self) -> bool {
        self.semesters.values().all(BTreeSet::is_empty)
            && self.summers.values().all(BTreeSet::is_empty)
            && self.non_term.is_empty()
    }
}

fn remove_keyed(
    map: &mut BTreeMap<TermKey, BTreeSet<CourseCode>>,
    code: &CourseCode,
) -> Option<TermKey> {
    let key = map
        .iter()
        .find(|(_, set)| set.contains(code))
        .map(|(k, _)| k.clone())?;
    if let Some(set) = map.get_mut(&key) {
        set.remove(code);
        if set.is_empty() {
            map.remove(&key);
        }
    }
    Some(key)
}
