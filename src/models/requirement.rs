//! Requirement categories and eligibility rules.
//!
//! A requirement category is one typed bucket of a program's degree
//! requirements: "3 Core theology courses", "2 program electives from
//! this list". Each carries an eligibility predicate over courses and a
//! cardinality range.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Course, CourseCode};

/// Requirement type tag.
///
/// Reason lookups are grouped by this tag. Built-in tags cover the
/// standard general-education and program buckets; catalogs may declare
/// further types, which become [`RequirementType::Custom`].
/// [`RequirementType::CourseReq`] is always recognized but only credited
/// when a catalog category declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementType {
    /// Institution-wide core curriculum.
    Core,
    /// Foundational general-education requirement.
    Foundation,
    /// Skills and perspectives general-education requirement.
    SkillsAndPerspective,
    /// Course required outright by a program.
    ProgramRequired,
    /// Elective chosen from a program's list.
    ProgramElective,
    /// Course required as a prerequisite of another course.
    CourseReq,
    /// Catalog-declared type.
    Custom(String),
}

impl RequirementType {
    /// Built-in tags, in declaration order.
    pub const BUILTIN: [RequirementType; 6] = [
        RequirementType::Core,
        RequirementType::Foundation,
        RequirementType::SkillsAndPerspective,
        RequirementType::ProgramRequired,
        RequirementType::ProgramElective,
        RequirementType::CourseReq,
    ];

    /// Looks up a built-in tag by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "Core" => Some(Self::Core),
            "Foundation" => Some(Self::Foundation),
            "SkillsAndPerspective" => Some(Self::SkillsAndPerspective),
            "ProgramRequired" => Some(Self::ProgramRequired),
            "ProgramElective" => Some(Self::ProgramElective),
            "CourseReq" => Some(Self::CourseReq),
            _ => None,
        }
    }

    /// Tag name as written in catalogs.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Core => "Core",
            Self::Foundation => "Foundation",
            Self::SkillsAndPerspective => "SkillsAndPerspective",
            Self::ProgramRequired => "ProgramRequired",
            Self::ProgramElective => "ProgramElective",
            Self::CourseReq => "CourseReq",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for RequirementType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::builtin(s).unwrap_or_else(|| Self::Custom(s.to_string())))
    }
}

impl From<String> for RequirementType {
    fn from(value: String) -> Self {
        Self::builtin(&value).unwrap_or(Self::Custom(value))
    }
}

impl From<RequirementType> for String {
    fn from(kind: RequirementType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Eligibility predicate over courses.
///
/// Evaluable against any catalog course. Composite rules nest freely.
///
/// # TOML form
/// ```toml
/// rule = { any = [{ tagged = "lab" }, { courses = ["PHYS-2100"] }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    /// Course is one of the listed codes.
    Courses(Vec<CourseCode>),
    /// Course carries the tag.
    Tagged(String),
    /// Course code has the stem.
    Stem(String),
    /// Numbered course with the stem and a number in `[min, max]`.
    Level {
        stem: String,
        #[serde(default)]
        min: Option<u32>,
        #[serde(default)]
        max: Option<u32>,
    },
    /// Any sub-rule matches.
    Any(Vec<Eligibility>),
    /// Every sub-rule matches.
    All(Vec<Eligibility>),
    /// Sub-rule does not match.
    Not(Box<Eligibility>),
}

impl Eligibility {
    /// Rule matching exactly the listed codes.
    pub fn courses<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = CourseCode>,
    {
        Self::Courses(codes.into_iter().collect())
    }

    /// Evaluates the rule against a course.
    pub fn matches(&self, course: &Course) -> bool {
        match self {
            Self::Courses(codes) => codes.contains(&course.code),
            Self::Tagged(tag) => course.has_tag(tag),
            Self::Stem(stem) => course.code.stem == *stem,
            Self::Level { stem, min, max } => {
                course.code.stem == *stem
                    && course.code.number().is_some_and(|n| {
                        min.is_none_or(|lo| n >= lo) && max.is_none_or(|hi| n <= hi)
                    })
            }
            Self::Any(rules) => rules.iter().any(|r| r.matches(course)),
            Self::All(rules) => rules.iter().all(|r| r.matches(course)),
            Self::Not(rule) => !rule.matches(course),
        }
    }

    /// Every course code named explicitly anywhere in the rule.
    pub fn listed_courses(&self) -> Vec<&CourseCode> {
        let mut out = Vec::new();
        self.collect_listed(&mut out);
        out
    }

    fn collect_listed<'a>(&'a self, out: &mut Vec<&'a CourseCode>) {
        match self {
            Self::Courses(codes) => out.extend(codes.iter()),
            Self::Any(rules) | Self::All(rules) => {
                for r in rules {
                    r.collect_listed(out);
                }
            }
            Self::Not(rule) => rule.collect_listed(out),
            Self::Tagged(_) | Self::Stem(_) | Self::Level { .. } => {}
        }
    }
}

fn default_count() -> usize {
    1
}

/// One requirement category of a program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementCategory {
    /// Category name, unique within its program.
    pub name: String,
    /// Requirement type tag.
    #[serde(rename = "type")]
    pub kind: RequirementType,
    /// Which courses may count toward this category.
    pub rule: Eligibility,
    /// Minimum number of courses for the category to be satisfied.
    #[serde(default = "default_count")]
    pub min: usize,
    /// Maximum number of courses credited to the category.
    #[serde(default = "default_count")]
    pub max: usize,
}

impl RequirementCategory {
    /// Creates a category requiring exactly one eligible course.
    pub fn new(name: impl Into<String>, kind: RequirementType, rule: Eligibility) -> Self {
        Self {
            name: name.into(),
            kind,
            rule,
            min: 1,
            max: 1,
        }
    }

    /// Sets the cardinality range `[min, max]`.
    pub fn with_range(mut self, min: usize, max: usize) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Requires exactly `n` courses.
    pub fn exactly(self, n: usize) -> Self {
        self.with_range(n, n)
    }

    /// Whether a course is eligible for this category.
    #[inline]
    pub fn accepts(&self, course: &Course) -> bool {
        self.rule.matches(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str) -> Course {
        Course::parse(code).unwrap()
    }

    #[test]
    fn test_requirement_type_parse() {
        assert_eq!("Core".parse::<RequirementType>().unwrap(), RequirementType::Core);
        assert_eq!(
            "ProgramElective".parse::<RequirementType>().unwrap(),
            RequirementType::ProgramElective
        );
        assert_eq!(
            "Capstone".parse::<RequirementType>().unwrap(),
            RequirementType::Custom("Capstone".into())
        );
        assert_eq!(RequirementType::builtin("Capstone"), None);
        assert_eq!(RequirementType::builtin("CourseReq"), Some(RequirementType::CourseReq));
        assert_eq!(RequirementType::SkillsAndPerspective.to_string(), "SkillsAndPerspective");
    }

    #[test]
    fn test_requirement_type_serde() {
        let json = serde_json::to_string(&RequirementType::Custom("Capstone".into())).unwrap();
        assert_eq!(json, "\"Capstone\"");
        let core: RequirementType = serde_json::from_str("\"Core\"").unwrap();
        assert_eq!(core, RequirementType::Core);
    }

    #[test]
    fn test_eligibility_courses() {
        let rule = Eligibility::courses(vec![CourseCode::new("THEO", 1100)]);
        assert!(rule.matches(&course("THEO-1100")));
        assert!(!rule.matches(&course("THEO-2100")));
    }

    #[test]
    fn test_eligibility_tag_and_stem() {
        let lab = course("PHYS-2100").with_tag("lab");
        assert!(Eligibility::Tagged("lab".into()).matches(&lab));
        assert!(!Eligibility::Tagged("lab".into()).matches(&course("PHYS-2200")));
        assert!(Eligibility::Stem("PHYS".into()).matches(&lab));
        assert!(!Eligibility::Stem("CHEM".into()).matches(&lab));
    }

    #[test]
    fn test_eligibility_level() {
        let upper = Eligibility::Level {
            stem: "CHEM".into(),
            min: Some(3000),
            max: None,
        };
        assert!(upper.matches(&course("CHEM-3100")));
        assert!(!upper.matches(&course("CHEM-2100")));
        assert!(!upper.matches(&course("CHEM-SPEC")));
        assert!(!upper.matches(&course("PHYS-3100")));

        let band = Eligibility::Level {
            stem: "CHEM".into(),
            min: Some(2000),
            max: Some(2999),
        };
        assert!(band.matches(&course("CHEM-2999")));
        assert!(!band.matches(&course("CHEM-3000")));
    }

    #[test]
    fn test_eligibility_combinators() {
        let rule = Eligibility::All(vec![
            Eligibility::Stem("MATH".into()),
            Eligibility::Not(Box::new(Eligibility::courses(vec![CourseCode::new(
                "MATH", 1000,
            )]))),
        ]);
        assert!(rule.matches(&course("MATH-2000")));
        assert!(!rule.matches(&course("MATH-1000")));

        let any = Eligibility::Any(vec![
            Eligibility::Tagged("writing".into()),
            Eligibility::Stem("ENGL".into()),
        ]);
        assert!(any.matches(&course("ENGL-1000")));
        assert!(any.matches(&course("HIST-1000").with_tag("writing")));
        assert!(!any.matches(&course("HIST-1000")));
    }

    #[test]
    fn test_listed_courses_nested() {
        let rule = Eligibility::Any(vec![
            Eligibility::courses(vec![CourseCode::new("A", 1)]),
            Eligibility::Not(Box::new(Eligibility::courses(vec![CourseCode::new("B", 2)]))),
            Eligibility::Tagged("x".into()),
        ]);
        let listed: Vec<String> = rule.listed_courses().iter().map(|c| c.to_string()).collect();
        assert_eq!(listed, vec!["A-1", "B-2"]);
    }

    #[test]
    fn test_category_builder() {
        let cat = RequirementCategory::new(
            "Electives",
            RequirementType::ProgramElective,
            Eligibility::Stem("STAT".into()),
        )
        .with_range(1, 3);
        assert_eq!(cat.min, 1);
        assert_eq!(cat.max, 3);
        assert!(cat.accepts(&course("STAT-2000")));

        let exact = cat.exactly(2);
        assert_eq!((exact.min, exact.max), (2, 2));
    }
}
