//! Degree program model.

use serde::{Deserialize, Serialize};

use super::RequirementCategory;

/// A degree program: an identifier plus its requirement categories.
///
/// Category order is significant. The matcher fills categories in this
/// order, so an earlier category wins a course eligible for several.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier (e.g. "BA Physics").
    pub name: String,
    /// Requirement categories in declared order.
    #[serde(default)]
    pub categories: Vec<RequirementCategory>,
}

impl Program {
    /// Creates a program with no categories.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
        }
    }

    /// Appends a requirement category.
    pub fn with_category(mut self, category: RequirementCategory) -> Self {
        self.categories.push(category);
        self
    }

    /// Finds a category by name.
    pub fn category(&self, name: &str) -> Option<&RequirementCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}
