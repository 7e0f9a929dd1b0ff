//! Matcher configuration.
//!
//! ```toml
//! scan_order = "chronological"   # or "by_id"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ScheduleError};

/// Order in which the matcher scans the course pool for each category.
///
/// When several courses are eligible for one category, the first ones in
/// scan order are credited. The order is total, so matching is
/// reproducible across runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// Incoming, then semesters, summers, and the non-term pool; course
    /// code order within a bucket.
    #[default]
    Chronological,
    /// Course code order over the whole pool.
    ById,
}

/// Matcher settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Tie-break order for eligible courses.
    pub scan_order: ScanOrder,
}

impl MatchConfig {
    /// Sets the scan order.
    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }

    /// Parses a TOML config document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScheduleError::Catalog(format!("config: {e}")))
    }

    /// Loads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads a TOML config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Self::default();
            }
        };

        match Self::from_toml_str(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_chronological() {
        assert_eq!(MatchConfig::default().scan_order, ScanOrder::Chronological);
    }

    #[test]
    fn test_parse_scan_order() {
        let config = MatchConfig::from_toml_str("scan_order = \"by_id\"").unwrap();
        assert_eq!(config.scan_order, ScanOrder::ById);

        let empty = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(empty, MatchConfig::default());
    }

    #[test]
    fn test_parse_rejects_unknown_order() {
        assert!(MatchConfig::from_toml_str("scan_order = \"random\"").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scan_order = \"by_id\"").unwrap();
        assert_eq!(
            MatchConfig::load_or_default(file.path()).scan_order,
            ScanOrder::ById
        );

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "scan_order = 42").unwrap();
        assert_eq!(MatchConfig::load_or_default(bad.path()), MatchConfig::default());

        assert_eq!(
            MatchConfig::load_or_default("/nonexistent/degree-planner.toml"),
            MatchConfig::default()
        );
    }
}
