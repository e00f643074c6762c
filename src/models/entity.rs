//! School entity models.
//!
//! Teachers, subjects and class groups are supplied by the entity store
//! and are immutable for the duration of a generation run. Level and
//! branch are validated when records cross into the core, so comparisons
//! inside the search are plain equality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;

/// Education stage. Partitions teachers, subjects and classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    /// Pre-primary (Anaokulu).
    PrePrimary,
    /// Primary (İlkokul).
    Primary,
    /// Secondary (Ortaokul).
    Secondary,
}

impl Level {
    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::PrePrimary => "pre-primary",
            Level::Primary => "primary",
            Level::Secondary => "secondary",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = TimetableError;

    /// Accepts the canonical labels (case-insensitive) and the school's
    /// Turkish labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "Anaokulu" => return Ok(Level::PrePrimary),
            "İlkokul" => return Ok(Level::Primary),
            "Ortaokul" => return Ok(Level::Secondary),
            _ => {}
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "pre-primary" | "preprimary" | "pre_primary" => Ok(Level::PrePrimary),
            "primary" => Ok(Level::Primary),
            "secondary" => Ok(Level::Secondary),
            _ => Err(TimetableError::InvalidLevel(s.to_string())),
        }
    }
}

/// Specialty category shared by teachers and subjects (e.g. "Matematik").
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Branch(String);

impl Branch {
    /// Parses a branch label, rejecting blank input.
    pub fn parse(label: &str) -> Result<Self, TimetableError> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(TimetableError::InvalidBranch);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Branch {
    type Error = TimetableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Branch::parse(&value)
    }
}

impl From<Branch> for String {
    fn from(branch: Branch) -> Self {
        branch.0
    }
}

/// A teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Subject specialty.
    pub branch: Branch,
    /// Education level taught.
    pub level: Level,
}

/// A subject taught at one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Branch a teacher must share to teach it.
    pub branch: Branch,
    /// Level of classes it is taught to.
    pub level: Level,
    /// Periods per week each class of this level must receive.
    pub weekly_hours: u32,
}

/// One class section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Unique class identifier.
    pub id: String,
    /// Display name (e.g. "3-A").
    pub name: String,
    /// Education level.
    pub level: Level,
}

impl Teacher {
    /// Creates a teacher with an empty name.
    pub fn new(id: impl Into<String>, branch: Branch, level: Level) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            branch,
            level,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Subject {
    /// Creates a subject with an empty name.
    pub fn new(id: impl Into<String>, branch: Branch, level: Level, weekly_hours: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            branch,
            level,
            weekly_hours,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the given teacher can teach this subject.
    #[inline]
    pub fn is_taught_by(&self, teacher: &Teacher) -> bool {
        self.branch == teacher.branch && self.level == teacher.level
    }
}

impl ClassGroup {
    /// Creates a class with an empty name.
    pub fn new(id: impl Into<String>, level: Level) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            level,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse_labels() {
        assert_eq!("primary".parse::<Level>().unwrap(), Level::Primary);
        assert_eq!(" Secondary ".parse::<Level>().unwrap(), Level::Secondary);
        assert_eq!("pre-primary".parse::<Level>().unwrap(), Level::PrePrimary);
        assert_eq!("Anaokulu".parse::<Level>().unwrap(), Level::PrePrimary);
        assert_eq!("İlkokul".parse::<Level>().unwrap(), Level::Primary);
        assert_eq!("Ortaokul".parse::<Level>().unwrap(), Level::Secondary);
    }

    #[test]
    fn test_level_parse_rejects_unknown() {
        let err = "Lise".parse::<Level>().unwrap_err();
        assert!(matches!(err, TimetableError::InvalidLevel(ref l) if l == "Lise"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::PrePrimary < Level::Primary);
        assert!(Level::Primary < Level::Secondary);
    }

    #[test]
    fn test_branch_trimmed_and_non_empty() {
        assert_eq!(Branch::parse("  Matematik ").unwrap().as_str(), "Matematik");
        assert!(matches!(Branch::parse("   "), Err(TimetableError::InvalidBranch)));
    }

    #[test]
    fn test_branch_serde_validates() {
        let ok: Branch = serde_json::from_str("\"Fen\"").unwrap();
        assert_eq!(ok.as_str(), "Fen");
        assert!(serde_json::from_str::<Branch>("\"\"").is_err());
    }

    #[test]
    fn test_subject_taught_by() {
        let math = Branch::parse("math").unwrap();
        let subject = Subject::new("S1", math.clone(), Level::Primary, 4);
        assert!(subject.is_taught_by(&Teacher::new("T1", math.clone(), Level::Primary)));
        assert!(!subject.is_taught_by(&Teacher::new("T2", math, Level::Secondary)));
        assert!(!subject.is_taught_by(&Teacher::new(
            "T3",
            Branch::parse("art").unwrap(),
            Level::Primary
        )));
    }
}
