//! Input validation for timetable generation.
//!
//! Checks structural integrity of teachers, subjects and classes before
//! generation. Detects:
//! - Duplicate IDs
//! - Empty names
//! - Weekly quotas larger than the assignable slots of a level

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{assignable_slots, ClassGroup, Subject, Teacher, WeekGrid};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A record has a blank name.
    EmptyName,
    /// A subject needs more periods than its level has assignable slots.
    QuotaExceedsGrid,
}

impl ValidationErrorKind {
    /// Whether generation cannot proceed with this error present.
    ///
    /// Names are display data only, so a blank one is reported but does not
    /// stop generation.
    pub fn is_blocking(&self) -> bool {
        matches!(self, ValidationErrorKind::DuplicateId)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn check_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = (&'a str, &'a str)>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for (id, name) in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("{kind} '{id}' has no name"),
            ));
        }
    }
}

/// Validates the entity set of a generation run.
///
/// Checks:
/// 1. No duplicate teacher, subject or class IDs
/// 2. Every record has a non-blank name
/// 3. No subject's weekly hours exceed the assignable slots of its level
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    teachers: &[Teacher],
    subjects: &[Subject],
    classes: &[ClassGroup],
    grid: &WeekGrid,
) -> ValidationResult {
    let mut errors = Vec::new();

    check_ids(
        "teacher",
        teachers.iter().map(|t| (t.id.as_str(), t.name.as_str())),
        &mut errors,
    );
    check_ids(
        "subject",
        subjects.iter().map(|s| (s.id.as_str(), s.name.as_str())),
        &mut errors,
    );
    check_ids(
        "class",
        classes.iter().map(|c| (c.id.as_str(), c.name.as_str())),
        &mut errors,
    );

    for subject in subjects {
        let capacity = assignable_slots(grid, subject.level).len();
        if subject.weekly_hours as usize > capacity {
            errors.push(ValidationError::new(
                ValidationErrorKind::QuotaExceedsGrid,
                format!(
                    "Subject '{}' needs {} periods but {} has only {} assignable slots",
                    subject.id, subject.weekly_hours, subject.level, capacity
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, Day, Level};

    fn math() -> Branch {
        Branch::parse("math").unwrap()
    }

    fn sample() -> (Vec<Teacher>, Vec<Subject>, Vec<ClassGroup>) {
        (
            vec![Teacher::new("T1", math(), Level::Primary).with_name("Ayşe")],
            vec![Subject::new("S1", math(), Level::Primary, 4).with_name("Matematik")],
            vec![ClassGroup::new("C1", Level::Primary).with_name("1-A")],
        )
    }

    #[test]
    fn test_valid_input() {
        let (t, s, c) = sample();
        assert!(validate_input(&t, &s, &c, &WeekGrid::default()).is_ok());
    }

    #[test]
    fn test_duplicate_teacher_id() {
        let (mut t, s, c) = sample();
        t.push(Teacher::new("T1", math(), Level::Primary).with_name("Mehmet"));
        let errors = validate_input(&t, &s, &c, &WeekGrid::default()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("teacher")));
    }

    #[test]
    fn test_empty_name() {
        let (t, s, mut c) = sample();
        c.push(ClassGroup::new("C2", Level::Primary));
        let errors = validate_input(&t, &s, &c, &WeekGrid::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyName);
        assert!(!errors[0].kind.is_blocking());
    }

    #[test]
    fn test_quota_exceeds_grid_is_not_blocking() {
        let (t, _, c) = sample();
        let grid = WeekGrid::new(vec![Day::Monday], 3);
        let s = vec![Subject::new("S1", math(), Level::Primary, 5).with_name("Matematik")];
        let errors = validate_input(&t, &s, &c, &grid).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::QuotaExceedsGrid);
        assert!(!errors[0].kind.is_blocking());
    }

    #[test]
    fn test_multiple_errors() {
        let teachers = vec![
            Teacher::new("T1", math(), Level::Primary),
            Teacher::new("T1", math(), Level::Primary),
        ];
        let errors = validate_input(&teachers, &[], &[], &WeekGrid::default()).unwrap_err();
        // two blank names plus one duplicate
        assert_eq!(errors.len(), 3);
        let blocking: Vec<_> = errors.iter().filter(|e| e.kind.is_blocking()).collect();
        assert_eq!(blocking.len(), 1);
        assert_eq!(blocking[0].kind, ValidationErrorKind::DuplicateId);
    }
}
