//! Immutable entity snapshot.
//!
//! Taken once at the start of a generation run or a manual edit. All
//! lookups by id go through here so that unknown ids surface as
//! [`TimetableError::UnknownEntity`].

use std::collections::HashMap;

use super::{ClassGroup, Subject, Teacher};
use crate::error::{EntityKind, Result, TimetableError};

/// Id-indexed view over borrowed entity slices.
///
/// When ids are duplicated, the first record wins; use
/// [`validate_input`](crate::validation::validate_input) to reject such input.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    teachers: &'a [Teacher],
    subjects: &'a [Subject],
    classes: &'a [ClassGroup],
    teacher_index: HashMap<&'a str, usize>,
    subject_index: HashMap<&'a str, usize>,
    class_index: HashMap<&'a str, usize>,
}

fn index_by_id<'a, T>(items: &'a [T], id: impl Fn(&'a T) -> &'a str) -> HashMap<&'a str, usize> {
    let mut index = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        index.entry(id(item)).or_insert(i);
    }
    index
}

impl<'a> Catalog<'a> {
    /// Indexes the given entities.
    pub fn new(teachers: &'a [Teacher], subjects: &'a [Subject], classes: &'a [ClassGroup]) -> Self {
        Self {
            teachers,
            subjects,
            classes,
            teacher_index: index_by_id(teachers, |t| t.id.as_str()),
            subject_index: index_by_id(subjects, |s| s.id.as_str()),
            class_index: index_by_id(classes, |c| c.id.as_str()),
        }
    }

    /// Looks up a teacher.
    pub fn teacher(&self, id: &str) -> Result<&'a Teacher> {
        self.teacher_index
            .get(id)
            .map(|&i| &self.teachers[i])
            .ok_or_else(|| TimetableError::unknown(EntityKind::Teacher, id))
    }

    /// Looks up a subject.
    pub fn subject(&self, id: &str) -> Result<&'a Subject> {
        self.subject_index
            .get(id)
            .map(|&i| &self.subjects[i])
            .ok_or_else(|| TimetableError::unknown(EntityKind::Subject, id))
    }

    /// Looks up a class.
    pub fn class(&self, id: &str) -> Result<&'a ClassGroup> {
        self.class_index
            .get(id)
            .map(|&i| &self.classes[i])
            .ok_or_else(|| TimetableError::unknown(EntityKind::Class, id))
    }
}
