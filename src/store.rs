//! Entity store adapter.
//!
//! The store owns persistence of teachers, subjects, classes and the
//! committed schedule. The core only reads full snapshots and writes back
//! whole schedules or single validated entries. Concurrent edits are
//! serialized by the store, not by the core.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TimetableError};
use crate::models::{Branch, ClassGroup, EntryKey, Level, Schedule, ScheduleEntry, Subject, Teacher};

/// Persistence seam used by the planner.
pub trait EntityStore {
    /// Current teachers.
    fn list_teachers(&self) -> Result<Vec<Teacher>>;

    /// Current subjects.
    fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// Current classes.
    fn list_classes(&self) -> Result<Vec<ClassGroup>>;

    /// Current committed schedule.
    fn load_schedule(&self) -> Result<Schedule>;

    /// Replaces the committed schedule.
    fn commit_schedule(&mut self, schedule: Schedule) -> Result<()>;

    /// Inserts an entry, replacing the one with the same key.
    fn upsert_entry(&mut self, entry: ScheduleEntry) -> Result<()>;

    /// Removes the entry with the given key.
    fn remove_entry(&mut self, key: &EntryKey) -> Result<ScheduleEntry>;
}

/// One row of a bulk teacher import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRow {
    pub name: String,
    pub branch: String,
    pub level: String,
}

impl TeacherRow {
    /// Creates a row.
    pub fn new(name: impl Into<String>, branch: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            level: level.into(),
        }
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// Ids assigned to imported rows, in row order.
    pub imported: Vec<String>,
    /// Skipped rows with their position and reason.
    pub skipped: Vec<(usize, String)>,
}

/// In-memory store.
///
/// `revision` increases on every mutation so callers can detect changes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    classes: Vec<ClassGroup>,
    schedule: Schedule,
    revision: u64,
    next_teacher: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given entities.
    pub fn with_entities(
        teachers: Vec<Teacher>,
        subjects: Vec<Subject>,
        classes: Vec<ClassGroup>,
    ) -> Self {
        Self {
            teachers,
            subjects,
            classes,
            ..Self::default()
        }
    }

    /// Change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Adds a teacher.
    pub fn add_teacher(&mut self, teacher: Teacher) {
        self.teachers.push(teacher);
        self.touch();
    }

    /// Adds a subject.
    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.push(subject);
        self.touch();
    }

    /// Adds a class.
    pub fn add_class(&mut self, class: ClassGroup) {
        self.classes.push(class);
        self.touch();
    }

    /// Imports teachers in bulk.
    ///
    /// Rows with a blank field or an unknown level label are skipped.
    /// Accepted rows receive ids `T1`, `T2`, ... not already in use.
    pub fn import_teachers(&mut self, rows: &[TeacherRow]) -> ImportReport {
        let mut report = ImportReport::default();
        for (i, row) in rows.iter().enumerate() {
            if row.name.trim().is_empty() {
                report.skipped.push((i, "name is blank".to_string()));
                continue;
            }
            let branch = match Branch::parse(&row.branch) {
                Ok(branch) => branch,
                Err(e) => {
                    report.skipped.push((i, e.to_string()));
                    continue;
                }
            };
            let level = match row.level.parse::<Level>() {
                Ok(level) => level,
                Err(e) => {
                    report.skipped.push((i, e.to_string()));
                    continue;
                }
            };
            let id = self.fresh_teacher_id();
            self.teachers
                .push(Teacher::new(id.clone(), branch, level).with_name(row.name.trim()));
            report.imported.push(id);
        }
        if !report.imported.is_empty() {
            self.touch();
        }
        info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "Bulk teacher import"
        );
        report
    }

    fn fresh_teacher_id(&mut self) -> String {
        loop {
            self.next_teacher += 1;
            let id = format!("T{}", self.next_teacher);
            if !self.teachers.iter().any(|t| t.id == id) {
                return id;
            }
        }
    }
}

impl EntityStore for MemoryStore {
    fn list_teachers(&self) -> Result<Vec<Teacher>> {
        Ok(self.teachers.clone())
    }

    fn list_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.subjects.clone())
    }

    fn list_classes(&self) -> Result<Vec<ClassGroup>> {
        Ok(self.classes.clone())
    }

    fn load_schedule(&self) -> Result<Schedule> {
        Ok(self.schedule.clone())
    }

    fn commit_schedule(&mut self, schedule: Schedule) -> Result<()> {
        debug!(entries = schedule.entry_count(), "Committing schedule");
        self.schedule = schedule;
        self.touch();
        Ok(())
    }

    fn upsert_entry(&mut self, entry: ScheduleEntry) -> Result<()> {
        self.schedule.remove(&entry.key());
        self.schedule.add_entry(entry);
        self.touch();
        Ok(())
    }

    fn remove_entry(&mut self, key: &EntryKey) -> Result<ScheduleEntry> {
        let removed = self
            .schedule
            .remove(key)
            .ok_or_else(|| TimetableError::EntryNotFound {
                class_id: key.class_id.clone(),
                slot: key.slot,
            })?;
        self.touch();
        Ok(removed)
    }
}
