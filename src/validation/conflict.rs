//! Conflict validation of lesson entries.
//!
//! Checks a prospective entry against the schedule it would join:
//! - teacher already teaching in the slot
//! - class already hosting a lesson in the slot
//! - subject branch differs from teacher branch
//! - subject level differs from class level (or teacher level)
//! - slot reserved for the class's level
//!
//! The same check drives the generator and manual edits. Validation never
//! mutates the schedule it is given.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TimetableError};
use crate::models::{Catalog, Schedule, ScheduleEntry, TimeSlot, WeekGrid};

/// Read access to who occupies a slot.
///
/// Implemented by [`Schedule`] (linear scan) and [`OccupancyIndex`]
/// (hashed, used by the generator).
pub trait Occupancy {
    /// Entry in which the teacher teaches at `slot`, if any.
    fn teacher_at(&self, teacher_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry>;

    /// Entry hosted by the class at `slot`, if any.
    fn class_at(&self, class_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry>;
}

impl Occupancy for Schedule {
    fn teacher_at(&self, teacher_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.teacher_id == teacher_id && e.slot == slot)
    }

    fn class_at(&self, class_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.class_id == class_id && e.slot == slot)
    }
}

/// Entries with hashed (teacher, slot) and (class, slot) lookups.
///
/// Entries are removed in LIFO order only, which is all the generator's
/// undo stack needs.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    entries: Vec<ScheduleEntry>,
    by_teacher: HashMap<String, HashMap<TimeSlot, usize>>,
    by_class: HashMap<String, HashMap<TimeSlot, usize>>,
}

impl OccupancyIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. The first occupant of a slot stays the one reported.
    pub fn push(&mut self, entry: ScheduleEntry) {
        let idx = self.entries.len();
        self.by_teacher
            .entry(entry.teacher_id.clone())
            .or_default()
            .entry(entry.slot)
            .or_insert(idx);
        self.by_class
            .entry(entry.class_id.clone())
            .or_default()
            .entry(entry.slot)
            .or_insert(idx);
        self.entries.push(entry);
    }

    /// Removes and returns the most recently pushed entry.
    pub fn pop(&mut self) -> Option<ScheduleEntry> {
        let entry = self.entries.pop()?;
        let idx = self.entries.len();
        if let Some(slots) = self.by_teacher.get_mut(&entry.teacher_id) {
            if slots.get(&entry.slot) == Some(&idx) {
                slots.remove(&entry.slot);
            }
        }
        if let Some(slots) = self.by_class.get_mut(&entry.class_id) {
            if slots.get(&entry.slot) == Some(&idx) {
                slots.remove(&entry.slot);
            }
        }
        Some(entry)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts into a schedule, keeping insertion order.
    pub fn into_schedule(self) -> Schedule {
        Schedule::from_entries(self.entries)
    }
}

impl Occupancy for OccupancyIndex {
    fn teacher_at(&self, teacher_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry> {
        self.by_teacher
            .get(teacher_id)
            .and_then(|slots| slots.get(&slot))
            .map(|&i| &self.entries[i])
    }

    fn class_at(&self, class_id: &str, slot: TimeSlot) -> Option<&ScheduleEntry> {
        self.by_class
            .get(class_id)
            .and_then(|slots| slots.get(&slot))
            .map(|&i| &self.entries[i])
    }
}

/// Kind of invariant a candidate would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    /// Teacher already teaches in the slot.
    TeacherBusy,
    /// Class already hosts a lesson in the slot.
    ClassBusy,
    /// Subject branch differs from teacher branch.
    BranchMismatch,
    /// Subject level differs from class or teacher level.
    LevelMismatch,
    /// Slot is reserved for the class's level.
    ReservedSlot,
}

impl ConflictKind {
    /// Kebab-case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::TeacherBusy => "teacher-busy",
            ConflictKind::ClassBusy => "class-busy",
            ConflictKind::BranchMismatch => "branch-mismatch",
            ConflictKind::LevelMismatch => "level-mismatch",
            ConflictKind::ReservedSlot => "reserved-slot",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// What is broken.
    pub kind: ConflictKind,
    /// Human-readable description.
    pub message: String,
    /// Existing entry the candidate collides with (busy conflicts only).
    pub existing: Option<ScheduleEntry>,
}

/// All conflicts a candidate entry would introduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// The checked entry.
    pub candidate: ScheduleEntry,
    /// Conflicts found; empty means the entry may be added.
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Whether the candidate may be added.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Whether a conflict of `kind` was found.
    pub fn has(&self, kind: ConflictKind) -> bool {
        self.conflicts.iter().any(|c| c.kind == kind)
    }

    /// Kinds found, in detection order.
    pub fn kinds(&self) -> Vec<ConflictKind> {
        self.conflicts.iter().map(|c| c.kind).collect()
    }
}

/// Validates entries against an entity snapshot and the weekly grid.
#[derive(Debug, Clone, Copy)]
pub struct ConflictValidator<'a> {
    catalog: &'a Catalog<'a>,
    grid: &'a WeekGrid,
}

impl<'a> ConflictValidator<'a> {
    /// Creates a validator over a snapshot.
    pub fn new(catalog: &'a Catalog<'a>, grid: &'a WeekGrid) -> Self {
        Self { catalog, grid }
    }

    /// Checks `candidate` against the entries of `schedule`.
    ///
    /// # Errors
    /// `UnknownEntity` if any id is absent from the snapshot,
    /// `SlotOutOfGrid` if the slot is not part of the week.
    pub fn validate<O: Occupancy + ?Sized>(
        &self,
        candidate: &ScheduleEntry,
        schedule: &O,
    ) -> Result<ConflictReport> {
        let teacher = self.catalog.teacher(&candidate.teacher_id)?;
        let subject = self.catalog.subject(&candidate.subject_id)?;
        let class = self.catalog.class(&candidate.class_id)?;
        let slot = candidate.slot;
        if !self.grid.contains(slot) {
            return Err(TimetableError::SlotOutOfGrid(slot));
        }

        let mut conflicts = Vec::new();

        if let Some(existing) = schedule.teacher_at(&teacher.id, slot) {
            conflicts.push(Conflict {
                kind: ConflictKind::TeacherBusy,
                message: format!(
                    "Teacher '{}' already teaches class '{}' at {}",
                    teacher.id, existing.class_id, slot
                ),
                existing: Some(existing.clone()),
            });
        }

        if let Some(existing) = schedule.class_at(&class.id, slot) {
            conflicts.push(Conflict {
                kind: ConflictKind::ClassBusy,
                message: format!(
                    "Class '{}' already has subject '{}' at {}",
                    class.id, existing.subject_id, slot
                ),
                existing: Some(existing.clone()),
            });
        }

        if subject.branch != teacher.branch {
            conflicts.push(Conflict {
                kind: ConflictKind::BranchMismatch,
                message: format!(
                    "Subject '{}' ({}) cannot be taught by teacher '{}' ({})",
                    subject.id, subject.branch, teacher.id, teacher.branch
                ),
                existing: None,
            });
        }

        if subject.level != class.level || subject.level != teacher.level {
            conflicts.push(Conflict {
                kind: ConflictKind::LevelMismatch,
                message: format!(
                    "Subject '{}' is {}, class '{}' is {}, teacher '{}' is {}",
                    subject.id, subject.level, class.id, class.level, teacher.id, teacher.level
                ),
                existing: None,
            });
        }

        if self.grid.is_reserved(class.level, slot) {
            conflicts.push(Conflict {
                kind: ConflictKind::ReservedSlot,
                message: format!("{} is reserved for {} classes", slot, class.level),
                existing: None,
            });
        }

        Ok(ConflictReport {
            candidate: candidate.clone(),
            conflicts,
        })
    }

    /// Re-scans a whole schedule.
    ///
    /// Entries are checked in canonical order (slot, class, teacher,
    /// subject), each against the entries before it, so the result does not
    /// depend on how the schedule is stored. Only reports with conflicts are
    /// returned.
    pub fn validate_all(&self, schedule: &Schedule) -> Result<Vec<ConflictReport>> {
        let mut ordered: Vec<&ScheduleEntry> = schedule.entries.iter().collect();
        ordered.sort_by(|a, b| a.canonical_cmp(b));

        let mut seen = OccupancyIndex::new();
        let mut reports = Vec::new();
        for entry in ordered {
            let report = self.validate(entry, &seen)?;
            if !report.is_clean() {
                reports.push(report);
            }
            seen.push(entry.clone());
        }
        Ok(reports)
    }
}

/// Checks one candidate entry. See [`ConflictValidator::validate`].
pub fn validate(
    candidate: &ScheduleEntry,
    schedule: &Schedule,
    catalog: &Catalog<'_>,
    grid: &WeekGrid,
) -> Result<ConflictReport> {
    ConflictValidator::new(catalog, grid).validate(candidate, schedule)
}

/// Re-scans a schedule. See [`ConflictValidator::validate_all`].
pub fn validate_all(
    schedule: &Schedule,
    catalog: &Catalog<'_>,
    grid: &WeekGrid,
) -> Result<Vec<ConflictReport>> {
    ConflictValidator::new(catalog, grid).validate_all(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, ClassGroup, Day, EntryKey, Level, Subject, Teacher};

    struct Fixture {
        teachers: Vec<Teacher>,
        subjects: Vec<Subject>,
        classes: Vec<ClassGroup>,
        grid: WeekGrid,
    }

    fn fixture() -> Fixture {
        let math = Branch::parse("math").unwrap();
        let art = Branch::parse("art").unwrap();
        Fixture {
            teachers: vec![
                Teacher::new("T1", math.clone(), Level::Primary),
                Teacher::new("T2", art.clone(), Level::Primary),
                Teacher::new("T3", math.clone(), Level::Secondary),
            ],
            subjects: vec![
                Subject::new("MATH", math, Level::Primary, 3),
                Subject::new("ART", art, Level::Primary, 2),
            ],
            classes: vec![
                ClassGroup::new("1A", Level::Primary),
                ClassGroup::new("1B", Level::Primary),
                ClassGroup::new("7A", Level::Secondary),
            ],
            grid: WeekGrid::new(Day::WEEKDAYS.to_vec(), 6).with_reserved(Level::Primary, [4]),
        }
    }

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    #[test]
    fn test_clean_candidate() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let candidate = ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Monday, 1));
        let report = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_teacher_busy_only() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let schedule = Schedule::from_entries(vec![ScheduleEntry::new(
            "1A",
            "T1",
            "MATH",
            slot(Day::Monday, 1),
        )]);
        let candidate = ScheduleEntry::new("1B", "T1", "MATH", slot(Day::Monday, 1));
        let report = validate(&candidate, &schedule, &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::TeacherBusy]);
        assert_eq!(
            report.conflicts[0].existing.as_ref().unwrap().key(),
            EntryKey::new("1A", slot(Day::Monday, 1))
        );
    }

    #[test]
    fn test_class_busy() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let schedule = Schedule::from_entries(vec![ScheduleEntry::new(
            "1A",
            "T1",
            "MATH",
            slot(Day::Monday, 1),
        )]);
        let candidate = ScheduleEntry::new("1A", "T2", "ART", slot(Day::Monday, 1));
        let report = validate(&candidate, &schedule, &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::ClassBusy]);
    }

    #[test]
    fn test_branch_and_level_mismatch() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        // Art teacher for math
        let candidate = ScheduleEntry::new("1A", "T2", "MATH", slot(Day::Monday, 1));
        let report = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::BranchMismatch]);

        // Primary subject in a secondary class
        let candidate = ScheduleEntry::new("7A", "T1", "MATH", slot(Day::Monday, 1));
        let report = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::LevelMismatch]);

        // Secondary teacher for a primary subject
        let candidate = ScheduleEntry::new("1A", "T3", "MATH", slot(Day::Monday, 1));
        let report = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::LevelMismatch]);
    }

    #[test]
    fn test_reserved_slot() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let candidate = ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Friday, 4));
        let report = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap();
        assert_eq!(report.kinds(), vec![ConflictKind::ReservedSlot]);
    }

    #[test]
    fn test_multiple_conflicts_enumerated() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("1B", "T2", "ART", slot(Day::Monday, 4)),
            ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Monday, 4)),
        ]);
        let candidate = ScheduleEntry::new("1A", "T2", "MATH", slot(Day::Monday, 4));
        let report = validate(&candidate, &schedule, &catalog, &f.grid).unwrap();
        assert_eq!(
            report.kinds(),
            vec![
                ConflictKind::TeacherBusy,
                ConflictKind::ClassBusy,
                ConflictKind::BranchMismatch,
                ConflictKind::ReservedSlot,
            ]
        );
    }

    #[test]
    fn test_unknown_entity_fails() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let candidate = ScheduleEntry::new("9Z", "T1", "MATH", slot(Day::Monday, 1));
        let err = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap_err();
        assert!(matches!(err, TimetableError::UnknownEntity { .. }));
    }

    #[test]
    fn test_slot_out_of_grid() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let candidate = ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Saturday, 1));
        let err = validate(&candidate, &Schedule::new(), &catalog, &f.grid).unwrap_err();
        assert!(matches!(err, TimetableError::SlotOutOfGrid(_)));
    }

    #[test]
    fn test_validate_all_order_independent() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let a = ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Tuesday, 2));
        let b = ScheduleEntry::new("1B", "T1", "MATH", slot(Day::Tuesday, 2));
        let c = ScheduleEntry::new("1A", "T2", "ART", slot(Day::Monday, 1));

        let forward = Schedule::from_entries(vec![a.clone(), b.clone(), c.clone()]);
        let backward = Schedule::from_entries(vec![c, b, a]);

        let r1 = validate_all(&forward, &catalog, &f.grid).unwrap();
        let r2 = validate_all(&backward, &catalog, &f.grid).unwrap();
        assert_eq!(r1, r2);
        assert_eq!(r1.len(), 1);
        assert_eq!(r1[0].candidate.class_id, "1B");
        assert_eq!(r1[0].kinds(), vec![ConflictKind::TeacherBusy]);
    }

    #[test]
    fn test_validate_all_clean_is_idempotent() {
        let f = fixture();
        let catalog = Catalog::new(&f.teachers, &f.subjects, &f.classes);
        let schedule = Schedule::from_entries(vec![
            ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Monday, 1)),
            ScheduleEntry::new("1B", "T1", "MATH", slot(Day::Monday, 2)),
        ]);
        assert!(validate_all(&schedule, &catalog, &f.grid).unwrap().is_empty());
        assert!(validate_all(&schedule, &catalog, &f.grid).unwrap().is_empty());
    }

    #[test]
    fn test_occupancy_index_pop() {
        let mut index = OccupancyIndex::new();
        index.push(ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Monday, 1)));
        index.push(ScheduleEntry::new("1B", "T2", "ART", slot(Day::Monday, 1)));
        assert!(index.teacher_at("T2", slot(Day::Monday, 1)).is_some());

        let popped = index.pop().unwrap();
        assert_eq!(popped.class_id, "1B");
        assert!(index.teacher_at("T2", slot(Day::Monday, 1)).is_none());
        assert!(index.class_at("1A", slot(Day::Monday, 1)).is_some());
        assert_eq!(index.len(), 1);

        index.pop();
        assert!(index.is_empty());
        assert!(index.pop().is_none());
    }
}
