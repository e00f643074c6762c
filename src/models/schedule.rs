//! Schedule (solution) model.
//!
//! A schedule is the canonical set of lesson entries for one planning
//! cycle. Teacher and class views are derived from it on demand
//! (see [`crate::projection`]) and never stored separately.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Day, TimeSlot};

/// One lesson: a teacher teaching a subject to a class in a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Class receiving the lesson.
    pub class_id: String,
    /// Teacher giving the lesson.
    pub teacher_id: String,
    /// Subject taught.
    pub subject_id: String,
    /// Weekly slot.
    pub slot: TimeSlot,
}

/// Identity of an entry in a committed schedule.
///
/// A class hosts at most one lesson per slot, so (class, slot) is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryKey {
    pub class_id: String,
    pub slot: TimeSlot,
}

impl ScheduleEntry {
    /// Creates an entry.
    pub fn new(
        class_id: impl Into<String>,
        teacher_id: impl Into<String>,
        subject_id: impl Into<String>,
        slot: TimeSlot,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            teacher_id: teacher_id.into(),
            subject_id: subject_id.into(),
            slot,
        }
    }

    /// The entry's identity.
    pub fn key(&self) -> EntryKey {
        EntryKey {
            class_id: self.class_id.clone(),
            slot: self.slot,
        }
    }

    /// Canonical sort key: slot, then class, teacher, subject.
    pub(crate) fn canonical_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.slot
            .cmp(&other.slot)
            .then_with(|| self.class_id.cmp(&other.class_id))
            .then_with(|| self.teacher_id.cmp(&other.teacher_id))
            .then_with(|| self.subject_id.cmp(&other.subject_id))
    }
}

impl EntryKey {
    /// Creates a key.
    pub fn new(class_id: impl Into<String>, slot: TimeSlot) -> Self {
        Self {
            class_id: class_id.into(),
            slot,
        }
    }
}

/// The set of all entries for a planning cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Lesson entries.
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from entries.
    pub fn from_entries(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// Adds an entry.
    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Removes the entry with the given key, returning it.
    pub fn remove(&mut self, key: &EntryKey) -> Option<ScheduleEntry> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.class_id == key.class_id && e.slot == key.slot)?;
        Some(self.entries.remove(idx))
    }

    /// Finds the entry with the given key.
    pub fn get(&self, key: &EntryKey) -> Option<&ScheduleEntry> {
        self.entries
            .iter()
            .find(|e| e.class_id == key.class_id && e.slot == key.slot)
    }

    /// Copy of this schedule without the entry at `key`.
    pub fn without(&self, key: &EntryKey) -> Schedule {
        Schedule {
            entries: self
                .entries
                .iter()
                .filter(|e| !(e.class_id == key.class_id && e.slot == key.slot))
                .cloned()
                .collect(),
        }
    }

    /// Sorts entries canonically (slot, class, teacher, subject).
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.canonical_cmp(b));
    }

    /// Number of lessons of `subject_id` given to `class_id`.
    pub fn lesson_count(&self, class_id: &str, subject_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.class_id == class_id && e.subject_id == subject_id)
            .count()
    }

    /// Days on which `class_id` has `subject_id`.
    pub fn days_used(&self, class_id: &str, subject_id: &str) -> BTreeSet<Day> {
        self.entries
            .iter()
            .filter(|e| e.class_id == class_id && e.subject_id == subject_id)
            .map(|e| e.slot.day)
            .collect()
    }

    /// Number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add_entry(ScheduleEntry::new("C1", "T1", "MATH", slot(Day::Tuesday, 1)));
        s.add_entry(ScheduleEntry::new("C1", "T1", "MATH", slot(Day::Monday, 2)));
        s.add_entry(ScheduleEntry::new("C2", "T2", "ART", slot(Day::Monday, 2)));
        s
    }

    #[test]
    fn test_lesson_count_and_days() {
        let s = sample_schedule();
        assert_eq!(s.lesson_count("C1", "MATH"), 2);
        assert_eq!(s.lesson_count("C2", "MATH"), 0);
        let days: Vec<Day> = s.days_used("C1", "MATH").into_iter().collect();
        assert_eq!(days, vec![Day::Monday, Day::Tuesday]);
    }

    #[test]
    fn test_remove_by_key() {
        let mut s = sample_schedule();
        let removed = s.remove(&EntryKey::new("C2", slot(Day::Monday, 2))).unwrap();
        assert_eq!(removed.teacher_id, "T2");
        assert_eq!(s.entry_count(), 2);
        assert!(s.remove(&EntryKey::new("C2", slot(Day::Monday, 2))).is_none());
    }

    #[test]
    fn test_without_leaves_original() {
        let s = sample_schedule();
        let key = EntryKey::new("C1", slot(Day::Monday, 2));
        let reduced = s.without(&key);
        assert_eq!(reduced.entry_count(), 2);
        assert!(reduced.get(&key).is_none());
        assert!(s.get(&key).is_some());
    }

    #[test]
    fn test_canonical_sort() {
        let mut s = sample_schedule();
        s.sort();
        let order: Vec<(&str, TimeSlot)> = s
            .entries
            .iter()
            .map(|e| (e.class_id.as_str(), e.slot))
            .collect();
        assert_eq!(
            order,
            vec![
                ("C1", slot(Day::Monday, 2)),
                ("C2", slot(Day::Monday, 2)),
                ("C1", slot(Day::Tuesday, 1)),
            ]
        );
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new();
        assert!(s.is_empty());
        assert_eq!(s.entry_count(), 0);
    }
}
