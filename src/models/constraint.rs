//! Constraint model predicates.
//!
//! Pure functions over entities and the weekly grid. An empty result is
//! not an error here; callers decide how to surface it.

use std::collections::BTreeSet;

use super::{Branch, Level, Subject, Teacher, TimeSlot, WeekGrid};

/// Teachers whose branch and level match the subject, ordered by id.
pub fn eligible_teachers<'a>(subject: &Subject, teachers: &'a [Teacher]) -> Vec<&'a Teacher> {
    let mut eligible: Vec<&Teacher> = teachers.iter().filter(|t| subject.is_taught_by(t)).collect();
    eligible.sort_by(|a, b| a.id.cmp(&b.id));
    eligible
}

/// Slots of the week not reserved for `level`, in (day, period) order.
pub fn assignable_slots(grid: &WeekGrid, level: Level) -> Vec<TimeSlot> {
    grid.slots()
        .into_iter()
        .filter(|&slot| !grid.is_reserved(level, slot))
        .collect()
}

/// Sorted, deduplicated branches taught by the given subjects.
pub fn branches(subjects: &[Subject]) -> Vec<Branch> {
    subjects
        .iter()
        .map(|s| s.branch.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
