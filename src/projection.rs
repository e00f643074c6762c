//! Read-only schedule views.
//!
//! Teacher and class timetables are recomputed from the canonical
//! [`Schedule`] on every call. These views (and a generation summary) are
//! all a display or export collaborator gets to see.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Catalog, Schedule, ScheduleEntry, TimeSlot, WeekGrid};

/// Entries taught by a teacher, ordered by (day, period).
pub fn by_teacher(schedule: &Schedule, teacher_id: &str) -> Vec<ScheduleEntry> {
    let mut entries: Vec<ScheduleEntry> = schedule
        .entries
        .iter()
        .filter(|e| e.teacher_id == teacher_id)
        .cloned()
        .collect();
    entries.sort_by(|a, b| a.canonical_cmp(b));
    entries
}

/// Entries hosted by a class, ordered by (day, period).
pub fn by_class(schedule: &Schedule, class_id: &str) -> Vec<ScheduleEntry> {
    let mut entries: Vec<ScheduleEntry> = schedule
        .entries
        .iter()
        .filter(|e| e.class_id == class_id)
        .cloned()
        .collect();
    entries.sort_by(|a, b| a.canonical_cmp(b));
    entries
}

/// One cell of a weekly grid view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing scheduled.
    Free,
    /// Break or lunch for the class's level.
    Reserved,
    /// A lesson.
    Lesson(ScheduleEntry),
}

/// A `days x periods` view of one timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridView {
    /// Rows: one per day, in canonical order.
    pub rows: Vec<GridRow>,
}

/// One day of a [`GridView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    /// Slots of the day, period 1 first.
    pub slots: Vec<TimeSlot>,
    /// Cells, parallel to `slots`.
    pub cells: Vec<Cell>,
}

impl GridView {
    /// Cell at a slot, if the slot is part of the view.
    pub fn cell(&self, slot: TimeSlot) -> Option<&Cell> {
        self.rows.iter().find_map(|row| {
            row.slots
                .iter()
                .position(|&s| s == slot)
                .map(|i| &row.cells[i])
        })
    }

    /// Number of lesson cells.
    pub fn lesson_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter())
            .filter(|c| matches!(c, Cell::Lesson(_)))
            .count()
    }
}

fn build_grid(
    grid: &WeekGrid,
    entries: &[ScheduleEntry],
    reserved: impl Fn(TimeSlot) -> bool,
) -> GridView {
    let mut rows: Vec<GridRow> = Vec::new();
    for slot in grid.slots() {
        let cell = match entries.iter().find(|e| e.slot == slot) {
            Some(entry) => Cell::Lesson(entry.clone()),
            None if reserved(slot) => Cell::Reserved,
            None => Cell::Free,
        };
        let same_day = rows
            .last()
            .and_then(|row| row.slots.last())
            .is_some_and(|s| s.day == slot.day);
        match rows.last_mut() {
            Some(row) if same_day => {
                row.slots.push(slot);
                row.cells.push(cell);
            }
            _ => {
                let row = GridRow {
                    slots: vec![slot],
                    cells: vec![cell],
                };
                rows.push(row);
            }
        }
    }
    GridView { rows }
}

/// Weekly grid of a class, with reserved periods of its level filled in.
///
/// # Errors
/// `UnknownEntity` if the class is not in the catalog.
pub fn class_grid(
    schedule: &Schedule,
    catalog: &Catalog<'_>,
    grid: &WeekGrid,
    class_id: &str,
) -> Result<GridView> {
    let class = catalog.class(class_id)?;
    let entries = by_class(schedule, class_id);
    Ok(build_grid(grid, &entries, |slot| {
        grid.is_reserved(class.level, slot)
    }))
}

/// Weekly grid of a teacher. Teachers have no reserved cells.
///
/// # Errors
/// `UnknownEntity` if the teacher is not in the catalog.
pub fn teacher_grid(
    schedule: &Schedule,
    catalog: &Catalog<'_>,
    grid: &WeekGrid,
    teacher_id: &str,
) -> Result<GridView> {
    catalog.teacher(teacher_id)?;
    let entries = by_teacher(schedule, teacher_id);
    Ok(build_grid(grid, &entries, |_| false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, ClassGroup, Day, Level, Teacher};

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    fn sample_schedule() -> Schedule {
        Schedule::from_entries(vec![
            ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Tuesday, 1)),
            ScheduleEntry::new("1B", "T1", "MATH", slot(Day::Monday, 2)),
            ScheduleEntry::new("1A", "T2", "ART", slot(Day::Monday, 1)),
            ScheduleEntry::new("1A", "T1", "MATH", slot(Day::Monday, 3)),
        ])
    }

    #[test]
    fn test_by_teacher_ordered() {
        let entries = by_teacher(&sample_schedule(), "T1");
        let slots: Vec<TimeSlot> = entries.iter().map(|e| e.slot).collect();
        assert_eq!(
            slots,
            vec![
                slot(Day::Monday, 2),
                slot(Day::Monday, 3),
                slot(Day::Tuesday, 1)
            ]
        );
        assert!(by_teacher(&sample_schedule(), "T9").is_empty());
    }

    #[test]
    fn test_by_class_ordered() {
        let entries = by_class(&sample_schedule(), "1A");
        let subjects: Vec<&str> = entries.iter().map(|e| e.subject_id.as_str()).collect();
        assert_eq!(subjects, vec!["ART", "MATH", "MATH"]);
    }

    #[test]
    fn test_projection_leaves_schedule_untouched() {
        let schedule = sample_schedule();
        let before = schedule.clone();
        let _ = by_class(&schedule, "1A");
        let _ = by_teacher(&schedule, "T1");
        assert_eq!(schedule, before);
    }

    #[test]
    fn test_class_grid_marks_reserved() {
        let math = Branch::parse("math").unwrap();
        let teachers = vec![Teacher::new("T1", math, Level::Primary)];
        let classes = vec![ClassGroup::new("1A", Level::Primary)];
        let catalog = Catalog::new(&teachers, &[], &classes);
        let grid = WeekGrid::new(vec![Day::Monday, Day::Tuesday], 3)
            .with_reserved(Level::Primary, [2]);

        let view = class_grid(&sample_schedule(), &catalog, &grid, "1A").unwrap();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].cells.len(), 3);
        assert!(matches!(view.cell(slot(Day::Monday, 1)), Some(Cell::Lesson(e)) if e.subject_id == "ART"));
        assert_eq!(view.cell(slot(Day::Monday, 2)), Some(&Cell::Reserved));
        assert_eq!(view.cell(slot(Day::Tuesday, 3)), Some(&Cell::Free));
        assert_eq!(view.lesson_count(), 3);

        let teacher_view = teacher_grid(&sample_schedule(), &catalog, &grid, "T1").unwrap();
        assert!(matches!(teacher_view.cell(slot(Day::Monday, 2)), Some(Cell::Lesson(_))));
        assert_eq!(teacher_view.cell(slot(Day::Tuesday, 2)), Some(&Cell::Free));

        assert!(class_grid(&sample_schedule(), &catalog, &grid, "9Z").is_err());
    }
}
