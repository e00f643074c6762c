//! Weekly grid and time slot models.
//!
//! # Time Model
//! A week is a fixed grid of `days x periods`. Periods are numbered from 1.
//! Each level may reserve periods (breaks, lunch) which are never
//! assignable for classes of that level.
//!
//! # Ordering
//! Slots order by (day, period). This ordering is the canonical tie-break
//! for every scan in the generator and every projection.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Level;

/// Day of the school week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// Monday through Friday.
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Three-letter abbreviation.
    pub fn short(&self) -> &'static str {
        match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
            Day::Sunday => "Sun",
        }
    }
}

/// One (day, period) cell of the weekly grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSlot {
    /// Day of the week.
    pub day: Day,
    /// Period number (1-based).
    pub period: u8,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(day: Day, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day.short(), self.period)
    }
}

/// Periods reserved for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedPeriods {
    /// Level the reservation applies to.
    pub level: Level,
    /// Reserved period numbers, applied on every day.
    pub periods: Vec<u8>,
}

/// The fixed weekly grid.
///
/// Reserved periods repeat on every day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekGrid {
    /// School days, in any order (slots are always sorted by day).
    pub days: Vec<Day>,
    /// Number of periods per day.
    pub periods_per_day: u8,
    /// Reserved periods per level.
    pub reserved: Vec<ReservedPeriods>,
}

impl Default for WeekGrid {
    /// Monday-Friday, 8 periods. Pre-primary breaks at 3 and lunches at 5,
    /// primary and secondary lunch at 5.
    fn default() -> Self {
        Self::new(Day::WEEKDAYS.to_vec(), 8)
            .with_reserved(Level::PrePrimary, [3, 5])
            .with_reserved(Level::Primary, [5])
            .with_reserved(Level::Secondary, [5])
    }
}

impl WeekGrid {
    /// Creates a grid without reserved periods.
    pub fn new(days: Vec<Day>, periods_per_day: u8) -> Self {
        let mut days = days;
        days.sort();
        days.dedup();
        Self {
            days,
            periods_per_day,
            reserved: Vec::new(),
        }
    }

    /// Reserves periods for a level (merged with existing reservations).
    pub fn with_reserved(mut self, level: Level, periods: impl IntoIterator<Item = u8>) -> Self {
        let periods: Vec<u8> = periods.into_iter().collect();
        match self.reserved.iter_mut().find(|r| r.level == level) {
            Some(existing) => {
                existing.periods.extend(periods);
                existing.periods.sort_unstable();
                existing.periods.dedup();
            }
            None => {
                let mut periods = periods;
                periods.sort_unstable();
                periods.dedup();
                self.reserved.push(ReservedPeriods { level, periods });
            }
        }
        self
    }

    /// Whether the slot is part of this grid.
    pub fn contains(&self, slot: TimeSlot) -> bool {
        self.days.contains(&slot.day) && slot.period >= 1 && slot.period <= self.periods_per_day
    }

    /// Whether the slot's period is reserved for the level.
    pub fn is_reserved(&self, level: Level, slot: TimeSlot) -> bool {
        self.reserved
            .iter()
            .filter(|r| r.level == level)
            .any(|r| r.periods.contains(&slot.period))
    }

    /// All slots of the week in canonical order.
    pub fn slots(&self) -> Vec<TimeSlot> {
        let mut days = self.days.clone();
        days.sort();
        days.dedup();
        days.into_iter()
            .flat_map(|day| (1..=self.periods_per_day).map(move |p| TimeSlot::new(day, p)))
            .collect()
    }

    /// Number of distinct days in the grid.
    pub fn day_count(&self) -> usize {
        self.slots()
            .iter()
            .map(|s| s.day)
            .collect::<std::collections::BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ordering() {
        let a = TimeSlot::new(Day::Monday, 8);
        let b = TimeSlot::new(Day::Tuesday, 1);
        let c = TimeSlot::new(Day::Tuesday, 2);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.to_string(), "Mon/8");
    }

    #[test]
    fn test_grid_slots_canonical_order() {
        let grid = WeekGrid::new(vec![Day::Wednesday, Day::Monday], 2);
        let slots = grid.slots();
        assert_eq!(
            slots,
            vec![
                TimeSlot::new(Day::Monday, 1),
                TimeSlot::new(Day::Monday, 2),
                TimeSlot::new(Day::Wednesday, 1),
                TimeSlot::new(Day::Wednesday, 2),
            ]
        );
    }

    #[test]
    fn test_grid_contains() {
        let grid = WeekGrid::new(vec![Day::Monday], 4);
        assert!(grid.contains(TimeSlot::new(Day::Monday, 1)));
        assert!(grid.contains(TimeSlot::new(Day::Monday, 4)));
        assert!(!grid.contains(TimeSlot::new(Day::Monday, 0)));
        assert!(!grid.contains(TimeSlot::new(Day::Monday, 5)));
        assert!(!grid.contains(TimeSlot::new(Day::Friday, 1)));
    }

    #[test]
    fn test_reserved_per_level() {
        let grid = WeekGrid::new(Day::WEEKDAYS.to_vec(), 6)
            .with_reserved(Level::Primary, [4])
            .with_reserved(Level::Primary, [2, 4]);
        let slot = TimeSlot::new(Day::Thursday, 4);
        assert!(grid.is_reserved(Level::Primary, slot));
        assert!(grid.is_reserved(Level::Primary, TimeSlot::new(Day::Monday, 2)));
        assert!(!grid.is_reserved(Level::Secondary, slot));
        assert_eq!(grid.reserved[0].periods, vec![2, 4]);
    }

    #[test]
    fn test_default_grid() {
        let grid = WeekGrid::default();
        assert_eq!(grid.slots().len(), 40);
        assert_eq!(grid.day_count(), 5);
        assert!(grid.is_reserved(Level::PrePrimary, TimeSlot::new(Day::Monday, 3)));
        assert!(!grid.is_reserved(Level::Primary, TimeSlot::new(Day::Monday, 3)));
    }
}
