//! Timetable domain models.
//!
//! Provides the core data types for school timetabling: the entities
//! supplied by the store, the weekly grid, and the schedule of lessons.
//!
//! # Domain Mappings
//!
//! | school-timetable | Generic scheduling |
//! |------------------|--------------------|
//! | ClassGroup | Task owner |
//! | Teacher | Resource |
//! | TimeSlot | Time window |
//! | ScheduleEntry | Assignment |

mod calendar;
mod catalog;
mod constraint;
mod entity;
mod schedule;

pub use calendar::{Day, ReservedPeriods, TimeSlot, WeekGrid};
pub use catalog::Catalog;
pub use constraint::{assignable_slots, branches, eligible_teachers};
pub use entity::{Branch, ClassGroup, Level, Subject, Teacher};
pub use schedule::{EntryKey, Schedule, ScheduleEntry};
