//! School timetable core.
//!
//! Assigns teachers and subjects to classes across a fixed weekly grid
//! without conflicts, validates manual edits, and derives teacher and
//! class views of the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Teacher`, `Subject`, `ClassGroup`,
//!   `WeekGrid`, `TimeSlot`, `Schedule`, plus the constraint predicates
//! - **`validation`**: Input integrity checks and the conflict validator
//! - **`scheduler`**: Backtracking generator, cancellation, KPIs
//! - **`projection`**: Per-teacher and per-class views
//! - **`store`** / **`planner`**: Entity store seam and the generate/edit flows
//! - **`config`**: Grid and generator settings loaded from TOML
//!
//! # Architecture
//!
//! Every call takes an immutable snapshot of the entities and the current
//! schedule. The core holds no state between calls; persistence and
//! serialization of concurrent edits belong to the store.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6

pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod projection;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use error::{Result, TimetableError};
