//! Validation of timetable input and lesson entries.
//!
//! - **`input`**: structural checks on the entity set (duplicate IDs,
//!   blank names, quotas larger than the week)
//! - **`conflict`**: invariant checks on a candidate entry or a whole
//!   schedule (busy teacher/class, branch/level mismatch, reserved slots)

mod conflict;
mod input;

pub use conflict::{
    validate, validate_all, Conflict, ConflictKind, ConflictReport, ConflictValidator, Occupancy,
    OccupancyIndex,
};
pub use input::{validate_input, ValidationError, ValidationErrorKind, ValidationResult};
