//! Error types for timetable operations.
//!
//! Unsatisfiable requirements are not errors: they are reported inside a
//! [`GenerationResult`](crate::scheduler::GenerationResult). The variants
//! here cover malformed input, boundary parsing, configuration and store
//! failures.

use thiserror::Error;

use crate::models::TimeSlot;
use crate::validation::ValidationError;

/// Crate result type.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Kind of entity referenced by an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Teacher,
    Subject,
    Class,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Teacher => "teacher",
            EntityKind::Subject => "subject",
            EntityKind::Class => "class",
        };
        f.write_str(name)
    }
}

/// Errors raised by the timetable core.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// An id is absent from the entity snapshot.
    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: EntityKind, id: String },

    /// A slot lies outside the configured week.
    #[error("Slot {0} is outside the weekly grid")]
    SlotOutOfGrid(TimeSlot),

    /// Structural problems in the entity set.
    #[error("Invalid input: {} problem(s)", .0.len())]
    InvalidInput(Vec<ValidationError>),

    /// Unrecognised education level label.
    #[error("Invalid level: {0:?}")]
    InvalidLevel(String),

    /// Blank branch label.
    #[error("Branch must not be blank")]
    InvalidBranch,

    /// Configuration could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Entry to remove does not exist.
    #[error("No entry for class {class_id} at {slot}")]
    EntryNotFound { class_id: String, slot: TimeSlot },

    /// Entity store adapter failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl TimetableError {
    pub(crate) fn unknown(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::UnknownEntity {
            kind,
            id: id.into(),
        }
    }
}
