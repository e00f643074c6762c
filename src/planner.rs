//! Store-driven timetable flows.
//!
//! Ties the generator and the conflict validator to an [`EntityStore`]:
//! generation works on a snapshot taken at the start of the call, and every
//! manual edit is validated against the current committed schedule before
//! it is persisted.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::TimetableConfig;
use crate::error::Result;
use crate::models::{Catalog, EntryKey, ScheduleEntry, WeekGrid};
use crate::scheduler::{CancellationToken, GenerationResult, GenerationStatus, TimetableGenerator};
use crate::store::EntityStore;
use crate::validation::{ConflictReport, ConflictValidator};

/// Which generation outcomes get committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommitPolicy {
    /// Commit only complete schedules.
    #[default]
    CompletedOnly,
    /// Commit complete and partial schedules.
    AllowPartial,
}

impl CommitPolicy {
    fn allows(&self, status: GenerationStatus) -> bool {
        match status {
            GenerationStatus::Completed => true,
            GenerationStatus::PartialSuccess => *self == CommitPolicy::AllowPartial,
            GenerationStatus::Failed => false,
        }
    }
}

/// Generation result plus whether it was committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub result: GenerationResult,
    pub committed: bool,
}

/// Snapshots the store, generates, and commits per `policy`.
///
/// A `Failed` result is never committed; the previous schedule stays.
pub fn generate_and_commit<S: EntityStore + ?Sized>(
    store: &mut S,
    config: &TimetableConfig,
    policy: CommitPolicy,
    cancel: Option<CancellationToken>,
) -> Result<PlanOutcome> {
    let teachers = store.list_teachers()?;
    let subjects = store.list_subjects()?;
    let classes = store.list_classes()?;

    let mut generator =
        TimetableGenerator::new(config.grid.clone()).with_config(config.generator.clone());
    if let Some(token) = cancel {
        generator = generator.with_cancellation(token);
    }
    let result = generator.generate(&teachers, &subjects, &classes)?;

    let committed = policy.allows(result.status);
    if committed {
        store.commit_schedule(result.schedule.clone())?;
        info!(status = ?result.status, "Generated schedule committed");
    } else {
        warn!(status = ?result.status, unmet = result.unmet.len(), "Generated schedule not committed");
    }
    Ok(PlanOutcome { result, committed })
}

/// Outcome of a manual edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOutcome {
    /// The entry was persisted.
    Accepted,
    /// The entry would break an invariant; nothing was persisted.
    Rejected(ConflictReport),
}

/// Validates and persists a manual entry.
///
/// The entry replaces whatever its class holds in the same slot, so it is
/// checked against the committed schedule without that entry.
///
/// # Errors
/// `UnknownEntity` / `SlotOutOfGrid` for malformed entries, or store errors.
pub fn propose_entry<S: EntityStore + ?Sized>(
    store: &mut S,
    grid: &WeekGrid,
    entry: ScheduleEntry,
) -> Result<EditOutcome> {
    let teachers = store.list_teachers()?;
    let subjects = store.list_subjects()?;
    let classes = store.list_classes()?;
    let catalog = Catalog::new(&teachers, &subjects, &classes);

    let current = store.load_schedule()?;
    let remaining = current.without(&entry.key());
    let report = ConflictValidator::new(&catalog, grid).validate(&entry, &remaining)?;

    if report.is_clean() {
        store.upsert_entry(entry)?;
        Ok(EditOutcome::Accepted)
    } else {
        info!(
            class = %entry.class_id,
            slot = %entry.slot,
            conflicts = report.conflicts.len(),
            "Manual entry rejected"
        );
        Ok(EditOutcome::Rejected(report))
    }
}

/// Removes a committed entry.
pub fn remove_entry<S: EntityStore + ?Sized>(store: &mut S, key: &EntryKey) -> Result<ScheduleEntry> {
    store.remove_entry(key)
}
