//! Backtracking timetable generator.
//!
//! # Algorithm
//!
//! 1. Expand (class, subject) requirements; report those with no eligible
//!    teacher as infeasible.
//! 2. Order the rest most-constrained-first.
//! 3. For each requirement, place its lessons one at a time: scan the
//!    level's assignable slots in (day, period) order and, per slot, the
//!    eligible teachers in order, taking the first pair the conflict
//!    validator accepts. Days not yet used by the requirement are tried
//!    first.
//! 4. On a dead end, undo the requirement's latest placement and resume
//!    its candidate scan. Undo steps are counted against a per-requirement
//!    budget; once spent, the deepest placement set seen is kept and the
//!    remaining lessons are reported as `CapacityExceeded`.
//!
//! The search is sequential and deterministic: identical input yields an
//! identical schedule.
//!
//! # Complexity
//! O(r * h * s * t) validator calls without backtracking, where r =
//! requirements, h = weekly hours, s = slots, t = eligible teachers.
//! Each backtrack adds at most O(s * t) calls.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3 (backtracking search for CSPs)

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, trace, warn};

use super::cancel::CancellationToken;
use super::requirement::{
    expand_requirements, order_requirements, Requirement, UnmetReason, UnmetRequirement,
};
use crate::config::GeneratorConfig;
use crate::error::{Result, TimetableError};
use crate::models::{
    assignable_slots, Catalog, ClassGroup, Day, Level, Schedule, ScheduleEntry, Subject, Teacher,
    TimeSlot, WeekGrid,
};
use crate::validation::{validate_input, ConflictValidator, OccupancyIndex};

/// Outcome classification of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationStatus {
    /// Every requirement fully placed.
    Completed,
    /// Some lessons unmet, at least one placed.
    PartialSuccess,
    /// Nothing could be placed.
    Failed,
}

/// Schedule plus diagnostics of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Generated entries, sorted canonically.
    pub schedule: Schedule,
    /// Every unplaced requirement or lesson.
    pub unmet: Vec<UnmetRequirement>,
    /// Outcome classification.
    pub status: GenerationStatus,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
    /// Undo steps taken across all requirements.
    pub backtracks: u32,
}

impl GenerationResult {
    /// Whether every requirement was fully placed.
    pub fn is_complete(&self) -> bool {
        self.status == GenerationStatus::Completed
    }

    /// Periods missing for a (class, subject) pair.
    pub fn shortfall(&self, class_id: &str, subject_id: &str) -> u32 {
        self.unmet
            .iter()
            .filter(|u| u.class_id == class_id && u.subject_id == subject_id)
            .map(|u| u.missing)
            .sum()
    }

    /// Unmet records with the given reason.
    pub fn unmet_with_reason(&self, reason: UnmetReason) -> Vec<&UnmetRequirement> {
        self.unmet.iter().filter(|u| u.reason == reason).collect()
    }

    fn classify(placed: usize, unmet: &[UnmetRequirement]) -> GenerationStatus {
        if unmet.is_empty() {
            GenerationStatus::Completed
        } else if placed > 0 {
            GenerationStatus::PartialSuccess
        } else {
            GenerationStatus::Failed
        }
    }
}

/// Candidate order for one lesson of a requirement.
#[derive(Debug)]
struct Frame {
    order: Vec<usize>,
    cursor: usize,
}

impl Frame {
    /// Orders candidates with unused days first when `spread` is set.
    fn new(candidates: &[(TimeSlot, &str)], used_days: &BTreeSet<Day>, spread: bool) -> Self {
        let all = 0..candidates.len();
        let order = if spread {
            let (fresh, used): (Vec<usize>, Vec<usize>) =
                all.partition(|&c| !used_days.contains(&candidates[c].0.day));
            fresh.into_iter().chain(used).collect()
        } else {
            all.collect()
        };
        Self { order, cursor: 0 }
    }

    fn next(&mut self) -> Option<usize> {
        let c = self.order.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(c)
    }
}

#[derive(Debug, Default)]
struct Placement {
    placed: usize,
    backtracks: u32,
    interrupted: bool,
}

/// Deterministic backtracking timetable generator.
///
/// # Example
///
/// ```
/// use school_timetable::models::{Branch, ClassGroup, Level, Subject, Teacher, WeekGrid};
/// use school_timetable::scheduler::{GenerationStatus, TimetableGenerator};
///
/// let math = Branch::parse("math").unwrap();
/// let teachers = vec![Teacher::new("T1", math.clone(), Level::Primary).with_name("Ayşe")];
/// let subjects = vec![Subject::new("MATH", math, Level::Primary, 3).with_name("Matematik")];
/// let classes = vec![ClassGroup::new("1A", Level::Primary).with_name("1-A")];
///
/// let generator = TimetableGenerator::new(WeekGrid::default());
/// let result = generator.generate(&teachers, &subjects, &classes).unwrap();
/// assert_eq!(result.status, GenerationStatus::Completed);
/// assert_eq!(result.schedule.entry_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableGenerator {
    grid: WeekGrid,
    config: GeneratorConfig,
    cancel: Option<CancellationToken>,
}

impl TimetableGenerator {
    /// Creates a generator with default settings.
    pub fn new(grid: WeekGrid) -> Self {
        Self {
            grid,
            config: GeneratorConfig::default(),
            cancel: None,
        }
    }

    /// Sets the search configuration.
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets a cancellation token polled between placement steps.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Generates a schedule from a snapshot of the entities.
    ///
    /// # Errors
    /// `InvalidInput` for duplicate ids or blank names. Unsatisfiable
    /// requirements are not errors; they are listed in `unmet`.
    pub fn generate(
        &self,
        teachers: &[Teacher],
        subjects: &[Subject],
        classes: &[ClassGroup],
    ) -> Result<GenerationResult> {
        if let Err(errors) = validate_input(teachers, subjects, classes, &self.grid) {
            let (blocking, advisory): (Vec<_>, Vec<_>) =
                errors.into_iter().partition(|e| e.kind.is_blocking());
            for problem in &advisory {
                warn!("{}", problem.message);
            }
            if !blocking.is_empty() {
                return Err(TimetableError::InvalidInput(blocking));
            }
        }

        let catalog = Catalog::new(teachers, subjects, classes);
        let validator = ConflictValidator::new(&catalog, &self.grid);

        let (mut requirements, mut unmet) = expand_requirements(teachers, subjects, classes);
        for infeasible in &unmet {
            warn!(
                class = %infeasible.class_id,
                subject = %infeasible.subject_id,
                "{}",
                infeasible.message
            );
        }
        order_requirements(&mut requirements);
        if let Some(seed) = self.config.teacher_order_seed {
            let mut rng = StdRng::seed_from_u64(seed);
            for requirement in &mut requirements {
                requirement.eligible.shuffle(&mut rng);
            }
        }

        info!(
            requirements = requirements.len(),
            infeasible = unmet.len(),
            teachers = teachers.len(),
            classes = classes.len(),
            "Starting timetable generation"
        );

        let mut slots_by_level: BTreeMap<Level, Vec<TimeSlot>> = BTreeMap::new();
        let mut index = OccupancyIndex::new();
        let mut backtracks = 0u32;
        let mut cancelled = false;

        for requirement in &requirements {
            let slots = slots_by_level
                .entry(requirement.level)
                .or_insert_with(|| assignable_slots(&self.grid, requirement.level));
            let outcome = self.place(requirement, slots, &validator, &mut index)?;
            backtracks += outcome.backtracks;
            cancelled |= outcome.interrupted;

            let placed = u32::try_from(outcome.placed).unwrap_or(u32::MAX);
            let missing = requirement.weekly_hours.saturating_sub(placed);
            if missing == 0 {
                continue;
            }
            let reason = if outcome.interrupted {
                UnmetReason::Cancelled
            } else {
                warn!(
                    class = %requirement.class_id,
                    subject = %requirement.subject_id,
                    placed,
                    required = requirement.weekly_hours,
                    "Requirement capacity exceeded"
                );
                UnmetReason::CapacityExceeded
            };
            unmet.push(UnmetRequirement::unplaced(requirement, reason, missing));
        }

        let status = GenerationResult::classify(index.len(), &unmet);
        let mut schedule = index.into_schedule();
        schedule.sort();

        info!(
            status = ?status,
            entries = schedule.entry_count(),
            unmet = unmet.len(),
            backtracks,
            cancelled,
            "Timetable generation finished"
        );

        Ok(GenerationResult {
            schedule,
            unmet,
            status,
            cancelled,
            backtracks,
        })
    }

    /// Places the lessons of one requirement on top of `index`.
    ///
    /// Only the requirement's own placements are ever undone, so entries of
    /// earlier requirements stay fixed.
    fn place(
        &self,
        requirement: &Requirement,
        slots: &[TimeSlot],
        validator: &ConflictValidator<'_>,
        index: &mut OccupancyIndex,
    ) -> Result<Placement> {
        let candidates: Vec<(TimeSlot, &str)> = slots
            .iter()
            .flat_map(|&slot| requirement.eligible.iter().map(move |t| (slot, t.as_str())))
            .collect();
        let entry_for = |c: usize| {
            let (slot, teacher_id) = candidates[c];
            ScheduleEntry::new(
                requirement.class_id.as_str(),
                teacher_id,
                requirement.subject_id.as_str(),
                slot,
            )
        };

        // A class holds one lesson per slot, so the slot count bounds placements.
        let target = (requirement.weekly_hours as usize).min(slots.len());
        let mut budget = self.config.backtrack_budget;
        let mut frames: Vec<Frame> = Vec::with_capacity(target);
        let mut placed: Vec<usize> = Vec::with_capacity(target);
        let mut best: Vec<usize> = Vec::new();
        let mut outcome = Placement::default();

        while placed.len() < target {
            if self.is_cancelled() {
                debug!(
                    class = %requirement.class_id,
                    subject = %requirement.subject_id,
                    "Generation cancelled"
                );
                outcome.interrupted = true;
                break;
            }

            if frames.len() == placed.len() {
                let used_days: BTreeSet<Day> =
                    placed.iter().map(|&c| candidates[c].0.day).collect();
                frames.push(Frame::new(&candidates, &used_days, self.config.spread_days));
            }
            let Some(frame) = frames.last_mut() else {
                break;
            };

            let mut found = None;
            while let Some(c) = frame.next() {
                let entry = entry_for(c);
                if validator.validate(&entry, &*index)?.is_clean() {
                    found = Some((c, entry));
                    break;
                }
            }

            match found {
                Some((c, entry)) => {
                    trace!(
                        class = %entry.class_id,
                        subject = %entry.subject_id,
                        teacher = %entry.teacher_id,
                        slot = %entry.slot,
                        "Placed lesson"
                    );
                    index.push(entry);
                    placed.push(c);
                    if placed.len() > best.len() {
                        best.clone_from(&placed);
                    }
                }
                None => {
                    frames.pop();
                    if placed.is_empty() || budget == 0 {
                        break;
                    }
                    budget -= 1;
                    outcome.backtracks += 1;
                    index.pop();
                    placed.pop();
                }
            }
        }

        if placed.len() < best.len() {
            for _ in 0..placed.len() {
                index.pop();
            }
            placed.clear();
            for &c in &best {
                let entry = entry_for(c);
                if validator.validate(&entry, &*index)?.is_clean() {
                    index.push(entry);
                    placed.push(c);
                }
            }
        }

        if outcome.backtracks > 0 {
            debug!(
                class = %requirement.class_id,
                subject = %requirement.subject_id,
                backtracks = outcome.backtracks,
                placed = placed.len(),
                "Backtracking finished"
            );
        }

        outcome.placed = placed.len();
        Ok(outcome)
    }
}

/// Generates a schedule with default settings. See [`TimetableGenerator::generate`].
pub fn generate(
    teachers: &[Teacher],
    subjects: &[Subject],
    classes: &[ClassGroup],
    grid: &WeekGrid,
) -> Result<GenerationResult> {
    TimetableGenerator::new(grid.clone()).generate(teachers, subjects, classes)
}
