//! Requirement expansion and ordering.
//!
//! # Algorithm
//! 1. Pair every class with every subject of the same level that has a
//!    positive weekly quota.
//! 2. Pairs with no eligible teacher are reported as infeasible and
//!    excluded from the search.
//! 3. The rest are ordered most-constrained-first: fewest eligible
//!    teachers, then largest quota, then class id, then subject id.
//!
//! # Reference
//! Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach",
//! Ch. 6.3.1 (minimum-remaining-values heuristic)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{eligible_teachers, ClassGroup, Level, Subject, Teacher};

/// A (class, subject) pair needing `weekly_hours` placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Class to receive the lessons.
    pub class_id: String,
    /// Subject to be taught.
    pub subject_id: String,
    /// Shared level of class and subject.
    pub level: Level,
    /// Placements needed.
    pub weekly_hours: u32,
    /// Eligible teacher ids, in search order.
    pub eligible: Vec<String>,
}

/// Why a requirement (or one of its instances) was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnmetReason {
    /// No teacher shares the subject's branch and level.
    InfeasibleRequirement,
    /// The backtrack budget ran out without a free (teacher, slot) pair.
    CapacityExceeded,
    /// Generation was cancelled before the instance was placed.
    Cancelled,
}

impl fmt::Display for UnmetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UnmetReason::InfeasibleRequirement => "infeasible requirement",
            UnmetReason::CapacityExceeded => "capacity exceeded",
            UnmetReason::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// An unplaced requirement or requirement instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmetRequirement {
    /// Class of the requirement.
    pub class_id: String,
    /// Subject of the requirement.
    pub subject_id: String,
    /// Why it is unmet.
    pub reason: UnmetReason,
    /// Periods this record accounts for.
    pub missing: u32,
    /// Human-readable description.
    pub message: String,
}

impl UnmetRequirement {
    /// A requirement nobody can teach. Accounts for the whole quota.
    pub fn infeasible(requirement: &Requirement, branch: impl fmt::Display) -> Self {
        Self {
            class_id: requirement.class_id.clone(),
            subject_id: requirement.subject_id.clone(),
            reason: UnmetReason::InfeasibleRequirement,
            missing: requirement.weekly_hours,
            message: format!(
                "No {} teacher of branch '{}' for subject '{}' in class '{}'",
                requirement.level, branch, requirement.subject_id, requirement.class_id
            ),
        }
    }

    /// Lessons of a searched requirement left unplaced.
    pub fn unplaced(requirement: &Requirement, reason: UnmetReason, missing: u32) -> Self {
        Self {
            class_id: requirement.class_id.clone(),
            subject_id: requirement.subject_id.clone(),
            reason,
            missing,
            message: format!(
                "{} of {} lessons for subject '{}' in class '{}' not placed ({})",
                missing,
                requirement.weekly_hours,
                requirement.subject_id,
                requirement.class_id,
                reason
            ),
        }
    }
}

/// Expands entities into requirements.
///
/// Returns the searchable requirements (unordered) and the infeasible ones.
/// Classes and subjects are visited in id order.
pub fn expand_requirements(
    teachers: &[Teacher],
    subjects: &[Subject],
    classes: &[ClassGroup],
) -> (Vec<Requirement>, Vec<UnmetRequirement>) {
    let mut classes: Vec<&ClassGroup> = classes.iter().collect();
    classes.sort_by(|a, b| a.id.cmp(&b.id));
    let mut subjects: Vec<&Subject> = subjects.iter().collect();
    subjects.sort_by(|a, b| a.id.cmp(&b.id));

    let mut requirements = Vec::new();
    let mut infeasible = Vec::new();

    for class in &classes {
        for subject in subjects
            .iter()
            .filter(|s| s.level == class.level && s.weekly_hours > 0)
        {
            let eligible: Vec<String> = eligible_teachers(subject, teachers)
                .into_iter()
                .map(|t| t.id.clone())
                .collect();
            let requirement = Requirement {
                class_id: class.id.clone(),
                subject_id: subject.id.clone(),
                level: class.level,
                weekly_hours: subject.weekly_hours,
                eligible,
            };
            if requirement.eligible.is_empty() {
                infeasible.push(UnmetRequirement::infeasible(&requirement, &subject.branch));
            } else {
                requirements.push(requirement);
            }
        }
    }

    (requirements, infeasible)
}

/// Sorts requirements most-constrained-first.
pub fn order_requirements(requirements: &mut [Requirement]) {
    requirements.sort_by(|a, b| {
        a.eligible
            .len()
            .cmp(&b.eligible.len())
            .then_with(|| b.weekly_hours.cmp(&a.weekly_hours))
            .then_with(|| a.class_id.cmp(&b.class_id))
            .then_with(|| a.subject_id.cmp(&b.subject_id))
    });
}
