//! Timetable generation and KPI evaluation.
//!
//! # Algorithm
//!
//! `TimetableGenerator` runs a most-constrained-first backtracking search
//! with an explicit undo stack and a per-requirement backtrack budget. The
//! conflict validator is the feasibility check at every step.
//!
//! # KPI
//!
//! `TimetableKpi` computes fill rate, teacher load and day clustering of a
//! schedule.
//!
//! # References
//!
//! - Russell & Norvig (2020), "Artificial Intelligence: A Modern Approach", Ch. 6
//! - Schaerf (1999), "A Survey of Automated Timetabling"

mod cancel;
mod generator;
mod kpi;
mod requirement;

pub use cancel::CancellationToken;
pub use generator::{generate, GenerationResult, GenerationStatus, TimetableGenerator};
pub use kpi::TimetableKpi;
pub use requirement::{
    expand_requirements, order_requirements, Requirement, UnmetReason, UnmetRequirement,
};
