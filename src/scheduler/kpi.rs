//! Timetable quality metrics (KPIs).
//!
//! Computes summary indicators of a schedule against the weekly quotas
//! declared by subjects.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Required | Sum of weekly hours over all (class, subject) pairs |
//! | Placed | Lessons of those pairs present in the schedule (capped at quota) |
//! | Fill Rate | placed / required |
//! | Teacher Load | Lessons per teacher |
//! | Clustered Pairs | Pairs doubling up on a day while a free day remained |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ClassGroup, Schedule, Subject, WeekGrid};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableKpi {
    /// Periods demanded by all (class, subject) pairs.
    pub required: u64,
    /// Periods satisfied, never more than each pair's quota.
    pub placed: u64,
    /// placed / required (1.0 when nothing is required).
    pub fill_rate: f64,
    /// Lessons per teacher id.
    pub lessons_by_teacher: BTreeMap<String, u32>,
    /// Largest teacher load.
    pub max_teacher_load: u32,
    /// Pairs with two lessons on one day although another day was free.
    pub clustered_pairs: u32,
}

impl TimetableKpi {
    /// Computes KPIs from a schedule and the entities it was built for.
    pub fn calculate(
        schedule: &Schedule,
        subjects: &[Subject],
        classes: &[ClassGroup],
        grid: &WeekGrid,
    ) -> Self {
        let day_count = grid.day_count();
        let mut required = 0u64;
        let mut placed = 0u64;
        let mut clustered_pairs = 0u32;

        for class in classes {
            for subject in subjects
                .iter()
                .filter(|s| s.level == class.level && s.weekly_hours > 0)
            {
                let quota = u64::from(subject.weekly_hours);
                required += quota;
                let count = schedule.lesson_count(&class.id, &subject.id);
                placed += (count as u64).min(quota);

                if count >= 2 {
                    let days = schedule.days_used(&class.id, &subject.id).len();
                    if days < count.min(day_count) {
                        clustered_pairs += 1;
                    }
                }
            }
        }

        let mut lessons_by_teacher: BTreeMap<String, u32> = BTreeMap::new();
        for entry in &schedule.entries {
            *lessons_by_teacher.entry(entry.teacher_id.clone()).or_insert(0) += 1;
        }
        let max_teacher_load = lessons_by_teacher.values().copied().max().unwrap_or(0);

        let fill_rate = if required == 0 {
            1.0
        } else {
            placed as f64 / required as f64
        };

        Self {
            required,
            placed,
            fill_rate,
            lessons_by_teacher,
            max_teacher_load,
            clustered_pairs,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_fill_rate: f64, max_clustered: u32) -> bool {
        self.fill_rate >= min_fill_rate && self.clustered_pairs <= max_clustered
    }
}
