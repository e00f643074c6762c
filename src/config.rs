//! Generator and grid configuration.
//!
//! Loaded from TOML; every field has a default, so an empty document is a
//! valid configuration.
//!
//! ```toml
//! [grid]
//! days = ["monday", "tuesday", "wednesday", "thursday", "friday"]
//! periods_per_day = 8
//!
//! [[grid.reserved]]
//! level = "primary"
//! periods = [5]
//!
//! [generator]
//! backtrack_budget = 256
//! spread_days = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::WeekGrid;

/// Default number of undo steps allowed per requirement.
pub const DEFAULT_BACKTRACK_BUDGET: u32 = 256;

/// Search settings for the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Undo steps allowed per requirement before its remaining instances
    /// are reported as `CapacityExceeded`.
    pub backtrack_budget: u32,
    /// Prefer days not yet used by the same (class, subject) pair.
    pub spread_days: bool,
    /// Seed for shuffling each requirement's teacher order. `None` keeps
    /// teachers ordered by id.
    pub teacher_order_seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            backtrack_budget: DEFAULT_BACKTRACK_BUDGET,
            spread_days: true,
            teacher_order_seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backtrack budget.
    pub fn with_backtrack_budget(mut self, budget: u32) -> Self {
        self.backtrack_budget = budget;
        self
    }

    /// Enables or disables day spreading.
    pub fn with_spread_days(mut self, spread: bool) -> Self {
        self.spread_days = spread;
        self
    }

    /// Sets the teacher-order shuffle seed.
    pub fn with_teacher_order_seed(mut self, seed: u64) -> Self {
        self.teacher_order_seed = Some(seed);
        self
    }
}

/// Full timetable configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Weekly grid.
    pub grid: WeekGrid,
    /// Generator settings.
    pub generator: GeneratorConfig,
}

impl TimetableConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }
}
