//! Formula-variant extraction configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_SLOTS, DEFAULT_MIN_TESTED};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FormulaConfig {
    /// Minimum filled slots for an inscription to count as a variant. Default: 2.
    pub min_slots: Option<usize>,
    /// Testable instances needed before a rule may be labelled confirmed. Default: 3.
    pub min_tested: Option<usize>,
    /// A rule is confirmed when its rate exceeds this. Default: 0.5.
    pub confirm_rate: Option<f64>,
}

impl FormulaConfig {
    pub fn effective_min_slots(&self) -> usize {
        self.min_slots.unwrap_or(DEFAULT_MIN_SLOTS)
    }

    pub fn effective_min_tested(&self) -> usize {
        self.min_tested.unwrap_or(DEFAULT_MIN_TESTED)
    }

    pub fn effective_confirm_rate(&self) -> f64 {
        self.confirm_rate.unwrap_or(0.5)
    }
}
