//! Scoring and negative-control configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONTROL_MAX_COMPOSITE, DEFAULT_CONTROL_MAX_RANK};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Explicit weighting vector keyed by dimension id.
    /// Empty means uniform weights over the schema.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl ScoringConfig {
    pub fn has_explicit_weights(&self) -> bool {
        !self.weights.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NegativeControlConfig {
    /// A control scoring above this composite fails. Default: 0.55.
    pub max_composite: Option<f64>,
    /// A control ranked at or above this position fails. Default: 2.
    pub max_rank: Option<usize>,
}

impl NegativeControlConfig {
    pub fn effective_max_composite(&self) -> f64 {
        self.max_composite.unwrap_or(DEFAULT_CONTROL_MAX_COMPOSITE)
    }

    pub fn effective_max_rank(&self) -> usize {
        self.max_rank.unwrap_or(DEFAULT_CONTROL_MAX_RANK)
    }
}
