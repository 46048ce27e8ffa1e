//! Statistical validation configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALPHA, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_LEXICAL_ITERATIONS,
    DEFAULT_PERMUTATION_ITERATIONS, DEFAULT_PERTURBATION_LEVELS, DEFAULT_PERTURBATION_TRIALS,
    DEFAULT_SEED,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Base random seed. Default: 42.
    pub seed: Option<u64>,
    /// Default: 10,000.
    pub bootstrap_iterations: Option<usize>,
    /// Default: 10,000.
    pub permutation_iterations: Option<usize>,
    /// Trials per noise level. Default: 1,000.
    pub perturbation_trials: Option<usize>,
    /// Noise levels in (0,1). Default: 0.10 through 0.30 in steps of 0.05.
    #[serde(default)]
    pub perturbation_levels: Vec<f64>,
    /// Pseudo-lexicon draws. Default: 1,000.
    pub lexical_iterations: Option<usize>,
    /// Significance level. Default: 0.05.
    pub alpha: Option<f64>,
    /// Run trials on the rayon pool. Default: true.
    pub parallel: Option<bool>,
}

impl ValidationConfig {
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn effective_bootstrap_iterations(&self) -> usize {
        self.bootstrap_iterations.unwrap_or(DEFAULT_BOOTSTRAP_ITERATIONS)
    }

    pub fn effective_permutation_iterations(&self) -> usize {
        self.permutation_iterations
            .unwrap_or(DEFAULT_PERMUTATION_ITERATIONS)
    }

    pub fn effective_perturbation_trials(&self) -> usize {
        self.perturbation_trials.unwrap_or(DEFAULT_PERTURBATION_TRIALS)
    }

    pub fn effective_perturbation_levels(&self) -> Vec<f64> {
        if self.perturbation_levels.is_empty() {
            DEFAULT_PERTURBATION_LEVELS.to_vec()
        } else {
            self.perturbation_levels.clone()
        }
    }

    pub fn effective_lexical_iterations(&self) -> usize {
        self.lexical_iterations.unwrap_or(DEFAULT_LEXICAL_ITERATIONS)
    }

    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
