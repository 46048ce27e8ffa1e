//! Feature perturbation: replace each score by a uniform draw with
//! probability `p` and check whether the leader survives.

use rand::Rng;
use serde::Serialize;
use sigla_core::config::ValidationConfig;
use sigla_core::constants::DEFAULT_PERTURBATION_LEVELS;
use sigla_core::errors::ScoringError;
use sigla_scoring::{ScoreMatrix, WeightVector};
use tracing::{info, warn};

use crate::outcome::{ValidationOutcome, ValidationStatus, ValidationTest};
use crate::trial::{leader_of, run_trials, trial_rng, Grid, Merge, PERTURBATION_SALT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivalTier {
    /// ≥ 0.9
    High,
    /// ≥ 0.7
    Moderate,
    Low,
}

impl SurvivalTier {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 0.9 {
            Self::High
        } else if rate >= 0.7 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelResult {
    pub level: f64,
    pub trials: usize,
    pub survivals: usize,
    pub survival_rate: f64,
    pub tier: SurvivalTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerturbationReport {
    pub status: ValidationStatus,
    pub seed: u64,
    pub leader: Option<String>,
    /// In the order the levels were given.
    pub levels: Vec<LevelResult>,
}

impl PerturbationReport {
    pub fn level(&self, level: f64) -> Option<&LevelResult> {
        self.levels.iter().find(|l| (l.level - level).abs() < 1e-12)
    }

    pub fn outcome(&self) -> ValidationOutcome {
        let Some(leader) = &self.leader else {
            return ValidationOutcome::insufficient(ValidationTest::Perturbation, "fewer than two candidates");
        };
        let worst = self
            .levels
            .iter()
            .map(|l| l.survival_rate)
            .fold(f64::INFINITY, f64::min);
        ValidationOutcome {
            test: ValidationTest::Perturbation,
            status: self.status,
            estimate: worst.is_finite().then_some(worst),
            interval: None,
            threshold: Some(0.7),
            iterations: self.levels.iter().map(|l| l.trials).sum(),
            summary: self
                .levels
                .iter()
                .map(|l| format!("{leader} survives {:.0}% at p={:.2}", l.survival_rate * 100.0, l.level))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

struct Survivals(usize);

impl Merge for Survivals {
    fn merge(self, other: Self) -> Self {
        Survivals(self.0 + other.0)
    }
}

#[derive(Debug, Clone)]
pub struct Perturbation {
    trials: usize,
    levels: Vec<f64>,
    seed: u64,
    parallel: bool,
}

impl Perturbation {
    pub fn new(trials: usize, seed: u64) -> Self {
        Self {
            trials,
            levels: DEFAULT_PERTURBATION_LEVELS.to_vec(),
            seed,
            parallel: true,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            trials: config.effective_perturbation_trials(),
            levels: config.effective_perturbation_levels(),
            seed: config.effective_seed(),
            parallel: config.effective_parallel(),
        }
    }

    pub fn with_levels(mut self, levels: &[f64]) -> Self {
        self.levels = levels.to_vec();
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<PerturbationReport, ScoringError> {
        let grid = match Grid::from_matrix(matrix, weights)? {
            Some(g) if g.len() >= 2 && self.trials > 0 => g,
            _ => {
                return Ok(PerturbationReport {
                    status: ValidationStatus::Insufficient,
                    seed: self.seed,
                    leader: None,
                    levels: Vec::new(),
                })
            }
        };
        let observed = grid.observed();
        let leader = leader_of(&grid.ids, &observed);

        let mut levels = Vec::with_capacity(self.levels.len());
        for (l, &level) in self.levels.iter().enumerate() {
            if !(level > 0.0 && level < 1.0) {
                warn!(level, "perturbation level outside (0,1) skipped");
                continue;
            }
            // Each level gets its own block of streams.
            let offset = (l as u64) << 32;
            let survivals = run_trials(
                self.trials,
                self.parallel,
                || Survivals(0),
                |acc, t| {
                    let mut rng = trial_rng(self.seed, PERTURBATION_SALT, offset | t);
                    let scores: Vec<Vec<f64>> = grid
                        .scores
                        .iter()
                        .map(|row| {
                            row.iter()
                                .map(|&s| if rng.gen_bool(level) { rng.gen::<f64>() } else { s })
                                .collect()
                        })
                        .collect();
                    let composites = grid.composites(&scores, &grid.weights);
                    if leader_of(&grid.ids, &composites) == leader {
                        acc.0 += 1;
                    }
                },
            );
            let rate = survivals.0 as f64 / self.trials as f64;
            levels.push(LevelResult {
                level,
                trials: self.trials,
                survivals: survivals.0,
                survival_rate: rate,
                tier: SurvivalTier::from_rate(rate),
            });
        }

        let status = if levels.is_empty() {
            ValidationStatus::Insufficient
        } else {
            ValidationStatus::from_pass(levels.iter().all(|l| l.tier != SurvivalTier::Low))
        };
        info!(leader = %grid.ids[leader], levels = levels.len(), "perturbation complete");
        Ok(PerturbationReport {
            status,
            seed: self.seed,
            leader: Some(grid.ids[leader].clone()),
            levels,
        })
    }
}
