//! Permutation test: shuffle each dimension's scores across candidates,
//! breaking the candidate–dimension association, and count how often some
//! other candidate reaches the observed leader's composite.

use rand::seq::SliceRandom;
use serde::Serialize;
use sigla_core::config::ValidationConfig;
use sigla_core::errors::ScoringError;
use sigla_scoring::{ScoreMatrix, WeightVector};
use tracing::info;

use crate::outcome::{percentile, ValidationOutcome, ValidationStatus, ValidationTest};
use crate::trial::{leader_of, run_trials, trial_rng, Grid, Merge, PERMUTATION_SALT};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermutationReport {
    pub status: ValidationStatus,
    pub iterations: usize,
    pub seed: u64,
    pub leader: Option<String>,
    pub observed: f64,
    /// Trials where a non-leader composite ≥ `observed`.
    pub exceedances: usize,
    /// `exceedances / iterations`.
    pub p_value: f64,
    pub alpha: f64,
    /// Mean and 95th percentile of the best non-leader composite under the null.
    pub null_mean: f64,
    pub null_p95: f64,
}

impl PermutationReport {
    fn insufficient(iterations: usize, seed: u64, alpha: f64) -> Self {
        Self {
            status: ValidationStatus::Insufficient,
            iterations,
            seed,
            leader: None,
            observed: 0.0,
            exceedances: 0,
            p_value: 1.0,
            alpha,
            null_mean: 0.0,
            null_p95: 0.0,
        }
    }

    pub fn outcome(&self) -> ValidationOutcome {
        let Some(leader) = &self.leader else {
            return ValidationOutcome::insufficient(ValidationTest::Permutation, "fewer than two candidates");
        };
        ValidationOutcome {
            test: ValidationTest::Permutation,
            status: self.status,
            estimate: Some(self.p_value),
            interval: None,
            threshold: Some(self.alpha),
            iterations: self.iterations,
            summary: format!(
                "{leader} composite {:.3} reached by another candidate in {} of {} permutations",
                self.observed, self.exceedances, self.iterations
            ),
        }
    }
}

struct Tally {
    exceedances: usize,
    best_others: Vec<f64>,
}

impl Merge for Tally {
    fn merge(mut self, other: Self) -> Self {
        self.exceedances += other.exceedances;
        self.best_others.extend(other.best_others);
        self
    }
}

#[derive(Debug, Clone)]
pub struct PermutationTest {
    iterations: usize,
    seed: u64,
    alpha: f64,
    parallel: bool,
}

impl PermutationTest {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed,
            alpha: 0.05,
            parallel: true,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            iterations: config.effective_permutation_iterations(),
            seed: config.effective_seed(),
            alpha: config.effective_alpha(),
            parallel: config.effective_parallel(),
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<PermutationReport, ScoringError> {
        let grid = match Grid::from_matrix(matrix, weights)? {
            Some(g) if g.len() >= 2 => g,
            _ => return Ok(PermutationReport::insufficient(self.iterations, self.seed, self.alpha)),
        };
        if self.iterations == 0 {
            return Ok(PermutationReport::insufficient(self.iterations, self.seed, self.alpha));
        }

        let observed = grid.observed();
        let leader = leader_of(&grid.ids, &observed);
        let target = observed[leader];
        let (n, width) = (grid.len(), grid.width());

        let tally = run_trials(
            self.iterations,
            self.parallel,
            || Tally {
                exceedances: 0,
                best_others: Vec::new(),
            },
            |tally, t| {
                let mut rng = trial_rng(self.seed, PERMUTATION_SALT, t);
                let mut scores = grid.scores.clone();
                let mut column = vec![0.0; n];
                for d in 0..width {
                    for (slot, row) in column.iter_mut().zip(&grid.scores) {
                        *slot = row[d];
                    }
                    column.shuffle(&mut rng);
                    for (row, &v) in scores.iter_mut().zip(&column) {
                        row[d] = v;
                    }
                }
                let composites = grid.composites(&scores, &grid.weights);
                let best_other = composites
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != leader)
                    .map(|(_, &c)| c)
                    .fold(f64::NEG_INFINITY, f64::max);
                if best_other >= target {
                    tally.exceedances += 1;
                }
                tally.best_others.push(best_other);
            },
        );

        let mut null = tally.best_others;
        null.sort_by(f64::total_cmp);
        let p_value = tally.exceedances as f64 / self.iterations as f64;
        let report = PermutationReport {
            status: ValidationStatus::from_pass(p_value < self.alpha),
            iterations: self.iterations,
            seed: self.seed,
            leader: Some(grid.ids[leader].clone()),
            observed: target,
            exceedances: tally.exceedances,
            p_value,
            alpha: self.alpha,
            null_mean: null.iter().sum::<f64>() / null.len() as f64,
            null_p95: percentile(&null, 0.95).unwrap_or(0.0),
        };
        info!(p_value, exceedances = tally.exceedances, "permutation test complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_scoring::DimensionSchema;

    #[test]
    fn identical_candidates_always_exceed() {
        let dims = ["x", "y"];
        let m = ScoreMatrix::from_rows(
            &dims,
            vec![
                ("a".to_string(), vec![0.5, 0.5]),
                ("b".to_string(), vec![0.5, 0.5]),
            ],
        )
        .unwrap();
        let w = WeightVector::uniform(&DimensionSchema::from_ids(dims)).unwrap();
        let report = PermutationTest::new(200, 9).run(&m, &w).unwrap();
        assert_eq!(report.exceedances, 200);
        assert_eq!(report.p_value, 1.0);
        assert_eq!(report.status, ValidationStatus::Fail);
    }

    #[test]
    fn p_value_is_a_fraction_of_trials() {
        let dims = ["x", "y", "z"];
        let m = ScoreMatrix::from_rows(
            &dims,
            vec![
                ("a".to_string(), vec![0.9, 0.8, 0.7]),
                ("b".to_string(), vec![0.1, 0.3, 0.2]),
                ("c".to_string(), vec![0.2, 0.1, 0.3]),
            ],
        )
        .unwrap();
        let w = WeightVector::uniform(&DimensionSchema::from_ids(dims)).unwrap();
        let report = PermutationTest::new(500, 4).parallel(false).run(&m, &w).unwrap();
        assert!((report.p_value - report.exceedances as f64 / 500.0).abs() < 1e-12);
        assert!(report.p_value > 0.0 && report.p_value < 1.0);
        assert!(report.null_p95 <= report.observed + 1e-12);
    }
}
