//! Bootstrap over dimensions.
//!
//! Each trial resamples the active dimensions with replacement, turning the
//! draw counts into a reweighting, and optionally jitters every score within
//! its uncertainty bound. The winner of each trial is tallied.

use rand::Rng;
use serde::Serialize;
use sigla_core::config::ValidationConfig;
use sigla_core::errors::ScoringError;
use sigla_scoring::{ScoreMatrix, WeightVector};
use tracing::info;

use crate::outcome::{Interval, ValidationOutcome, ValidationStatus, ValidationTest};
use crate::trial::{leader_of, rank_of, run_trials, trial_rng, Grid, Merge, BOOTSTRAP_SALT};

/// Significance implied by the leader's win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Significance {
    /// Win rate ≥ 95%.
    P05,
    /// Win rate ≥ 90%.
    P10,
    NotSignificant,
}

impl Significance {
    pub fn from_win_rate(rate: f64) -> Self {
        if rate >= 0.95 {
            Self::P05
        } else if rate >= 0.90 {
            Self::P10
        } else {
            Self::NotSignificant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapCandidate {
    pub candidate: String,
    pub wins: usize,
    pub win_rate: f64,
    pub observed: f64,
    pub mean_composite: f64,
    /// 95% percentile interval of the resampled composite.
    pub interval: Option<Interval>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapReport {
    pub status: ValidationStatus,
    pub iterations: usize,
    pub seed: u64,
    pub jitter: bool,
    pub leader: Option<String>,
    pub leader_win_rate: f64,
    pub significance: Significance,
    /// By win rate descending, then id.
    pub candidates: Vec<BootstrapCandidate>,
    /// Share of trials placing the observed leader at rank 1, 2, ...
    pub leader_rank_distribution: Vec<f64>,
}

impl BootstrapReport {
    fn insufficient(iterations: usize, seed: u64, jitter: bool) -> Self {
        Self {
            status: ValidationStatus::Insufficient,
            iterations,
            seed,
            jitter,
            leader: None,
            leader_win_rate: 0.0,
            significance: Significance::NotSignificant,
            candidates: Vec::new(),
            leader_rank_distribution: Vec::new(),
        }
    }

    pub fn win_rate(&self, candidate: &str) -> Option<f64> {
        self.candidates
            .iter()
            .find(|c| c.candidate == candidate)
            .map(|c| c.win_rate)
    }

    pub fn outcome(&self) -> ValidationOutcome {
        let Some(leader) = &self.leader else {
            return ValidationOutcome::insufficient(
                ValidationTest::Bootstrap,
                "fewer than two candidates or no weighted dimension",
            );
        };
        ValidationOutcome {
            test: ValidationTest::Bootstrap,
            status: self.status,
            estimate: Some(self.leader_win_rate),
            interval: self
                .candidates
                .iter()
                .find(|c| &c.candidate == leader)
                .and_then(|c| c.interval),
            threshold: Some(0.95),
            iterations: self.iterations,
            summary: format!(
                "{leader} wins {:.1}% of {} resamples",
                self.leader_win_rate * 100.0,
                self.iterations
            ),
        }
    }
}

struct Tally {
    wins: Vec<usize>,
    samples: Vec<Vec<f64>>,
    leader_ranks: Vec<usize>,
}

impl Tally {
    fn new(candidates: usize) -> Self {
        Self {
            wins: vec![0; candidates],
            samples: vec![Vec::new(); candidates],
            leader_ranks: vec![0; candidates],
        }
    }
}

impl Merge for Tally {
    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.wins.iter_mut().zip(other.wins) {
            *a += b;
        }
        for (a, b) in self.samples.iter_mut().zip(other.samples) {
            a.extend(b);
        }
        for (a, b) in self.leader_ranks.iter_mut().zip(other.leader_ranks) {
            *a += b;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct Bootstrap {
    iterations: usize,
    seed: u64,
    jitter: bool,
    alpha: f64,
    parallel: bool,
}

impl Bootstrap {
    pub fn new(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed,
            jitter: false,
            alpha: 0.05,
            parallel: true,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            iterations: config.effective_bootstrap_iterations(),
            seed: config.effective_seed(),
            jitter: true,
            alpha: config.effective_alpha(),
            parallel: config.effective_parallel(),
        }
    }

    /// Jitter scores within each row's uncertainty bounds.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<BootstrapReport, ScoringError> {
        let grid = match Grid::from_matrix(matrix, weights)? {
            Some(g) if g.len() >= 2 => g,
            _ => return Ok(BootstrapReport::insufficient(self.iterations, self.seed, self.jitter)),
        };
        let active = grid.active_columns();
        if active.is_empty() || self.iterations == 0 {
            return Ok(BootstrapReport::insufficient(self.iterations, self.seed, self.jitter));
        }

        let observed = grid.observed();
        let leader = leader_of(&grid.ids, &observed);
        let n = grid.len();

        let tally = run_trials(
            self.iterations,
            self.parallel,
            || Tally::new(n),
            |tally, t| {
                let mut rng = trial_rng(self.seed, BOOTSTRAP_SALT, t);

                let mut weights = vec![0.0; grid.width()];
                for _ in 0..active.len() {
                    let d = active[rng.gen_range(0..active.len())];
                    weights[d] += grid.weights[d];
                }
                let total: f64 = weights.iter().sum();
                for w in &mut weights {
                    *w /= total;
                }

                let composites = if self.jitter {
                    let scores: Vec<Vec<f64>> = grid
                        .scores
                        .iter()
                        .zip(&grid.uncertainty)
                        .map(|(row, bounds)| {
                            row.iter()
                                .zip(bounds)
                                .map(|(&s, &b)| {
                                    if b > 0.0 {
                                        (s + rng.gen_range(-b..=b)).clamp(0.0, 1.0)
                                    } else {
                                        s
                                    }
                                })
                                .collect()
                        })
                        .collect();
                    grid.composites(&scores, &weights)
                } else {
                    grid.composites(&grid.scores, &weights)
                };

                tally.wins[leader_of(&grid.ids, &composites)] += 1;
                tally.leader_ranks[rank_of(&grid.ids, &composites, leader) - 1] += 1;
                for (samples, c) in tally.samples.iter_mut().zip(composites) {
                    samples.push(c);
                }
            },
        );

        let iterations = self.iterations as f64;
        let mut candidates: Vec<BootstrapCandidate> = tally
            .samples
            .into_iter()
            .enumerate()
            .map(|(i, mut samples)| {
                samples.sort_by(f64::total_cmp);
                BootstrapCandidate {
                    candidate: grid.ids[i].clone(),
                    wins: tally.wins[i],
                    win_rate: tally.wins[i] as f64 / iterations,
                    observed: observed[i],
                    mean_composite: samples.iter().sum::<f64>() / samples.len() as f64,
                    interval: Interval::percentile(&samples, 0.025, 0.975),
                }
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });

        let leader_win_rate = tally.wins[leader] as f64 / iterations;
        let report = BootstrapReport {
            status: ValidationStatus::from_pass(leader_win_rate >= 1.0 - self.alpha),
            iterations: self.iterations,
            seed: self.seed,
            jitter: self.jitter,
            leader: Some(grid.ids[leader].clone()),
            leader_win_rate,
            significance: Significance::from_win_rate(leader_win_rate),
            candidates,
            leader_rank_distribution: tally
                .leader_ranks
                .iter()
                .map(|&c| c as f64 / iterations)
                .collect(),
        };
        info!(
            leader = %grid.ids[leader],
            win_rate = leader_win_rate,
            iterations = self.iterations,
            "bootstrap complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_scoring::DimensionSchema;

    fn close_race() -> (ScoreMatrix, WeightVector) {
        let dims = ["x", "y", "z"];
        let matrix = ScoreMatrix::from_rows(
            &dims,
            vec![
                ("a".to_string(), vec![0.9, 0.2, 0.5]),
                ("b".to_string(), vec![0.2, 0.9, 0.5]),
            ],
        )
        .unwrap();
        (matrix, WeightVector::uniform(&DimensionSchema::from_ids(dims)).unwrap())
    }

    #[test]
    fn close_race_is_not_significant() {
        let (m, w) = close_race();
        let report = Bootstrap::new(2_000, 7).run(&m, &w).unwrap();
        assert_eq!(report.status, ValidationStatus::Fail);
        assert_eq!(report.significance, Significance::NotSignificant);
        let total: f64 = report.candidates.iter().map(|c| c.win_rate).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sequential_and_parallel_runs_match() {
        let (m, w) = close_race();
        let seq = Bootstrap::new(1_000, 3).parallel(false).run(&m, &w).unwrap();
        let par = Bootstrap::new(1_000, 3).parallel(true).run(&m, &w).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn single_candidate_is_insufficient() {
        let m = ScoreMatrix::from_rows(&["x"], vec![("a".to_string(), vec![0.5])]).unwrap();
        let w = WeightVector::uniform(&DimensionSchema::from_ids(["x"])).unwrap();
        let report = Bootstrap::new(100, 1).run(&m, &w).unwrap();
        assert_eq!(report.status, ValidationStatus::Insufficient);
        assert_eq!(report.outcome().status, ValidationStatus::Insufficient);
    }
}
