//! Trial plumbing shared by the resampling procedures.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use sigla_core::errors::ScoringError;
use sigla_scoring::{CandidateScorer, ScoreMatrix, WeightVector};

/// Per-procedure salts so that procedures sharing a seed draw unrelated streams.
pub const BOOTSTRAP_SALT: u64 = 0xB007_5742;
pub const PERMUTATION_SALT: u64 = 0x9E2A_11C3;
pub const PERTURBATION_SALT: u64 = 0x5EED_0F1A;
pub const LEXICAL_SALT: u64 = 0x1E71_CA15;

/// An independent generator for one trial: the procedure seed selects the
/// key, the trial index selects the stream.
pub fn trial_rng(seed: u64, salt: u64, trial: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ salt);
    rng.set_stream(trial);
    rng
}

/// Partial result of a batch of trials.
pub trait Merge: Sized {
    fn merge(self, other: Self) -> Self;
}

/// Run `iterations` trials, folding each into an accumulator.
///
/// In parallel mode rayon folds per worker and the partials are merged; the
/// merge must be commutative for the result to be independent of scheduling.
pub fn run_trials<A, I, F>(iterations: usize, parallel: bool, init: I, step: F) -> A
where
    A: Merge + Send,
    I: Fn() -> A + Sync + Send,
    F: Fn(&mut A, u64) + Sync + Send,
{
    if parallel {
        (0..iterations)
            .into_par_iter()
            .fold(&init, |mut acc, t| {
                step(&mut acc, t as u64);
                acc
            })
            .reduce(&init, |a, b| a.merge(b))
    } else {
        let mut acc = init();
        for t in 0..iterations {
            step(&mut acc, t as u64);
        }
        acc
    }
}

/// A plain score grid for the hot loops: candidate rows only, weights
/// aligned to columns.
#[derive(Debug, Clone)]
pub struct Grid {
    pub ids: Vec<String>,
    pub scores: Vec<Vec<f64>>,
    pub uncertainty: Vec<Vec<f64>>,
    pub weights: Vec<f64>,
}

impl Grid {
    /// Control rows are dropped. `None` when no candidate remains.
    pub fn from_matrix(matrix: &ScoreMatrix, weights: &WeightVector) -> Result<Option<Self>, ScoringError> {
        let aligned = CandidateScorer::aligned_weights(matrix, weights)?;
        let Some(candidates) = matrix.candidates_only() else {
            return Ok(None);
        };
        let rows = candidates.rows();
        Ok(Some(Self {
            ids: rows.iter().map(|r| r.id.clone()).collect(),
            scores: rows.iter().map(|r| r.scores.clone()).collect(),
            uncertainty: rows
                .iter()
                .map(|r| {
                    if r.uncertainty.len() == r.scores.len() {
                        r.uncertainty.clone()
                    } else {
                        vec![0.0; r.scores.len()]
                    }
                })
                .collect(),
            weights: aligned,
        }))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn width(&self) -> usize {
        self.weights.len()
    }

    pub fn composites(&self, scores: &[Vec<f64>], weights: &[f64]) -> Vec<f64> {
        scores
            .iter()
            .map(|row| CandidateScorer::composite(row, weights))
            .collect()
    }

    pub fn observed(&self) -> Vec<f64> {
        self.composites(&self.scores, &self.weights)
    }

    /// Columns carrying weight.
    pub fn active_columns(&self) -> Vec<usize> {
        (0..self.width()).filter(|&d| self.weights[d] > 0.0).collect()
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|c| c == id)
    }
}

/// Index of the top composite, ties to the smaller id. Same order as the scorer.
pub fn leader_of(ids: &[String], composites: &[f64]) -> usize {
    let mut best = 0;
    for i in 1..composites.len() {
        let better = match composites[i].total_cmp(&composites[best]) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => ids[i] < ids[best],
            std::cmp::Ordering::Less => false,
        };
        if better {
            best = i;
        }
    }
    best
}

/// 1-based rank of row `index` under the scorer's ordering.
pub fn rank_of(ids: &[String], composites: &[f64], index: usize) -> usize {
    1 + (0..composites.len())
        .filter(|&j| {
            j != index
                && match composites[j].total_cmp(&composites[index]) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Equal => ids[j] < ids[index],
                    std::cmp::Ordering::Less => false,
                }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    struct Count(u64);

    impl Merge for Count {
        fn merge(self, other: Self) -> Self {
            Count(self.0 + other.0)
        }
    }

    #[test]
    fn streams_are_reproducible_and_distinct() {
        let a: u64 = trial_rng(42, BOOTSTRAP_SALT, 7).gen();
        let b: u64 = trial_rng(42, BOOTSTRAP_SALT, 7).gen();
        let c: u64 = trial_rng(42, BOOTSTRAP_SALT, 8).gen();
        let d: u64 = trial_rng(42, PERMUTATION_SALT, 7).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let step = |acc: &mut Count, t: u64| {
            let x: u32 = trial_rng(1, LEXICAL_SALT, t).gen_range(0..10);
            acc.0 += u64::from(x);
        };
        let seq = run_trials(500, false, || Count(0), step);
        let par = run_trials(500, true, || Count(0), step);
        assert_eq!(seq.0, par.0);
    }

    #[test]
    fn leader_and_rank_break_ties_by_id() {
        let ids: Vec<String> = ["b", "a", "c"].iter().map(|s| s.to_string()).collect();
        let composites = [0.5, 0.5, 0.9];
        assert_eq!(leader_of(&ids, &composites), 2);
        assert_eq!(rank_of(&ids, &composites, 1), 2);
        assert_eq!(rank_of(&ids, &composites, 0), 3);
    }
}
