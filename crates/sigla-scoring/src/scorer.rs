//! The candidate scorer.
//!
//! Pure: identical matrix and weights always yield the identical table. It is
//! the unit every validation procedure replays, so it keeps no state at all.

use serde::{Deserialize, Serialize};
use sigla_core::errors::{InvalidWeightingError, ScoringError};

use crate::matrix::ScoreMatrix;
use crate::weights::WeightVector;

/// Separation between the top two composites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapClass {
    Strong,
    Moderate,
    Weak,
}

impl GapClass {
    pub const STRONG: f64 = 0.15;
    pub const MODERATE: f64 = 0.08;

    pub fn from_gap(gap: f64) -> Self {
        if gap >= Self::STRONG {
            Self::Strong
        } else if gap >= Self::MODERATE {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub dimension: String,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub candidate: String,
    pub name: String,
    /// 1-based.
    pub rank: usize,
    pub composite: f64,
    pub dimensions: Vec<DimensionScore>,
    pub control: bool,
}

/// A ranked table together with the weighting vector that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    pub weights: WeightVector,
    pub results: Vec<ScoreResult>,
    /// Fewer than two real candidates: no comparison is meaningful.
    pub degenerate: bool,
}

impl ScoreTable {
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn leader(&self) -> Option<&ScoreResult> {
        self.results.first()
    }

    pub fn get(&self, candidate: &str) -> Option<&ScoreResult> {
        self.results.iter().find(|r| r.candidate == candidate)
    }

    pub fn rank_of(&self, candidate: &str) -> Option<usize> {
        self.get(candidate).map(|r| r.rank)
    }

    pub fn order(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.candidate.as_str()).collect()
    }

    /// Leader minus runner-up. `None` for a degenerate table.
    pub fn gap(&self) -> Option<f64> {
        if self.degenerate {
            return None;
        }
        match self.results.as_slice() {
            [first, second, ..] => Some(first.composite - second.composite),
            _ => None,
        }
    }

    pub fn gap_class(&self) -> Option<GapClass> {
        self.gap().map(GapClass::from_gap)
    }
}

pub struct CandidateScorer;

impl CandidateScorer {
    /// Weights aligned to the matrix columns. Matrix dimensions the vector
    /// does not mention weigh 0; weight on a dimension the matrix lacks is an error.
    pub fn aligned_weights(matrix: &ScoreMatrix, weights: &WeightVector) -> Result<Vec<f64>, ScoringError> {
        weights.validate()?;
        let mut aligned = vec![0.0; matrix.width()];
        for (dimension, w) in weights.iter() {
            match matrix.dimension_index(dimension) {
                Some(i) => aligned[i] = w,
                None if w == 0.0 => {}
                None => {
                    return Err(InvalidWeightingError::UnknownDimension {
                        dimension: dimension.to_string(),
                    }
                    .into())
                }
            }
        }
        Ok(aligned)
    }

    pub fn composite(scores: &[f64], weights: &[f64]) -> f64 {
        scores.iter().zip(weights).map(|(s, w)| s * w).sum()
    }

    /// Composite per matrix row, in row order.
    pub fn composites(matrix: &ScoreMatrix, weights: &WeightVector) -> Result<Vec<f64>, ScoringError> {
        let aligned = Self::aligned_weights(matrix, weights)?;
        Ok(Self::composites_aligned(matrix, &aligned))
    }

    pub fn composites_aligned(matrix: &ScoreMatrix, aligned: &[f64]) -> Vec<f64> {
        matrix
            .rows()
            .iter()
            .map(|r| Self::composite(&r.scores, aligned))
            .collect()
    }

    /// Row indices best first: composite descending, ties by candidate id.
    pub fn order_by(matrix: &ScoreMatrix, composites: &[f64]) -> Vec<usize> {
        let rows = matrix.rows();
        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by(|&a, &b| {
            composites[b]
                .total_cmp(&composites[a])
                .then_with(|| rows[a].id.cmp(&rows[b].id))
        });
        order
    }

    pub fn rank(matrix: &ScoreMatrix, weights: &WeightVector) -> Result<ScoreTable, ScoringError> {
        let aligned = Self::aligned_weights(matrix, weights)?;
        let composites = Self::composites_aligned(matrix, &aligned);
        let order = Self::order_by(matrix, &composites);

        let results = order
            .iter()
            .enumerate()
            .map(|(position, &i)| {
                let row = &matrix.rows()[i];
                ScoreResult {
                    candidate: row.id.clone(),
                    name: row.name.clone(),
                    rank: position + 1,
                    composite: composites[i],
                    dimensions: matrix
                        .dimensions()
                        .iter()
                        .enumerate()
                        .map(|(d, dimension)| DimensionScore {
                            dimension: dimension.clone(),
                            score: row.scores[d],
                            weight: aligned[d],
                            contribution: row.scores[d] * aligned[d],
                            justification: row.justifications[d].clone(),
                        })
                        .collect(),
                    control: row.control,
                }
            })
            .collect();

        Ok(ScoreTable {
            weights: weights.clone(),
            results,
            degenerate: matrix.candidate_count() < 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::DimensionSchema;

    fn matrix(rows: Vec<(&str, Vec<f64>)>) -> ScoreMatrix {
        ScoreMatrix::from_rows(
            &["x", "y"],
            rows.into_iter().map(|(id, s)| (id.to_string(), s)).collect(),
        )
        .unwrap()
    }

    fn uniform() -> WeightVector {
        WeightVector::uniform(&DimensionSchema::from_ids(["x", "y"])).unwrap()
    }

    #[test]
    fn ranks_by_composite_then_id() {
        let m = matrix(vec![("b", vec![0.4, 0.6]), ("a", vec![0.6, 0.4]), ("c", vec![0.9, 0.9])]);
        let table = CandidateScorer::rank(&m, &uniform()).unwrap();
        assert_eq!(table.order(), ["c", "a", "b"]);
        assert_eq!(table.rank_of("b"), Some(3));
        assert!((table.leader().unwrap().composite - 0.9).abs() < 1e-12);
        assert_eq!(table.gap_class(), Some(GapClass::Strong));
    }

    #[test]
    fn single_candidate_is_degenerate() {
        let table = CandidateScorer::rank(&matrix(vec![("a", vec![0.5, 0.5])]), &uniform()).unwrap();
        assert!(table.is_degenerate());
        assert_eq!(table.gap(), None);
        assert_eq!(table.results.len(), 1);
    }

    #[test]
    fn weight_on_missing_dimension_fails() {
        let schema = DimensionSchema::from_ids(["x", "z"]);
        let w = WeightVector::new(&schema, &[("x", 0.5), ("z", 0.5)]).unwrap();
        let err = CandidateScorer::rank(&matrix(vec![("a", vec![0.5, 0.5])]), &w).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidWeighting(InvalidWeightingError::UnknownDimension { .. })
        ));
    }

    #[test]
    fn gap_classes() {
        assert_eq!(GapClass::from_gap(0.20), GapClass::Strong);
        assert_eq!(GapClass::from_gap(0.08), GapClass::Moderate);
        assert_eq!(GapClass::from_gap(0.01), GapClass::Weak);
    }
}
