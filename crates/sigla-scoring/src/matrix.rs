//! Candidate × dimension score matrix: the scorer's only input besides weights.

use serde::Serialize;
use sigla_core::errors::ScoringError;
use sigla_core::types::collections::FxHashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRow {
    pub id: String,
    pub name: String,
    /// One score per matrix dimension, in [0,1].
    pub scores: Vec<f64>,
    /// Half-width bound per dimension; zeros when unknown.
    pub uncertainty: Vec<f64>,
    pub justifications: Vec<String>,
    pub control: bool,
}

impl CandidateRow {
    pub fn new(id: &str, scores: Vec<f64>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            scores,
            uncertainty: Vec::new(),
            justifications: Vec::new(),
            control: false,
        }
    }

    pub fn as_control(mut self) -> Self {
        self.control = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    dimensions: Vec<String>,
    rows: Vec<CandidateRow>,
}

impl ScoreMatrix {
    pub fn new(dimensions: Vec<String>, mut rows: Vec<CandidateRow>) -> Result<Self, ScoringError> {
        if rows.is_empty() {
            return Err(ScoringError::NoCandidates);
        }
        let width = dimensions.len();
        let mut seen = FxHashSet::default();
        for (r, row) in rows.iter_mut().enumerate() {
            if !seen.insert(row.id.clone()) {
                return Err(ScoringError::DuplicateCandidate {
                    candidate: row.id.clone(),
                });
            }
            if row.scores.len() != width {
                return Err(ScoringError::ShapeMismatch {
                    row: r,
                    found: row.scores.len(),
                    expected: width,
                });
            }
            if row.uncertainty.is_empty() {
                row.uncertainty = vec![0.0; width];
            }
            if row.justifications.is_empty() {
                row.justifications = vec![String::new(); width];
            }
            if row.uncertainty.len() != width || row.justifications.len() != width {
                return Err(ScoringError::ShapeMismatch {
                    row: r,
                    found: row.uncertainty.len().min(row.justifications.len()),
                    expected: width,
                });
            }
            for (d, &s) in row.scores.iter().enumerate() {
                if !(0.0..=1.0).contains(&s) {
                    return Err(ScoringError::ScoreOutOfRange {
                        candidate: row.id.clone(),
                        dimension: dimensions[d].clone(),
                        score: s,
                    });
                }
            }
        }
        Ok(Self { dimensions, rows })
    }

    /// Convenience for plain `(id, scores)` tables.
    pub fn from_rows<S: AsRef<str>>(dimensions: &[S], rows: Vec<(String, Vec<f64>)>) -> Result<Self, ScoringError> {
        Self::new(
            dimensions.iter().map(|d| d.as_ref().to_string()).collect(),
            rows.into_iter()
                .map(|(id, scores)| CandidateRow::new(&id, scores))
                .collect(),
        )
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&CandidateRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn dimension_index(&self, dimension: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d == dimension)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.dimensions.len()
    }

    /// Rows that are real candidates.
    pub fn candidate_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.control).count()
    }

    pub fn column(&self, dimension: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r.scores[dimension]).collect()
    }

    /// A copy with every score passed through `f(row, dimension, score)`,
    /// clamped to [0,1]. Non-finite results become 0.
    pub fn map_scores<F>(&self, mut f: F) -> Self
    where
        F: FnMut(usize, usize, f64) -> f64,
    {
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(r, row)| CandidateRow {
                scores: row
                    .scores
                    .iter()
                    .enumerate()
                    .map(|(d, &s)| {
                        let v = f(r, d, s);
                        if v.is_finite() {
                            v.clamp(0.0, 1.0)
                        } else {
                            0.0
                        }
                    })
                    .collect(),
                ..row.clone()
            })
            .collect();
        Self {
            dimensions: self.dimensions.clone(),
            rows,
        }
    }

    /// A copy with `row` appended.
    pub fn with_row(&self, row: CandidateRow) -> Result<Self, ScoringError> {
        let mut rows = self.rows.clone();
        rows.push(row);
        Self::new(self.dimensions.clone(), rows)
    }

    /// A copy without control rows. `None` when no candidate remains.
    pub fn candidates_only(&self) -> Option<Self> {
        let rows: Vec<CandidateRow> = self.rows.iter().filter(|r| !r.control).cloned().collect();
        (!rows.is_empty()).then(|| Self {
            dimensions: self.dimensions.clone(),
            rows,
        })
    }
}
