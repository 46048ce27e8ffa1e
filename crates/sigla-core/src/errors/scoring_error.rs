//! Scoring errors.

use super::error_code::{self, SiglaErrorCode};

/// A weighting vector failed validation. Fatal to the scoring call only.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidWeightingError {
    #[error("weighting vector is empty")]
    Empty,

    #[error("weights sum to {sum}, expected 1")]
    NotNormalized { sum: f64 },

    #[error("weight for {dimension} is negative: {weight}")]
    Negative { dimension: String, weight: f64 },

    #[error("weight for {dimension} is not finite")]
    NonFinite { dimension: String },

    #[error("weight given for unknown dimension {dimension}")]
    UnknownDimension { dimension: String },

    #[error("dimension {dimension} weighted more than once")]
    Duplicate { dimension: String },

    #[error("expected {expected} weight multipliers, got {found}")]
    LengthMismatch { found: usize, expected: usize },

    #[error("no weight remains after removing {removed:?}")]
    NothingLeft { removed: Vec<String> },
}

impl SiglaErrorCode for InvalidWeightingError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_WEIGHTING
    }
}

/// Errors raised while resolving or ranking candidate families.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error(transparent)]
    InvalidWeighting(#[from] InvalidWeightingError),

    #[error("no candidate families supplied")]
    NoCandidates,

    #[error("duplicate candidate id {candidate}")]
    DuplicateCandidate { candidate: String },

    #[error("candidate {candidate} has no score for dimension {dimension}")]
    MissingDimension {
        candidate: String,
        dimension: String,
    },

    #[error("candidate {candidate} score for {dimension} is outside [0,1]: {score}")]
    ScoreOutOfRange {
        candidate: String,
        dimension: String,
        score: f64,
    },

    #[error("invalid reference data: {message}")]
    InvalidReference { message: String },

    #[error("score matrix row {row} has {found} columns, schema has {expected}")]
    ShapeMismatch {
        row: usize,
        found: usize,
        expected: usize,
    },
}

impl SiglaErrorCode for ScoringError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidWeighting(e) => e.error_code(),
            _ => error_code::SCORING_ERROR,
        }
    }
}
