//! sigla-scoring: compare the corpus against candidate language families.
//!
//! - `dimension`: the dimension schema and categories
//! - `weights`: validated weighting vectors
//! - `family`: candidate-family reference records
//! - `profile`: the corpus feature summary in dimension terms
//! - `resolve`: derived dimensions, producing a [`ScoreMatrix`]
//! - `scorer`: the pure ranking function replayed by the validators
//! - `reference`: built-in families, the negative control and corpus hypothesis

pub mod dimension;
pub mod family;
pub mod matrix;
pub mod profile;
pub mod reference;
pub mod resolve;
pub mod scorer;
pub mod weights;

pub use dimension::{Dimension, DimensionCategory, DimensionSchema};
pub use family::{CandidateFamily, FamilyProfile, FamilySet};
pub use matrix::{CandidateRow, ScoreMatrix};
pub use profile::CorpusProfile;
pub use resolve::DimensionResolver;
pub use scorer::{CandidateScorer, DimensionScore, GapClass, ScoreResult, ScoreTable};
pub use weights::WeightVector;
