//! Seams to external collaborators.

pub mod corpus_provider;

pub use corpus_provider::{CorpusProvider, JsonCorpusProvider};
