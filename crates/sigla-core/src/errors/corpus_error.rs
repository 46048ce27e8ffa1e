//! Corpus format errors. Always fatal to the run.

use super::error_code::{self, SiglaErrorCode};

/// Malformed or inconsistent corpus input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CorpusFormatError {
    #[error("corpus contains no inscriptions")]
    EmptyCorpus,

    #[error("inscription at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate inscription id {id}")]
    DuplicateId { id: String },

    #[error("inscription {id} has no lines")]
    NoLines { id: String },

    #[error("inscription {id} line {line} contains no signs")]
    EmptyLine { id: String, line: usize },

    #[error("inscription {id} line {line} position {position}: empty sign id")]
    EmptySignId {
        id: String,
        line: usize,
        position: usize,
    },

    #[error("inscription {id}: numeral sign {sign} is not a number")]
    BadNumeral { id: String, sign: String },

    #[error("sign {sign} declared as {first} and later as {second} (inscription {id})")]
    InconsistentSignKind {
        sign: String,
        first: String,
        second: String,
        id: String,
    },

    #[error("corpus JSON could not be parsed: {message}")]
    Json { message: String },
}

impl SiglaErrorCode for CorpusFormatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCorpus => error_code::EMPTY_CORPUS,
            _ => error_code::CORPUS_FORMAT_ERROR,
        }
    }
}
