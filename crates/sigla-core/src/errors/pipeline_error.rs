//! Pipeline errors.

use super::{
    AnalysisError, ConfigError, CorpusFormatError, InvalidWeightingError, ReportError,
    ScoringError, SiglaErrorCode,
};

/// Errors that abort a pipeline run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusFormatError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl From<InvalidWeightingError> for PipelineError {
    fn from(e: InvalidWeightingError) -> Self {
        Self::Scoring(ScoringError::InvalidWeighting(e))
    }
}

impl SiglaErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Corpus(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
            Self::Scoring(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Report(e) => e.error_code(),
        }
    }
}
