//! Error types for the sigla engine.
//!
//! One enum per subsystem, aggregated by [`PipelineError`].

pub mod analysis_error;
pub mod config_error;
pub mod corpus_error;
pub mod error_code;
pub mod pipeline_error;
pub mod report_error;
pub mod scoring_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use corpus_error::CorpusFormatError;
pub use error_code::SiglaErrorCode;
pub use pipeline_error::PipelineError;
pub use report_error::ReportError;
pub use scoring_error::{InvalidWeightingError, ScoringError};
