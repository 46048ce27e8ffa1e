//! Analysis errors for the structural analyzers.

use super::error_code::{self, SiglaErrorCode};

/// Errors raised by the formula, information-theory and administrative analyzers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("token stream is empty")]
    EmptyStream,

    #[error("slot template is empty")]
    EmptyTemplate,

    #[error("slot template declares {label} more than once")]
    DuplicateSlot { label: String },

    #[error("rule {rule} references unknown slot {slot}")]
    UnknownSlot { rule: String, slot: String },

    #[error("duplicate rule id {rule}")]
    DuplicateRule { rule: String },

    #[error("minimum slot threshold {min_slots} exceeds template size {template_size}")]
    ThresholdExceedsTemplate {
        min_slots: usize,
        template_size: usize,
    },
}

impl SiglaErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        error_code::ANALYSIS_ERROR
    }
}
