//! Report sink errors.

use super::error_code::{self, SiglaErrorCode};

/// Errors raised while serializing or delivering report records.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to serialize {record}: {message}")]
    Serialize { record: String, message: String },

    #[error("report sink write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("report sink {sink} is poisoned")]
    Poisoned { sink: String },
}

impl SiglaErrorCode for ReportError {
    fn error_code(&self) -> &'static str {
        error_code::REPORT_ERROR
    }
}
