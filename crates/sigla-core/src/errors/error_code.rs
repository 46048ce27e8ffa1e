//! SiglaErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable error code string
/// that downstream report consumers can match on.
pub trait SiglaErrorCode {
    /// Returns the error code string (e.g., "CORPUS_FORMAT_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CORPUS_FORMAT_ERROR: &str = "CORPUS_FORMAT_ERROR";
pub const EMPTY_CORPUS: &str = "EMPTY_CORPUS";
pub const INVALID_WEIGHTING: &str = "INVALID_WEIGHTING";
pub const SCORING_ERROR: &str = "SCORING_ERROR";
pub const ANALYSIS_ERROR: &str = "ANALYSIS_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const REPORT_ERROR: &str = "REPORT_ERROR";
