//! Outcome records shared by every validation procedure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationTest {
    Bootstrap,
    Permutation,
    Ablation,
    Perturbation,
    NegativeControl,
    LexicalControl,
    WeightSensitivity,
}

impl ValidationTest {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Permutation => "permutation",
            Self::Ablation => "ablation",
            Self::Perturbation => "perturbation",
            Self::NegativeControl => "negative_control",
            Self::LexicalControl => "lexical_control",
            Self::WeightSensitivity => "weight_sensitivity",
        }
    }
}

impl std::fmt::Display for ValidationTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `Insufficient` is the sentinel for degenerate input, never a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,
    Fail,
    Insufficient,
}

impl ValidationStatus {
    pub fn from_pass(pass: bool) -> Self {
        if pass {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    /// Percentile interval over an ascending sample, indices `⌊q·n⌋`.
    pub fn percentile(sorted: &[f64], lower: f64, upper: f64) -> Option<Self> {
        Some(Self {
            low: percentile(sorted, lower)?,
            high: percentile(sorted, upper)?,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// `sorted[⌊q·n⌋]`, clamped to the last element.
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((q * sorted.len() as f64) as usize).min(sorted.len() - 1);
    Some(sorted[idx])
}

/// The summary record of one procedure, as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub test: ValidationTest,
    pub status: ValidationStatus,
    /// Win rate, p-value, survival rate: whatever the procedure estimates.
    pub estimate: Option<f64>,
    pub interval: Option<Interval>,
    /// The null-hypothesis threshold `estimate` was judged against.
    pub threshold: Option<f64>,
    pub iterations: usize,
    pub summary: String,
}

impl ValidationOutcome {
    pub fn insufficient(test: ValidationTest, reason: &str) -> Self {
        Self {
            test,
            status: ValidationStatus::Insufficient,
            estimate: None,
            interval: None,
            threshold: None,
            iterations: 0,
            summary: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The control scored or ranked too high; the ranking cannot be trusted.
    NegativeControlFailed,
    /// Dropping one dimension changed the leader.
    AblationLeaderFlip,
    /// Down-weighting contextual dimensions changed the leader.
    ReweightingLeaderFlip,
}

/// A condition that undermines the ranking. Always carried into the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityWarning {
    pub kind: WarningKind,
    pub test: ValidationTest,
    pub message: String,
}

impl ValidityWarning {
    pub fn new(kind: WarningKind, test: ValidationTest, message: impl Into<String>) -> Self {
        Self {
            kind,
            test,
            message: message.into(),
        }
    }

    /// Warnings that invalidate the run rather than qualify it.
    pub fn is_invalidating(&self) -> bool {
        self.kind == WarningKind::NegativeControlFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_uses_floor_index() {
        let sorted: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(percentile(&sorted, 0.025), Some(2.0));
        assert_eq!(percentile(&sorted, 0.975), Some(97.0));
        assert_eq!(percentile(&sorted, 1.0), Some(99.0));
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn only_control_failure_invalidates() {
        let flip = ValidityWarning::new(WarningKind::AblationLeaderFlip, ValidationTest::Ablation, "x");
        let control = ValidityWarning::new(
            WarningKind::NegativeControlFailed,
            ValidationTest::NegativeControl,
            "y",
        );
        assert!(!flip.is_invalidating());
        assert!(control.is_invalidating());
    }
}
