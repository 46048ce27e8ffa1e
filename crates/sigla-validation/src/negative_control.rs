//! Negative-control replay: score a family known to be unrelated alongside
//! the true candidates and require it to land low.

use serde::Serialize;
use sigla_core::config::NegativeControlConfig;
use sigla_core::errors::ScoringError;
use sigla_scoring::{CandidateScorer, ScoreMatrix, WeightVector};
use tracing::{info, warn};

use crate::outcome::{ValidationOutcome, ValidationStatus, ValidationTest, ValidityWarning, WarningKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlResult {
    pub control: String,
    pub composite: f64,
    /// Rank among the true candidates plus this control, 1-based.
    pub rank: usize,
    pub field: usize,
    /// True candidates ranked below the control.
    pub outranks: usize,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NegativeControlReport {
    pub status: ValidationStatus,
    pub max_composite: f64,
    pub max_rank: usize,
    pub controls: Vec<ControlResult>,
}

impl NegativeControlReport {
    pub fn warnings(&self) -> Vec<ValidityWarning> {
        self.controls
            .iter()
            .filter(|c| !c.passed)
            .map(|c| {
                ValidityWarning::new(
                    WarningKind::NegativeControlFailed,
                    ValidationTest::NegativeControl,
                    format!(
                        "control {} scored {:.3} at rank {} of {}; the ranking is not trustworthy",
                        c.control, c.composite, c.rank, c.field
                    ),
                )
            })
            .collect()
    }

    pub fn outcome(&self) -> ValidationOutcome {
        if self.status == ValidationStatus::Insufficient {
            return ValidationOutcome::insufficient(
                ValidationTest::NegativeControl,
                "no control rows or fewer than two candidates",
            );
        }
        let worst = self
            .controls
            .iter()
            .map(|c| c.composite)
            .fold(f64::NEG_INFINITY, f64::max);
        ValidationOutcome {
            test: ValidationTest::NegativeControl,
            status: self.status,
            estimate: Some(worst),
            interval: None,
            threshold: Some(self.max_composite),
            iterations: self.controls.len(),
            summary: self
                .controls
                .iter()
                .map(|c| format!("{} rank {}/{} composite {:.3}", c.control, c.rank, c.field, c.composite))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NegativeControl {
    max_composite: f64,
    max_rank: usize,
}

impl Default for NegativeControl {
    fn default() -> Self {
        Self::from_config(&NegativeControlConfig::default())
    }
}

impl NegativeControl {
    pub fn new(max_composite: f64, max_rank: usize) -> Self {
        Self {
            max_composite,
            max_rank,
        }
    }

    pub fn from_config(config: &NegativeControlConfig) -> Self {
        Self::new(config.effective_max_composite(), config.effective_max_rank())
    }

    /// Control rows are read from `matrix`; each is ranked separately against
    /// the true candidates so controls never crowd each other.
    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<NegativeControlReport, ScoringError> {
        let candidates = matrix.candidates_only();
        let controls: Vec<_> = matrix.rows().iter().filter(|r| r.control).collect();
        let candidates = match candidates {
            Some(c) if c.len() >= 2 && !controls.is_empty() => c,
            _ => {
                return Ok(NegativeControlReport {
                    status: ValidationStatus::Insufficient,
                    max_composite: self.max_composite,
                    max_rank: self.max_rank,
                    controls: Vec::new(),
                })
            }
        };

        let mut results = Vec::with_capacity(controls.len());
        for control in controls {
            let field = candidates.with_row(control.clone())?;
            let table = CandidateScorer::rank(&field, weights)?;
            let Some(scored) = table.get(&control.id) else {
                continue;
            };
            let outranks = table
                .results
                .iter()
                .filter(|r| !r.control && r.rank > scored.rank)
                .count();
            let passed = scored.composite <= self.max_composite && scored.rank > self.max_rank;
            if !passed {
                warn!(control = %control.id, composite = scored.composite, rank = scored.rank, "negative control failed");
            }
            results.push(ControlResult {
                control: control.id.clone(),
                composite: scored.composite,
                rank: scored.rank,
                field: table.results.len(),
                outranks,
                passed,
            });
        }

        let status = ValidationStatus::from_pass(results.iter().all(|r| r.passed));
        info!(controls = results.len(), ?status, "negative control complete");
        Ok(NegativeControlReport {
            status,
            max_composite: self.max_composite,
            max_rank: self.max_rank,
            controls: results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_scoring::{CandidateRow, DimensionSchema};

    fn matrix(control: Vec<f64>) -> ScoreMatrix {
        ScoreMatrix::new(
            vec!["x".to_string(), "y".to_string()],
            vec![
                CandidateRow::new("a", vec![0.6, 0.6]),
                CandidateRow::new("b", vec![0.5, 0.4]),
                CandidateRow::new("c", vec![0.3, 0.4]),
                CandidateRow::new("ctl", control).as_control(),
            ],
        )
        .unwrap()
    }

    fn weights() -> WeightVector {
        WeightVector::uniform(&DimensionSchema::from_ids(["x", "y"])).unwrap()
    }

    #[test]
    fn high_control_fails_and_warns() {
        let report = NegativeControl::default().run(&matrix(vec![0.9, 0.8]), &weights()).unwrap();
        assert_eq!(report.status, ValidationStatus::Fail);
        assert_eq!(report.controls[0].rank, 1);
        assert_eq!(report.controls[0].outranks, 3);
        assert!(report.warnings()[0].is_invalidating());
    }

    #[test]
    fn rank_three_below_ceiling_passes() {
        let report = NegativeControl::default().run(&matrix(vec![0.4, 0.4]), &weights()).unwrap();
        assert_eq!(report.status, ValidationStatus::Pass);
        assert_eq!(report.controls[0].rank, 3);
        assert_eq!(report.controls[0].outranks, 1);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn missing_control_is_insufficient() {
        let m = matrix(vec![0.1, 0.1]).candidates_only().unwrap();
        let report = NegativeControl::default().run(&m, &weights()).unwrap();
        assert_eq!(report.status, ValidationStatus::Insufficient);
    }
}
