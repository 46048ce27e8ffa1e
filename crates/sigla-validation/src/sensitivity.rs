//! Weight sensitivity: scale the contextual dimensions down and see whether
//! the linguistic evidence alone keeps the same leader.

use serde::Serialize;
use sigla_core::errors::{InvalidWeightingError, ScoringError};
use sigla_scoring::{CandidateScorer, DimensionCategory, DimensionSchema, GapClass, ScoreMatrix, WeightVector};
use tracing::info;

use crate::outcome::{ValidationOutcome, ValidationStatus, ValidationTest, ValidityWarning, WarningKind};

pub const DEFAULT_FACTORS: [f64; 4] = [1.0, 0.5, 0.25, 0.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityScenario {
    pub factor: f64,
    /// `None` when scaling left no weight at all.
    pub leader: Option<String>,
    pub leader_composite: Option<f64>,
    pub gap: Option<f64>,
    pub gap_class: Option<GapClass>,
    pub holds: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub status: ValidationStatus,
    pub baseline_leader: Option<String>,
    pub contextual: Vec<String>,
    pub scenarios: Vec<SensitivityScenario>,
}

impl SensitivityReport {
    pub fn warnings(&self) -> Vec<ValidityWarning> {
        let Some(baseline) = &self.baseline_leader else {
            return Vec::new();
        };
        self.scenarios
            .iter()
            .filter(|s| !s.holds && s.leader.is_some())
            .map(|s| {
                ValidityWarning::new(
                    WarningKind::ReweightingLeaderFlip,
                    ValidationTest::WeightSensitivity,
                    format!(
                        "contextual weight ×{} moves the lead from {baseline} to {}",
                        s.factor,
                        s.leader.as_deref().unwrap_or("nobody")
                    ),
                )
            })
            .collect()
    }

    pub fn outcome(&self) -> ValidationOutcome {
        if self.status == ValidationStatus::Insufficient {
            return ValidationOutcome::insufficient(
                ValidationTest::WeightSensitivity,
                "fewer than two candidates or no contextual dimension",
            );
        }
        let held = self.scenarios.iter().filter(|s| s.holds).count();
        ValidationOutcome {
            test: ValidationTest::WeightSensitivity,
            status: self.status,
            estimate: Some(held as f64 / self.scenarios.len().max(1) as f64),
            interval: None,
            threshold: None,
            iterations: self.scenarios.len(),
            summary: format!("leader holds in {held} of {} reweightings", self.scenarios.len()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightSensitivity {
    factors: Vec<f64>,
}

impl Default for WeightSensitivity {
    fn default() -> Self {
        Self {
            factors: DEFAULT_FACTORS.to_vec(),
        }
    }
}

impl WeightSensitivity {
    pub fn with_factors(factors: &[f64]) -> Self {
        Self {
            factors: factors.to_vec(),
        }
    }

    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<SensitivityReport, ScoringError> {
        let schema = DimensionSchema::from_ids(weights.dimensions());
        let contextual: Vec<&str> = schema.in_category(DimensionCategory::Contextual);
        let candidates = match matrix.candidates_only() {
            Some(m) if m.len() >= 2 && !contextual.is_empty() => m,
            _ => {
                return Ok(SensitivityReport {
                    status: ValidationStatus::Insufficient,
                    baseline_leader: None,
                    contextual: contextual.iter().map(|s| s.to_string()).collect(),
                    scenarios: Vec::new(),
                })
            }
        };

        let baseline = CandidateScorer::rank(&candidates, weights)?;
        let baseline_leader = baseline.leader().map(|r| r.candidate.clone());

        let mut scenarios = Vec::with_capacity(self.factors.len());
        for &factor in &self.factors {
            let scaled = match weights.scaled(&contextual, factor) {
                Ok(w) => w,
                Err(InvalidWeightingError::NothingLeft { .. }) => {
                    scenarios.push(SensitivityScenario {
                        factor,
                        leader: None,
                        leader_composite: None,
                        gap: None,
                        gap_class: None,
                        holds: false,
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let table = CandidateScorer::rank(&candidates, &scaled)?;
            let leader = table.leader().map(|r| r.candidate.clone());
            scenarios.push(SensitivityScenario {
                factor,
                holds: leader == baseline_leader,
                leader_composite: table.leader().map(|r| r.composite),
                leader,
                gap: table.gap(),
                gap_class: table.gap_class(),
            });
        }

        let status = ValidationStatus::from_pass(scenarios.iter().all(|s| s.holds));
        info!(scenarios = scenarios.len(), ?status, "weight sensitivity complete");
        Ok(SensitivityReport {
            status,
            baseline_leader,
            contextual: contextual.iter().map(|s| s.to_string()).collect(),
            scenarios,
        })
    }
}
