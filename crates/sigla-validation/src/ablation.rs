//! Leave-one-dimension-out ablation.

use serde::Serialize;
use sigla_core::errors::{InvalidWeightingError, ScoringError};
use sigla_scoring::{CandidateScorer, ScoreMatrix, WeightVector};
use tracing::{info, warn};

use crate::outcome::{ValidationOutcome, ValidationStatus, ValidationTest, ValidityWarning, WarningKind};

/// How far the baseline leader's composite moves when a dimension is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactClass {
    /// |Δ| > 0.05
    Critical,
    /// |Δ| > 0.02
    Moderate,
    Minor,
}

impl ImpactClass {
    pub fn from_delta(delta: f64) -> Self {
        let d = delta.abs();
        if d > 0.05 {
            Self::Critical
        } else if d > 0.02 {
            Self::Moderate
        } else {
            Self::Minor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AblationVerdict {
    /// No dimension flips the leader.
    Robust,
    /// Exactly one does.
    LargelyRobust,
    Fragile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionAblation {
    pub dimension: String,
    pub weight: f64,
    /// `None` when the dimension was the only weighted one.
    pub leader: Option<String>,
    pub leader_changed: bool,
    /// Baseline leader's composite without the dimension, minus with it.
    pub composite_delta: f64,
    pub impact: ImpactClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AblationReport {
    pub status: ValidationStatus,
    pub baseline_leader: Option<String>,
    pub dimensions: Vec<DimensionAblation>,
    pub flips: usize,
    pub verdict: AblationVerdict,
}

impl AblationReport {
    pub fn flipping_dimensions(&self) -> Vec<&str> {
        self.dimensions
            .iter()
            .filter(|d| d.leader_changed)
            .map(|d| d.dimension.as_str())
            .collect()
    }

    pub fn warnings(&self) -> Vec<ValidityWarning> {
        let Some(baseline) = &self.baseline_leader else {
            return Vec::new();
        };
        self.dimensions
            .iter()
            .filter(|d| d.leader_changed)
            .map(|d| {
                ValidityWarning::new(
                    WarningKind::AblationLeaderFlip,
                    ValidationTest::Ablation,
                    format!(
                        "removing {} moves the lead from {baseline} to {}",
                        d.dimension,
                        d.leader.as_deref().unwrap_or("nobody")
                    ),
                )
            })
            .collect()
    }

    pub fn outcome(&self) -> ValidationOutcome {
        if self.status == ValidationStatus::Insufficient {
            return ValidationOutcome::insufficient(ValidationTest::Ablation, "fewer than two candidates");
        }
        let tested = self.dimensions.len();
        ValidationOutcome {
            test: ValidationTest::Ablation,
            status: self.status,
            estimate: Some(if tested == 0 {
                1.0
            } else {
                1.0 - self.flips as f64 / tested as f64
            }),
            interval: None,
            threshold: None,
            iterations: tested,
            summary: format!("{:?}: {} of {tested} removals flip the leader", self.verdict, self.flips),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ablation;

impl Ablation {
    pub fn run(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<AblationReport, ScoringError> {
        let candidates = match matrix.candidates_only() {
            Some(m) if m.len() >= 2 => m,
            _ => {
                return Ok(AblationReport {
                    status: ValidationStatus::Insufficient,
                    baseline_leader: None,
                    dimensions: Vec::new(),
                    flips: 0,
                    verdict: AblationVerdict::Robust,
                })
            }
        };

        let baseline = CandidateScorer::rank(&candidates, weights)?;
        let Some(leader) = baseline.leader() else {
            return Err(ScoringError::NoCandidates);
        };

        let mut dimensions = Vec::with_capacity(weights.len());
        for (dimension, weight) in weights.iter() {
            let reduced = match weights.without(dimension) {
                Ok(w) => w,
                Err(InvalidWeightingError::NothingLeft { .. }) => {
                    dimensions.push(DimensionAblation {
                        dimension: dimension.to_string(),
                        weight,
                        leader: None,
                        leader_changed: true,
                        composite_delta: -leader.composite,
                        impact: ImpactClass::from_delta(leader.composite),
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let table = CandidateScorer::rank(&candidates, &reduced)?;
            let new_leader = table.leader().map(|r| r.candidate.clone());
            let delta = table
                .get(&leader.candidate)
                .map(|r| r.composite - leader.composite)
                .unwrap_or(0.0);
            let changed = new_leader.as_deref() != Some(leader.candidate.as_str());
            if changed {
                warn!(dimension, leader = %leader.candidate, "ablation flips the leader");
            }
            dimensions.push(DimensionAblation {
                dimension: dimension.to_string(),
                weight,
                leader: new_leader,
                leader_changed: changed,
                composite_delta: delta,
                impact: ImpactClass::from_delta(delta),
            });
        }

        let flips = dimensions.iter().filter(|d| d.leader_changed).count();
        let verdict = match flips {
            0 => AblationVerdict::Robust,
            1 => AblationVerdict::LargelyRobust,
            _ => AblationVerdict::Fragile,
        };
        info!(flips, ?verdict, "ablation complete");
        Ok(AblationReport {
            status: ValidationStatus::from_pass(verdict != AblationVerdict::Fragile),
            baseline_leader: Some(leader.candidate.clone()),
            dimensions,
            flips,
            verdict,
        })
    }
}
