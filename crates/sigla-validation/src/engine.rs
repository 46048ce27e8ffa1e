//! Runs every validation procedure against one score matrix and weighting.

use serde::Serialize;
use sigla_core::config::{NegativeControlConfig, ValidationConfig};
use sigla_core::errors::ScoringError;
use sigla_scoring::{ScoreMatrix, WeightVector};
use tracing::{info, info_span, warn};

use crate::ablation::{Ablation, AblationReport};
use crate::bootstrap::{Bootstrap, BootstrapReport};
use crate::lexical::{LexicalControl, LexicalReport};
use crate::negative_control::{NegativeControl, NegativeControlReport};
use crate::outcome::{ValidationOutcome, ValidationStatus, ValidityWarning};
use crate::permutation::{PermutationReport, PermutationTest};
use crate::perturbation::{Perturbation, PerturbationReport};
use crate::sensitivity::{SensitivityReport, WeightSensitivity};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub seed: u64,
    pub bootstrap: BootstrapReport,
    pub permutation: PermutationReport,
    pub ablation: AblationReport,
    pub perturbation: PerturbationReport,
    pub negative_control: NegativeControlReport,
    pub lexical: Option<LexicalReport>,
    pub sensitivity: SensitivityReport,
    /// One record per procedure, in run order.
    pub outcomes: Vec<ValidationOutcome>,
    pub warnings: Vec<ValidityWarning>,
}

impl ValidationReport {
    /// False when any warning invalidates the ranking.
    pub fn is_valid(&self) -> bool {
        !self.warnings.iter().any(ValidityWarning::is_invalidating)
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == ValidationStatus::Pass).count()
    }
}

#[derive(Debug, Clone)]
pub struct ValidationEngine {
    seed: u64,
    bootstrap: Bootstrap,
    permutation: PermutationTest,
    ablation: Ablation,
    perturbation: Perturbation,
    negative_control: NegativeControl,
    sensitivity: WeightSensitivity,
    lexical: Option<LexicalControl>,
}

impl ValidationEngine {
    pub fn from_config(validation: &ValidationConfig, control: &NegativeControlConfig) -> Self {
        Self {
            seed: validation.effective_seed(),
            bootstrap: Bootstrap::from_config(validation),
            permutation: PermutationTest::from_config(validation),
            ablation: Ablation,
            perturbation: Perturbation::from_config(validation),
            negative_control: NegativeControl::from_config(control),
            sensitivity: WeightSensitivity::default(),
            lexical: None,
        }
    }

    pub fn with_lexical(mut self, lexical: LexicalControl) -> Self {
        self.lexical = Some(lexical);
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: WeightSensitivity) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// `matrix` holds the true candidates and any control rows.
    pub fn run_all(&self, matrix: &ScoreMatrix, weights: &WeightVector) -> Result<ValidationReport, ScoringError> {
        let span = info_span!("sigla.validation", seed = self.seed, candidates = matrix.candidate_count());
        let _guard = span.enter();

        let bootstrap = self.bootstrap.run(matrix, weights)?;
        let permutation = self.permutation.run(matrix, weights)?;
        let ablation = self.ablation.run(matrix, weights)?;
        let perturbation = self.perturbation.run(matrix, weights)?;
        let negative_control = self.negative_control.run(matrix, weights)?;
        let sensitivity = self.sensitivity.run(matrix, weights)?;
        let lexical = self.lexical.as_ref().map(LexicalControl::run);

        let mut outcomes = vec![
            bootstrap.outcome(),
            permutation.outcome(),
            ablation.outcome(),
            perturbation.outcome(),
            negative_control.outcome(),
        ];
        if let Some(l) = &lexical {
            outcomes.push(l.outcome());
        }
        outcomes.push(sensitivity.outcome());

        let mut warnings = negative_control.warnings();
        warnings.extend(ablation.warnings());
        warnings.extend(sensitivity.warnings());
        for w in &warnings {
            warn!(kind = ?w.kind, test = %w.test, "{}", w.message);
        }

        let report = ValidationReport {
            seed: self.seed,
            bootstrap,
            permutation,
            ablation,
            perturbation,
            negative_control,
            lexical,
            sensitivity,
            outcomes,
            warnings,
        };
        info!(
            passed = report.passed(),
            total = report.outcomes.len(),
            valid = report.is_valid(),
            "validation complete"
        );
        Ok(report)
    }
}
