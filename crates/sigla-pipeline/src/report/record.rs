//! Report records: one self-describing JSON object per line of output.

use serde::Serialize;
use sigla_analysis::administrative::AdministrativeReport;
use sigla_analysis::formula::{RegistrySummary, RuleOutcome};
use sigla_analysis::information::InformationProfile;
use sigla_core::errors::{PipelineError, SiglaErrorCode};
use sigla_scoring::{ScoreTable, WeightVector};
use sigla_validation::{ValidationOutcome, ValidityWarning};

use super::assembler::CorpusSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ReportRecord {
    Header {
        version: String,
        seed: u64,
        weights: WeightVector,
        corpus: CorpusSummary,
        valid: bool,
    },
    Rule(RuleOutcome),
    RuleSummary(RegistrySummary),
    Information {
        stream: String,
        profile: InformationProfile,
    },
    Administrative(AdministrativeReport),
    Ranking(ScoreTable),
    Validation(ValidationOutcome),
    Warning(ValidityWarning),
    /// The run aborted; no other record follows.
    Failure {
        code: String,
        message: String,
    },
}

impl ReportRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
            Self::Rule(_) => "rule",
            Self::RuleSummary(_) => "rule_summary",
            Self::Information { .. } => "information",
            Self::Administrative(_) => "administrative",
            Self::Ranking(_) => "ranking",
            Self::Validation(_) => "validation",
            Self::Warning(_) => "warning",
            Self::Failure { .. } => "failure",
        }
    }

    pub fn failure(error: &PipelineError) -> Self {
        Self::Failure {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}
