//! Assembles stage outputs into an [`AnalysisReport`] and flattens it into
//! [`ReportRecord`]s in a fixed order.

use std::collections::BTreeSet;

use serde::Serialize;
use sigla_analysis::administrative::AdministrativeReport;
use sigla_analysis::formula::{FormulaExtraction, FormulaVariant, RegistrySummary, RuleOutcome, SuffixProfile};
use sigla_analysis::information::InformationProfile;
use sigla_core::constants::VERSION;
use sigla_core::corpus::InscriptionId;
use sigla_core::errors::ReportError;
use sigla_core::Corpus;
use sigla_scoring::{CorpusProfile, ScoreTable, WeightVector};
use sigla_validation::{ValidationReport, ValidityWarning};
use tracing::debug;

use super::record::ReportRecord;
use crate::sink::ReportSink;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    pub inscriptions: usize,
    pub sites: Vec<String>,
    pub tokens: usize,
    pub distinct_signs: usize,
}

impl CorpusSummary {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let sites: BTreeSet<&str> = corpus.inscriptions().iter().map(|i| i.site.as_str()).collect();
        Self {
            inscriptions: corpus.len(),
            sites: sites.into_iter().map(str::to_string).collect(),
            tokens: corpus.total_tokens(),
            distinct_signs: corpus.alphabet().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaSection {
    pub template: String,
    pub min_slots: usize,
    pub scanned: usize,
    pub variants: Vec<FormulaVariant>,
    pub excluded: Vec<InscriptionId>,
    pub suffixes: SuffixProfile,
    /// Registry order.
    pub rules: Vec<RuleOutcome>,
    pub summary: RegistrySummary,
}

impl FormulaSection {
    pub fn new(extraction: FormulaExtraction, rules: Vec<RuleOutcome>, summary: RegistrySummary) -> Self {
        Self {
            suffixes: SuffixProfile::from_variants(&extraction.variants),
            template: extraction.template,
            min_slots: extraction.min_slots,
            scanned: extraction.scanned,
            variants: extraction.variants,
            excluded: extraction.excluded,
            rules,
            summary,
        }
    }

    pub fn rule(&self, id: &str) -> Option<&RuleOutcome> {
        self.rules.iter().find(|r| r.rule_id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformationSection {
    /// `None` when the corpus has no word signs.
    pub corpus: Option<InformationProfile>,
    /// Signs of the formula slots only; `None` without variants.
    pub formula: Option<InformationProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub version: String,
    pub seed: u64,
    pub corpus: CorpusSummary,
    pub formula: FormulaSection,
    pub information: InformationSection,
    pub administrative: AdministrativeReport,
    pub profile: CorpusProfile,
    /// The vector every score in `ranking` and `validation` was computed with.
    pub weights: WeightVector,
    pub ranking: ScoreTable,
    pub validation: ValidationReport,
    pub warnings: Vec<ValidityWarning>,
    /// False when a warning invalidates the ranking.
    pub valid: bool,
}

impl AnalysisReport {
    pub fn leader(&self) -> Option<&str> {
        self.ranking.leader().map(|r| r.candidate.as_str())
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialize {
            record: "analysis_report".to_string(),
            message: e.to_string(),
        })
    }
}

/// Everything the stages produced, before assembly.
#[derive(Debug, Clone)]
pub struct StageResults {
    pub corpus: CorpusSummary,
    pub formula: FormulaSection,
    pub information: InformationSection,
    pub administrative: AdministrativeReport,
    pub profile: CorpusProfile,
    pub ranking: ScoreTable,
    pub validation: ValidationReport,
}

#[derive(Debug, Clone)]
pub struct ReportAssembler {
    version: String,
    seed: u64,
}

impl ReportAssembler {
    pub fn new(seed: u64) -> Self {
        Self {
            version: VERSION.to_string(),
            seed,
        }
    }

    pub fn assemble(&self, stages: StageResults) -> AnalysisReport {
        let mut warnings = stages.validation.warnings.clone();
        warnings.sort_by(|a, b| a.test.name().cmp(b.test.name()).then_with(|| a.message.cmp(&b.message)));
        let valid = !warnings.iter().any(ValidityWarning::is_invalidating);

        AnalysisReport {
            version: self.version.clone(),
            seed: self.seed,
            corpus: stages.corpus,
            formula: stages.formula,
            information: stages.information,
            administrative: stages.administrative,
            profile: stages.profile,
            weights: stages.ranking.weights.clone(),
            ranking: stages.ranking,
            validation: stages.validation,
            warnings,
            valid,
        }
    }

    /// Header, rules, rule summary, information, administrative, ranking,
    /// validation outcomes, warnings.
    pub fn records(report: &AnalysisReport) -> Vec<ReportRecord> {
        let mut records = Vec::with_capacity(8 + report.formula.rules.len() + report.validation.outcomes.len());
        records.push(ReportRecord::Header {
            version: report.version.clone(),
            seed: report.seed,
            weights: report.weights.clone(),
            corpus: report.corpus.clone(),
            valid: report.valid,
        });
        records.extend(report.formula.rules.iter().cloned().map(ReportRecord::Rule));
        records.push(ReportRecord::RuleSummary(report.formula.summary.clone()));
        let streams = [("corpus", &report.information.corpus), ("formula", &report.information.formula)];
        for (stream, profile) in streams {
            if let Some(profile) = profile {
                records.push(ReportRecord::Information {
                    stream: stream.to_string(),
                    profile: profile.clone(),
                });
            }
        }
        records.push(ReportRecord::Administrative(report.administrative.clone()));
        records.push(ReportRecord::Ranking(report.ranking.clone()));
        records.extend(report.validation.outcomes.iter().cloned().map(ReportRecord::Validation));
        records.extend(report.warnings.iter().cloned().map(ReportRecord::Warning));
        records
    }

    /// Write every record to `sink` and flush. Returns the record count.
    pub fn emit(report: &AnalysisReport, sink: &dyn ReportSink) -> Result<usize, ReportError> {
        let records = Self::records(report);
        for record in &records {
            sink.write(record)?;
        }
        sink.flush()?;
        debug!(sink = sink.name(), records = records.len(), "report emitted");
        Ok(records.len())
    }
}
