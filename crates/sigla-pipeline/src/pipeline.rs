//! The end-to-end run.
//!
//! Stages, leaf first: formula extraction and rule testing, information
//! theory, administrative structure, corpus profile, scoring, validation,
//! assembly. Every stage reads the same immutable corpus.

use std::collections::BTreeMap;

use sigla_analysis::administrative::AdministrativeAnalyzer;
use sigla_analysis::formula::{FormulaAnalyzer, RuleRegistry, RuleTester, SlotTemplate, SuffixInventory};
use sigla_analysis::information::{InformationAnalyzer, InformationProfile, SignStream, StreamScope};
use sigla_core::config::SiglaConfig;
use sigla_core::errors::{InvalidWeightingError, PipelineError, ScoringError, SiglaErrorCode};
use sigla_core::traits::CorpusProvider;
use sigla_core::Corpus;
use sigla_scoring::reference::{corpus_hypothesis, CASE_ENDINGS, VOCABULARY_ITEMS};
use sigla_scoring::{CandidateFamily, CandidateScorer, CorpusProfile, DimensionResolver, DimensionSchema, WeightVector};
use sigla_validation::lexical::HURRIAN_LEXICON;
use sigla_validation::{LexicalControl, ValidationEngine};
use tracing::{error, info, info_span, warn};

use crate::report::{
    AnalysisReport, CorpusSummary, FormulaSection, InformationSection, ReportAssembler, ReportRecord, StageResults,
};
use crate::sink::ReportSink;

/// An ending must close at least this many words to count as attested.
const SUFFIX_MIN_COUNT: usize = 2;

pub struct Pipeline {
    config: SiglaConfig,
    template: SlotTemplate,
    rules: RuleRegistry,
    schema: DimensionSchema,
    hypothesis: BTreeMap<String, bool>,
    /// Comparison lexicon for the lexical control; `None` skips it.
    lexicon: Option<Vec<String>>,
}

impl Pipeline {
    /// Libation template and rules, standard schema, Hurrian comparison lexicon.
    pub fn new(config: SiglaConfig) -> Result<Self, PipelineError> {
        SiglaConfig::validate(&config)?;
        Ok(Self {
            config,
            template: SlotTemplate::libation(),
            rules: RuleRegistry::libation(),
            schema: DimensionSchema::standard(),
            hypothesis: corpus_hypothesis(),
            lexicon: Some(HURRIAN_LEXICON.iter().map(|w| w.to_string()).collect()),
        })
    }

    pub fn with_formula(mut self, template: SlotTemplate, rules: RuleRegistry) -> Result<Self, PipelineError> {
        template.validate()?;
        rules.validate_against(&template)?;
        self.template = template;
        self.rules = rules;
        Ok(self)
    }

    pub fn with_schema(mut self, schema: DimensionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Structural flags for the corpus. Flags derivable from the corpus
    /// itself are recomputed and win.
    pub fn with_hypothesis(mut self, hypothesis: BTreeMap<String, bool>) -> Self {
        self.hypothesis = hypothesis;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Option<Vec<String>>) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn config(&self) -> &SiglaConfig {
        &self.config
    }

    /// The configured vector, or uniform over the schema when none is set.
    pub fn weights(&self) -> Result<WeightVector, InvalidWeightingError> {
        if self.config.scoring.has_explicit_weights() {
            WeightVector::from_map(&self.schema, &self.config.scoring.weights)
        } else {
            WeightVector::uniform(&self.schema)
        }
    }

    pub fn run_provider(
        &self,
        provider: &dyn CorpusProvider,
        families: &[CandidateFamily],
        controls: &[CandidateFamily],
    ) -> Result<AnalysisReport, PipelineError> {
        let corpus = {
            let _span = info_span!("sigla.corpus", provider = provider.name()).entered();
            provider.load()?
        };
        self.run(&corpus, families, controls)
    }

    /// Run and emit the report records to `sink`. A failed run leaves a
    /// single `failure` record carrying the error code.
    pub fn run_into(
        &self,
        corpus: &Corpus,
        families: &[CandidateFamily],
        controls: &[CandidateFamily],
        sink: &dyn ReportSink,
    ) -> Result<AnalysisReport, PipelineError> {
        let report = match self.run(corpus, families, controls) {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e.coded_string(), sink = sink.name(), "pipeline failed");
                if let Err(sink_err) = sink.write(&ReportRecord::failure(&e)).and_then(|()| sink.flush()) {
                    warn!(error = %sink_err, "failure record not delivered");
                }
                return Err(e);
            }
        };
        ReportAssembler::emit(&report, sink)?;
        Ok(report)
    }

    pub fn run(
        &self,
        corpus: &Corpus,
        families: &[CandidateFamily],
        controls: &[CandidateFamily],
    ) -> Result<AnalysisReport, PipelineError> {
        let seed = self.config.validation.effective_seed();
        let _span = info_span!("sigla.pipeline", inscriptions = corpus.len(), seed).entered();

        if families.is_empty() {
            return Err(ScoringError::NoCandidates.into());
        }
        let weights = self.weights()?;

        // Formula
        let formula = {
            let analyzer = FormulaAnalyzer::new(self.template.clone(), self.config.formula.effective_min_slots())?;
            let extraction = analyzer.extract(corpus);
            let tester = RuleTester::from_config(&self.config.formula);
            let outcomes = tester.test_all(&self.rules, &extraction.variants);
            let summary = RuleTester::summarize(&outcomes);
            FormulaSection::new(extraction, outcomes, summary)
        };

        // Information
        let information = InformationSection {
            corpus: profile_of(SignStream::from_corpus(corpus, StreamScope::Words))?,
            formula: profile_of(SignStream::from_variants(&formula.variants))?,
        };

        // Administrative
        let administrative = AdministrativeAnalyzer::from_config(&self.config.administrative).analyze(corpus);

        // Scoring
        let (profile, matrix, ranking) = {
            let _span = info_span!("sigla.scoring", families = families.len(), controls = controls.len()).entered();
            let inventory = SuffixInventory::from_corpus(corpus);
            let profile = CorpusProfile::builder()
                .hypothesis(&self.hypothesis)
                .vowels_from(corpus)
                .suffixes_from(&inventory, &CASE_ENDINGS, SUFFIX_MIN_COUNT)
                .vocabulary_from(corpus, &VOCABULARY_ITEMS)
                .build();

            let controls: Vec<CandidateFamily> = controls.iter().cloned().map(CandidateFamily::as_control).collect();
            let matrix = DimensionResolver::new(self.schema.clone()).resolve(&profile, families.iter().chain(&controls))?;
            let candidates = matrix.candidates_only().ok_or(ScoringError::NoCandidates)?;
            let ranking = CandidateScorer::rank(&candidates, &weights)?;
            if let Some(leader) = ranking.leader() {
                info!(
                    leader = %leader.candidate,
                    composite = leader.composite,
                    degenerate = ranking.is_degenerate(),
                    "candidates ranked"
                );
            }
            (profile, matrix, ranking)
        };

        // Validation
        let mut engine = ValidationEngine::from_config(&self.config.validation, &self.config.negative_control);
        if let Some(lexicon) = &self.lexicon {
            let lexical = LexicalControl::from_corpus(corpus, &profile.vowels, lexicon).configured(&self.config.validation);
            engine = engine.with_lexical(lexical);
        }
        let validation = engine.run_all(&matrix, &weights)?;

        let report = ReportAssembler::new(seed).assemble(StageResults {
            corpus: CorpusSummary::from_corpus(corpus),
            formula,
            information,
            administrative,
            profile,
            ranking,
            validation,
        });
        info!(valid = report.valid, warnings = report.warnings.len(), "pipeline complete");
        Ok(report)
    }
}

/// `None` for a stream with no countable signs.
fn profile_of(stream: SignStream) -> Result<Option<InformationProfile>, PipelineError> {
    if stream.sign_count() == 0 {
        return Ok(None);
    }
    Ok(Some(InformationAnalyzer::analyze(&stream)?))
}
