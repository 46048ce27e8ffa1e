//! Administrative structure: positional classes, co-occurrence network,
//! arithmetic checks and document types.

pub mod arithmetic;
pub mod cooccurrence;
pub mod document_type;
pub mod positional;

pub use arithmetic::{ArithmeticChecker, ArithmeticReport, ArithmeticStatus, TotalCheck};
pub use cooccurrence::{CooccurrenceNetwork, Neighbor, NetworkSummary};
pub use document_type::{DocumentClassification, DocumentClassifier, DocumentType};
pub use positional::{PositionalAnalyzer, PositionalClass, PositionalProfile};

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sigla_core::config::AdministrativeConfig;
use sigla_core::corpus::Corpus;
use tracing::info;

const NETWORK_HUBS: usize = 10;

/// Everything the administrative analyzer reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeReport {
    pub positional: Vec<PositionalProfile>,
    pub network: NetworkSummary,
    pub arithmetic: Vec<ArithmeticReport>,
    pub arithmetic_passed: usize,
    pub arithmetic_failed: usize,
    pub arithmetic_indeterminate: usize,
    pub documents: Vec<DocumentClassification>,
    pub document_counts: BTreeMap<DocumentType, usize>,
}

#[derive(Debug, Clone)]
pub struct AdministrativeAnalyzer {
    positional: PositionalAnalyzer,
    arithmetic: ArithmeticChecker,
    documents: DocumentClassifier,
    window: usize,
}

impl AdministrativeAnalyzer {
    pub fn from_config(config: &AdministrativeConfig) -> Self {
        Self {
            positional: PositionalAnalyzer::from_config(config),
            arithmetic: ArithmeticChecker::from_config(config),
            documents: DocumentClassifier::from_config(config),
            window: config.effective_cooccurrence_window(),
        }
    }

    pub fn network(&self, corpus: &Corpus) -> CooccurrenceNetwork {
        CooccurrenceNetwork::build(corpus, self.window)
    }

    pub fn analyze(&self, corpus: &Corpus) -> AdministrativeReport {
        let _span = tracing::info_span!("sigla.administrative").entered();

        let positional = self.positional.analyze(corpus);
        let network = self.network(corpus).summary(NETWORK_HUBS);

        let arithmetic: Vec<ArithmeticReport> = corpus
            .inscriptions()
            .par_iter()
            .filter_map(|i| self.arithmetic.check(i))
            .collect();
        let count = |s: ArithmeticStatus| arithmetic.iter().filter(|r| r.status == s).count();
        let (arithmetic_passed, arithmetic_failed, arithmetic_indeterminate) = (
            count(ArithmeticStatus::Pass),
            count(ArithmeticStatus::Fail),
            count(ArithmeticStatus::Indeterminate),
        );

        let documents: Vec<DocumentClassification> = corpus
            .inscriptions()
            .par_iter()
            .map(|i| self.documents.classify(i))
            .collect();
        let mut document_counts = BTreeMap::new();
        for d in &documents {
            *document_counts.entry(d.document_type).or_insert(0) += 1;
        }

        info!(
            items = positional.len(),
            totals = arithmetic.len(),
            failed = arithmetic_failed,
            "administrative analysis complete"
        );

        AdministrativeReport {
            positional,
            network,
            arithmetic,
            arithmetic_passed,
            arithmetic_failed,
            arithmetic_indeterminate,
            documents,
            document_counts,
        }
    }
}
