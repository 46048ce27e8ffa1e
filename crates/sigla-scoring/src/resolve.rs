//! Turn families and the corpus profile into a score matrix.
//!
//! Linguistic dimensions are derived from the family's raw profile whenever
//! both sides carry the needed data; otherwise the family's reference score is
//! used. A dimension with neither fails the call.

use std::collections::BTreeMap;

use sigla_core::errors::ScoringError;
use tracing::debug;

use crate::dimension::{DimensionSchema, CASE_SYSTEM, STRUCTURAL_FEATURES, VOCABULARY, VOWEL_SYSTEM};
use crate::family::{CandidateFamily, FamilyProfile};
use crate::matrix::{CandidateRow, ScoreMatrix};
use crate::profile::CorpusProfile;

/// Score lost per bit of vowel divergence.
const VOWEL_KL_PENALTY: f64 = 5.0;

/// `Σ t·log2(t/r)` over vowels positive in both distributions.
pub fn vowel_divergence(target: &BTreeMap<String, f64>, reference: &BTreeMap<String, f64>) -> f64 {
    target
        .iter()
        .filter_map(|(v, &t)| {
            let r = reference.get(v).copied().unwrap_or(0.0);
            (t > 0.0 && r > 0.0).then(|| t * (t / r).log2())
        })
        .sum()
}

pub fn vowel_score(target: &BTreeMap<String, f64>, reference: &BTreeMap<String, f64>) -> f64 {
    (1.0 - VOWEL_KL_PENALTY * vowel_divergence(target, reference)).clamp(0.0, 1.0)
}

/// Share of corpus feature flags the family shares.
pub fn feature_score(corpus: &BTreeMap<String, bool>, family: &BTreeMap<String, bool>) -> f64 {
    if corpus.is_empty() {
        return 0.0;
    }
    let matched = corpus
        .iter()
        .filter(|(k, v)| family.get(k.as_str()) == Some(*v))
        .count();
    matched as f64 / corpus.len() as f64
}

/// Mean family value over the attested keys; unknown keys count as 0.
pub fn attested_mean(attested: &[String], family: &BTreeMap<String, f64>) -> f64 {
    if attested.is_empty() {
        return 0.0;
    }
    attested
        .iter()
        .map(|k| family.get(k).copied().unwrap_or(0.0))
        .sum::<f64>()
        / attested.len() as f64
}

pub struct DimensionResolver {
    schema: DimensionSchema,
}

impl DimensionResolver {
    pub fn new(schema: DimensionSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &DimensionSchema {
        &self.schema
    }

    pub fn resolve<'a, I>(&self, corpus: &CorpusProfile, families: I) -> Result<ScoreMatrix, ScoringError>
    where
        I: IntoIterator<Item = &'a CandidateFamily>,
    {
        let rows = families
            .into_iter()
            .map(|f| self.row(corpus, f))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), dimensions = self.schema.len(), "score matrix resolved");
        ScoreMatrix::new(self.schema.ids().map(str::to_string).collect(), rows)
    }

    fn row(&self, corpus: &CorpusProfile, family: &CandidateFamily) -> Result<CandidateRow, ScoringError> {
        family.validate()?;
        let mut scores = Vec::with_capacity(self.schema.len());
        let mut uncertainty = Vec::with_capacity(self.schema.len());
        let mut justifications = Vec::with_capacity(self.schema.len());

        for dimension in self.schema.ids() {
            let derived = family
                .profile
                .as_ref()
                .and_then(|p| derive(dimension, corpus, p));
            let (score, justification) = match derived {
                Some(d) => d,
                None => {
                    let score = family.scores.get(dimension).copied().ok_or_else(|| {
                        ScoringError::MissingDimension {
                            candidate: family.id.clone(),
                            dimension: dimension.to_string(),
                        }
                    })?;
                    let justification = family
                        .justifications
                        .get(dimension)
                        .cloned()
                        .unwrap_or_default();
                    (score, justification)
                }
            };
            scores.push(score);
            uncertainty.push(family.uncertainty.get(dimension).copied().unwrap_or(0.0));
            justifications.push(justification);
        }

        Ok(CandidateRow {
            id: family.id.clone(),
            name: family.display_name().to_string(),
            scores,
            uncertainty,
            justifications,
            control: family.control,
        })
    }
}

fn derive(dimension: &str, corpus: &CorpusProfile, family: &FamilyProfile) -> Option<(f64, String)> {
    match dimension {
        VOWEL_SYSTEM => {
            let reference = family.best_vowels();
            if corpus.vowels.is_empty() || reference.is_empty() {
                return None;
            }
            let kl = vowel_divergence(&corpus.vowels, reference);
            Some((
                vowel_score(&corpus.vowels, reference),
                format!("vowel divergence {kl:.3} bits"),
            ))
        }
        STRUCTURAL_FEATURES => {
            if corpus.features.is_empty() || family.features.is_empty() {
                return None;
            }
            let score = feature_score(&corpus.features, &family.features);
            let matched = (score * corpus.features.len() as f64).round() as usize;
            Some((score, format!("{matched}/{} features shared", corpus.features.len())))
        }
        CASE_SYSTEM => {
            if corpus.suffixes.is_empty() || family.suffix_similarity.is_empty() {
                return None;
            }
            Some((
                attested_mean(&corpus.suffixes, &family.suffix_similarity),
                format!("mean similarity over {} attested endings", corpus.suffixes.len()),
            ))
        }
        VOCABULARY => {
            if corpus.vocabulary.is_empty() || family.vocabulary_matches.is_empty() {
                return None;
            }
            Some((
                attested_mean(&corpus.vocabulary, &family.vocabulary_matches),
                format!("mean match over {} attested items", corpus.vocabulary.len()),
            ))
        }
        _ => None,
    }
}
