//! Word-final sign statistics: per-slot profiles and the corpus-wide inventory.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigla_core::constants::UNKNOWN_SIGN;
use sigla_core::corpus::Corpus;
use sigla_core::types::collections::FxHashMap;

use super::variant::FormulaVariant;

/// Final-sign counts per slot across formula variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuffixProfile {
    pub by_slot: BTreeMap<String, BTreeMap<String, usize>>,
}

impl SuffixProfile {
    pub fn from_variants(variants: &[FormulaVariant]) -> Self {
        let mut by_slot: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for variant in variants {
            for assignment in &variant.slots {
                let Some(last) = assignment.fill.as_ref().and_then(|f| f.signs.last()) else {
                    continue;
                };
                if last == UNKNOWN_SIGN {
                    continue;
                }
                *by_slot
                    .entry(assignment.label.clone())
                    .or_default()
                    .entry(last.clone())
                    .or_default() += 1;
            }
        }
        Self { by_slot }
    }

    /// Distinct endings seen in a slot.
    pub fn endings(&self, slot: &str) -> Vec<&str> {
        self.by_slot
            .get(slot)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Final-sign counts over every legible word token in the corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuffixInventory {
    pub counts: BTreeMap<String, usize>,
    pub words: usize,
}

impl SuffixInventory {
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        let mut words = 0;
        for inscription in corpus.inscriptions() {
            for token in inscription.words() {
                if token.len() < 2 {
                    continue;
                }
                let Some(last) = token.sign_strs().last() else {
                    continue;
                };
                if last == UNKNOWN_SIGN {
                    continue;
                }
                words += 1;
                *counts.entry(last).or_default() += 1;
            }
        }
        Self {
            counts: counts
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            words,
        }
    }

    /// Endings seen at least `min_count` times, alphabetically.
    pub fn attested(&self, min_count: usize) -> Vec<String> {
        self.counts
            .iter()
            .filter(|(_, &c)| c >= min_count)
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn share(&self, ending: &str) -> f64 {
        if self.words == 0 {
            return 0.0;
        }
        self.counts.get(ending).copied().unwrap_or(0) as f64 / self.words as f64
    }
}
