//! The corpus feature summary, expressed in the terms families are scored on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigla_analysis::formula::SuffixInventory;
use sigla_core::constants::UNKNOWN_SIGN;
use sigla_core::corpus::{Corpus, TokenClass};
use sigla_core::types::collections::FxHashSet;
use tracing::debug;

pub const VOWELS: [&str; 5] = ["a", "e", "i", "o", "u"];

/// Flags recomputed from corpus evidence, overriding any hypothesis value.
pub const FEATURE_THREE_VOWELS: &str = "three_vowel_system";
pub const FEATURE_RICH_CASES: &str = "rich_case_system";
pub const FEATURE_POSSESSIVE: &str = "possessive_enclitics";
pub const FEATURE_ESSIVE: &str = "essive_case";

/// `o` below this share marks a three-vowel system.
const MARGINAL_VOWEL_SHARE: f64 = 0.10;
/// Attested case endings needed for a rich case system.
const RICH_CASE_ENDINGS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusProfile {
    /// Vowel shares of syllabic signs, summing to 1 when non-empty.
    pub vowels: BTreeMap<String, f64>,
    pub features: BTreeMap<String, bool>,
    /// Case endings attested in the corpus.
    pub suffixes: Vec<String>,
    /// Reference vocabulary items attested in the corpus.
    pub vocabulary: Vec<String>,
}

impl CorpusProfile {
    pub fn builder() -> CorpusProfileBuilder {
        CorpusProfileBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vowels.is_empty()
            && self.features.is_empty()
            && self.suffixes.is_empty()
            && self.vocabulary.is_empty()
    }
}

/// Vowel of a syllabic sign: `RA2` → `a`, `*301` → none.
pub fn sign_vowel(sign: &str) -> Option<&'static str> {
    if sign.starts_with('*') || sign == UNKNOWN_SIGN {
        return None;
    }
    let last = sign
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .chars()
        .last()?
        .to_ascii_lowercase();
    VOWELS.iter().copied().find(|v| v.starts_with(last))
}

/// Vowel shares over every syllabic sign of every word token.
pub fn vowel_shares(corpus: &Corpus) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for token in corpus
        .inscriptions()
        .iter()
        .flat_map(|i| i.tokens())
        .filter(|t| t.class == TokenClass::Word)
    {
        for sign in token.sign_strs() {
            if let Some(v) = sign_vowel(sign) {
                *counts.entry(v).or_default() += 1;
            }
        }
    }
    let total: usize = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .into_iter()
        .map(|(v, c)| (v.to_string(), c as f64 / total as f64))
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct CorpusProfileBuilder {
    vowels: BTreeMap<String, f64>,
    hypothesis: BTreeMap<String, bool>,
    suffixes: Vec<String>,
    vocabulary: Vec<String>,
}

impl CorpusProfileBuilder {
    /// Structural reading supplied by the analyst. Derived flags override these.
    pub fn hypothesis(mut self, flags: &BTreeMap<String, bool>) -> Self {
        self.hypothesis = flags.clone();
        self
    }

    pub fn vowels(mut self, shares: BTreeMap<String, f64>) -> Self {
        self.vowels = shares;
        self
    }

    pub fn vowels_from(self, corpus: &Corpus) -> Self {
        self.vowels(vowel_shares(corpus))
    }

    /// Keep the `endings` seen at least `min_count` times as word-final signs.
    pub fn suffixes_from(mut self, inventory: &SuffixInventory, endings: &[&str], min_count: usize) -> Self {
        self.suffixes = endings
            .iter()
            .filter(|e| inventory.counts.get(**e).copied().unwrap_or(0) >= min_count.max(1))
            .map(|e| e.to_string())
            .collect();
        self
    }

    pub fn suffixes(mut self, endings: &[&str]) -> Self {
        self.suffixes = endings.iter().map(|e| e.to_string()).collect();
        self
    }

    /// Keep the `items` that occur as word tokens.
    pub fn vocabulary_from(mut self, corpus: &Corpus, items: &[&str]) -> Self {
        let attested: FxHashSet<&str> = corpus
            .inscriptions()
            .iter()
            .flat_map(|i| i.words())
            .map(|t| t.text.as_str())
            .collect();
        self.vocabulary = items
            .iter()
            .filter(|item| attested.contains(**item))
            .map(|item| item.to_string())
            .collect();
        self
    }

    pub fn vocabulary(mut self, items: &[&str]) -> Self {
        self.vocabulary = items.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn build(self) -> CorpusProfile {
        let mut features = self.hypothesis;
        if !self.vowels.is_empty() {
            let o = self.vowels.get("o").copied().unwrap_or(0.0);
            features.insert(FEATURE_THREE_VOWELS.to_string(), o < MARGINAL_VOWEL_SHARE);
        }
        if !self.suffixes.is_empty() {
            let has = |e: &str| self.suffixes.iter().any(|s| s == e);
            features.insert(
                FEATURE_RICH_CASES.to_string(),
                self.suffixes.len() >= RICH_CASE_ENDINGS,
            );
            features.insert(FEATURE_POSSESSIVE.to_string(), has("ME"));
            features.insert(FEATURE_ESSIVE.to_string(), has("E"));
        }
        debug!(
            vowels = self.vowels.len(),
            features = features.len(),
            suffixes = self.suffixes.len(),
            vocabulary = self.vocabulary.len(),
            "corpus profile built"
        );
        CorpusProfile {
            vowels: self.vowels,
            features,
            suffixes: self.suffixes,
            vocabulary: self.vocabulary,
        }
    }
}
