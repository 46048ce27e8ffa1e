//! Positional distribution of vocabulary items within lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigla_core::config::AdministrativeConfig;
use sigla_core::corpus::{Corpus, TokenClass, TokenPosition};
use sigla_core::types::interning::SignInterner;

/// Where an item prefers to sit in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionalClass {
    /// Dominantly line-initial.
    Header,
    /// Dominantly line-final.
    Total,
    /// Dominantly medial.
    Body,
    /// No position dominates.
    Mixed,
    /// Too few occurrences to classify.
    Insufficient,
}

impl PositionalClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Total => "total",
            Self::Body => "body",
            Self::Mixed => "mixed",
            Self::Insufficient => "insufficient",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionalProfile {
    pub item: String,
    pub occurrences: usize,
    pub initial: usize,
    pub medial: usize,
    #[serde(rename = "final")]
    pub final_: usize,
    pub class: PositionalClass,
}

impl PositionalProfile {
    fn share(&self, n: usize) -> f64 {
        if self.occurrences == 0 {
            0.0
        } else {
            n as f64 / self.occurrences as f64
        }
    }

    pub fn initial_share(&self) -> f64 {
        self.share(self.initial)
    }

    pub fn medial_share(&self) -> f64 {
        self.share(self.medial)
    }

    pub fn final_share(&self) -> f64 {
        self.share(self.final_)
    }
}

#[derive(Debug, Clone)]
pub struct PositionalAnalyzer {
    min_occurrences: usize,
    dominance: f64,
    vocabulary: Vec<String>,
}

impl PositionalAnalyzer {
    pub fn new(min_occurrences: usize, dominance: f64) -> Self {
        Self {
            min_occurrences: min_occurrences.max(1),
            dominance,
            vocabulary: Vec::new(),
        }
    }

    pub fn from_config(config: &AdministrativeConfig) -> Self {
        Self::new(
            config.effective_positional_min_occurrences(),
            config.effective_positional_dominance(),
        )
        .with_vocabulary(config.vocabulary.iter().map(String::as_str))
    }

    /// Restrict profiling to these items. Without a vocabulary every word token is profiled.
    pub fn with_vocabulary<'a, I: IntoIterator<Item = &'a str>>(mut self, items: I) -> Self {
        self.vocabulary = items.into_iter().map(SignInterner::normalize).collect();
        self.vocabulary.sort();
        self.vocabulary.dedup();
        self
    }

    /// Profiles sorted by occurrences descending, then item.
    pub fn analyze(&self, corpus: &Corpus) -> Vec<PositionalProfile> {
        let mut counts: BTreeMap<&str, [usize; 3]> = BTreeMap::new();
        for item in &self.vocabulary {
            counts.insert(item.as_str(), [0; 3]);
        }
        let restricted = !self.vocabulary.is_empty();

        for token in corpus.inscriptions().iter().flat_map(|i| i.tokens()) {
            let tracked = if restricted {
                counts.contains_key(token.text.as_str())
            } else {
                token.class == TokenClass::Word
            };
            if !tracked {
                continue;
            }
            let slot = match token.position {
                TokenPosition::Initial => 0,
                TokenPosition::Medial => 1,
                TokenPosition::Final => 2,
            };
            counts.entry(token.text.as_str()).or_insert([0; 3])[slot] += 1;
        }

        let mut profiles: Vec<PositionalProfile> = counts
            .into_iter()
            .map(|(item, [initial, medial, final_])| {
                let occurrences = initial + medial + final_;
                let mut profile = PositionalProfile {
                    item: item.to_string(),
                    occurrences,
                    initial,
                    medial,
                    final_,
                    class: PositionalClass::Insufficient,
                };
                profile.class = self.classify(&profile);
                profile
            })
            .collect();
        profiles.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.item.cmp(&b.item)));
        profiles
    }

    fn classify(&self, profile: &PositionalProfile) -> PositionalClass {
        if profile.occurrences < self.min_occurrences {
            PositionalClass::Insufficient
        } else if profile.initial_share() > self.dominance {
            PositionalClass::Header
        } else if profile.final_share() > self.dominance {
            PositionalClass::Total
        } else if profile.medial_share() > self.dominance {
            PositionalClass::Body
        } else {
            PositionalClass::Mixed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_core::corpus::RawInscription;

    fn corpus(lines: &[&[&str]]) -> Corpus {
        let raw = lines
            .iter()
            .enumerate()
            .map(|(i, l)| RawInscription::from_words(&format!("T {i}"), "HT", l, &["GRA"]))
            .collect();
        Corpus::load(raw).unwrap()
    }

    #[test]
    fn dominant_initial_item_is_a_header() {
        let c = corpus(&[&["SA-RA2 GRA 3"], &["SA-RA2 GRA 4"], &["SA-RA2 GRA 1"], &["DA-RE SA-RA2"]]);
        let profiles = PositionalAnalyzer::new(3, 0.6).analyze(&c);
        let sara = profiles.iter().find(|p| p.item == "SA-RA2").unwrap();
        assert_eq!(sara.occurrences, 4);
        assert_eq!(sara.initial, 3);
        assert_eq!(sara.final_, 1);
        assert_eq!(sara.class, PositionalClass::Header);
    }

    #[test]
    fn rare_items_are_insufficient_not_classified() {
        let c = corpus(&[&["KU-RO 12"]]);
        let profiles = PositionalAnalyzer::new(5, 0.6).analyze(&c);
        assert_eq!(profiles[0].class, PositionalClass::Insufficient);
    }

    #[test]
    fn vocabulary_restricts_items_and_keeps_unseen_ones() {
        let c = corpus(&[&["KU-RO 12"], &["DA-RE 3"]]);
        let profiles = PositionalAnalyzer::new(1, 0.6)
            .with_vocabulary(["ku-ro", "PO-TO-KU-RO"])
            .analyze(&c);
        let items: Vec<&str> = profiles.iter().map(|p| p.item.as_str()).collect();
        assert_eq!(items, ["KU-RO", "PO-TO-KU-RO"]);
        assert_eq!(profiles[1].occurrences, 0);
        assert_eq!(profiles[1].initial_share(), 0.0);
    }

    #[test]
    fn final_majority_is_total() {
        let c = corpus(&[&["A-DU GRA KU-RO"], &["GRA A-DU"], &["GRA KU-RO A-DU"]]);
        let profiles = PositionalAnalyzer::new(3, 0.6).analyze(&c);
        let adu = profiles.iter().find(|p| p.item == "A-DU").unwrap();
        assert_eq!((adu.initial, adu.medial, adu.final_), (1, 0, 2));
        assert_eq!(adu.class, PositionalClass::Total);
    }
}
