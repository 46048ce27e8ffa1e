//! Unigram entropy, redundancy, and bigram predictability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigla_core::errors::AnalysisError;
use sigla_core::types::collections::FxHashMap;
use tracing::debug;

use super::stream::SignStream;

/// Shannon entropy in bits. Zero counts are skipped, never produce NaN.
pub fn shannon_entropy<I: IntoIterator<Item = usize>>(counts: I) -> f64 {
    let counts: Vec<usize> = counts.into_iter().filter(|&c| c > 0).collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let h: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum();
    let max = (counts.len() as f64).log2();
    if h <= 0.0 {
        0.0
    } else {
        h.min(max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignFrequency {
    pub sign: String,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigramMetrics {
    pub bigram_count: usize,
    pub distinct_bigrams: usize,
    /// H(current, next).
    pub joint_entropy: f64,
    /// H(next | current).
    pub conditional_entropy: f64,
    /// log2 of distinct signs seen in next position.
    pub max_next_entropy: f64,
    /// `1 − H(next|current)/Hmax_next`; `None` when only one sign ever follows.
    pub predictability: Option<f64>,
    /// `H(next) − H(next|current)` in bits.
    pub uncertainty_reduction: f64,
    /// Transition counts, current → next → count.
    pub transitions: BTreeMap<String, BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationProfile {
    pub total_signs: usize,
    pub distinct_signs: usize,
    pub entropy: f64,
    pub max_entropy: f64,
    /// `1 − H/Hmax`; 0 when only one sign occurs.
    pub redundancy: f64,
    pub frequencies: Vec<SignFrequency>,
    /// `None` when the stream has no bigrams.
    pub bigram: Option<BigramMetrics>,
}

impl InformationProfile {
    pub fn top(&self, k: usize) -> &[SignFrequency] {
        &self.frequencies[..k.min(self.frequencies.len())]
    }
}

pub struct InformationAnalyzer;

impl InformationAnalyzer {
    pub fn analyze(stream: &SignStream) -> Result<InformationProfile, AnalysisError> {
        if stream.sign_count() == 0 {
            return Err(AnalysisError::EmptyStream);
        }

        let mut unigrams: FxHashMap<&str, usize> = FxHashMap::default();
        for sign in stream.signs() {
            *unigrams.entry(sign).or_default() += 1;
        }
        let total = stream.sign_count();
        let distinct = unigrams.len();
        let entropy = shannon_entropy(unigrams.values().copied());
        let max_entropy = (distinct as f64).log2();
        let redundancy = if max_entropy > 0.0 {
            (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let mut frequencies: Vec<SignFrequency> = unigrams
            .iter()
            .map(|(&sign, &count)| SignFrequency {
                sign: sign.to_string(),
                count,
                share: count as f64 / total as f64,
            })
            .collect();
        frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.sign.cmp(&b.sign)));

        let bigram = Self::bigram_metrics(stream);
        debug!(total, distinct, entropy, "information profile computed");

        Ok(InformationProfile {
            total_signs: total,
            distinct_signs: distinct,
            entropy,
            max_entropy,
            redundancy,
            frequencies,
            bigram,
        })
    }

    fn bigram_metrics(stream: &SignStream) -> Option<BigramMetrics> {
        let mut transitions: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut next_counts: FxHashMap<&str, usize> = FxHashMap::default();
        let mut count = 0;
        for (a, b) in stream.bigrams() {
            *transitions
                .entry(a.to_string())
                .or_default()
                .entry(b.to_string())
                .or_default() += 1;
            *next_counts.entry(b).or_default() += 1;
            count += 1;
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let joint_entropy = shannon_entropy(transitions.values().flat_map(|m| m.values().copied()));
        let conditional_entropy: f64 = transitions
            .values()
            .map(|nexts| {
                let row: usize = nexts.values().sum();
                (row as f64 / n) * shannon_entropy(nexts.values().copied())
            })
            .sum();
        let next_entropy = shannon_entropy(next_counts.values().copied());
        let max_next_entropy = (next_counts.len() as f64).log2();
        let predictability = (max_next_entropy > 0.0)
            .then(|| (1.0 - conditional_entropy / max_next_entropy).clamp(0.0, 1.0));

        Some(BigramMetrics {
            bigram_count: count,
            distinct_bigrams: transitions.values().map(BTreeMap::len).sum(),
            joint_entropy,
            conditional_entropy,
            max_next_entropy,
            predictability,
            uncertainty_reduction: (next_entropy - conditional_entropy).max(0.0),
            transitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(words: &[&str]) -> SignStream {
        SignStream::from_sequences(words.iter().map(|w| w.split('-').collect::<Vec<_>>()))
    }

    #[test]
    fn uniform_distribution_hits_maximum() {
        let p = InformationAnalyzer::analyze(&stream(&["A-B-C-D"])).unwrap();
        assert!((p.entropy - 2.0).abs() < 1e-12);
        assert!((p.max_entropy - 2.0).abs() < 1e-12);
        assert!(p.redundancy.abs() < 1e-12);
    }

    #[test]
    fn single_symbol_has_zero_entropy() {
        let p = InformationAnalyzer::analyze(&stream(&["KU-KU-KU"])).unwrap();
        assert_eq!(p.entropy, 0.0);
        assert_eq!(p.redundancy, 0.0);
        let b = p.bigram.unwrap();
        assert_eq!(b.conditional_entropy, 0.0);
        assert_eq!(b.predictability, None);
    }

    #[test]
    fn deterministic_transitions_are_fully_predictable() {
        // A→B, B→C, C→A: next sign is fully determined.
        let p = InformationAnalyzer::analyze(&stream(&["A-B-C-A-B-C-A"])).unwrap();
        let b = p.bigram.unwrap();
        assert!(b.conditional_entropy.abs() < 1e-12);
        assert_eq!(b.predictability, Some(1.0));
        assert!(b.uncertainty_reduction > 1.5);
    }

    #[test]
    fn bigrams_do_not_cross_tokens() {
        let p = InformationAnalyzer::analyze(&stream(&["A", "B"])).unwrap();
        assert!(p.bigram.is_none());
    }

    #[test]
    fn empty_stream_is_an_error() {
        assert_eq!(
            InformationAnalyzer::analyze(&SignStream::default()).unwrap_err(),
            AnalysisError::EmptyStream
        );
        assert_eq!(
            InformationAnalyzer::analyze(&stream(&["?"])).unwrap_err(),
            AnalysisError::EmptyStream
        );
    }

    #[test]
    fn frequencies_sorted_by_count_then_sign() {
        let p = InformationAnalyzer::analyze(&stream(&["KU-RO", "KU-PA", "RO"])).unwrap();
        let signs: Vec<&str> = p.frequencies.iter().map(|f| f.sign.as_str()).collect();
        assert_eq!(signs, ["KU", "RO", "PA"]);
        assert_eq!(p.top(1)[0].count, 2);
        assert_eq!(p.top(10).len(), 3);
    }
}
