//! Lexical chance-match control.
//!
//! How well would random words with the corpus's phonotactics match the
//! comparison lexicon? Pseudo-lexicons are built from CV syllables with vowels
//! drawn at the corpus's vowel frequencies; each is scored the same way as the
//! real word list.

use std::collections::{BTreeMap, BTreeSet};

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::Serialize;
use sigla_core::config::ValidationConfig;
use sigla_core::corpus::Corpus;
use tracing::info;

use crate::outcome::{percentile, ValidationOutcome, ValidationStatus, ValidationTest};
use crate::trial::{run_trials, trial_rng, Merge, LEXICAL_SALT};

/// Onsets; the empty onset yields a bare vowel.
pub const CONSONANTS: [&str; 13] = ["", "d", "j", "k", "m", "n", "p", "q", "r", "s", "t", "w", "z"];

pub const VOWELS: [&str; 5] = ["a", "i", "u", "e", "o"];

/// Published corpus vowel percentages, a i u e o.
pub const CORPUS_VOWEL_WEIGHTS: [f64; 5] = [43.3, 20.6, 17.5, 14.4, 4.1];

pub const MIN_SYLLABLES: usize = 2;
pub const MAX_SYLLABLES: usize = 5;

/// Hurrian comparison vocabulary.
pub const HURRIAN_LEXICON: [&str; 20] = [
    "attai", "sarri", "une", "tani", "ame", "ebri", "enni", "asti", "neri", "kelu", "arni", "tahe",
    "sena", "puru", "hawu", "tiwi", "kumme", "allai", "hurri", "simiki",
];

/// Published corpus words with proposed correspondences, romanised.
pub const CORPUS_WORDS: [&str; 9] = [
    "atai", "sasara", "dakuna", "idamate", "dupure", "unakanas", "kuro", "ipinama", "sirute",
];

/// `A-TA-I` → `atai`: lowercase, separators and sign indices dropped.
pub fn romanize(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Distinct romanised words of the corpus, sorted. Words with unread or
/// unnamed (`*301`) signs, or fewer than [`MIN_SYLLABLES`] signs, are left out.
pub fn corpus_words(corpus: &Corpus) -> Vec<String> {
    let words: BTreeSet<String> = corpus
        .inscriptions()
        .iter()
        .flat_map(|i| i.words())
        .filter(|t| !t.has_unknown && t.len() >= MIN_SYLLABLES)
        .filter(|t| !t.sign_strs().any(|s| s.starts_with('*')))
        .map(|t| romanize(&t.text))
        .filter(|w| !w.is_empty())
        .collect();
    words.into_iter().collect()
}

fn bigrams(word: &str) -> FxHashSet<(char, char)> {
    let chars: Vec<char> = word.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Shared character bigrams over the larger bigram set.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (x, y) = (bigrams(a), bigrams(b));
    let denom = x.len().max(y.len());
    if denom == 0 {
        return 0.0;
    }
    x.intersection(&y).count() as f64 / denom as f64
}

/// Mean over `words` of the best similarity against `lexicon`.
pub fn lexicon_score<S: AsRef<str>>(words: &[S], lexicon: &[String]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let total: f64 = words
        .iter()
        .map(|w| {
            lexicon
                .iter()
                .map(|l| similarity(w.as_ref(), l))
                .fold(0.0, f64::max)
        })
        .sum();
    total / words.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalReport {
    pub status: ValidationStatus,
    pub iterations: usize,
    pub seed: u64,
    pub words: usize,
    pub actual: f64,
    pub null_mean: f64,
    pub p95: f64,
    pub p99: f64,
    /// Share of pseudo-lexicons scoring ≥ `actual`.
    pub p_value: f64,
    pub alpha: f64,
}

impl LexicalReport {
    pub fn outcome(&self) -> ValidationOutcome {
        if self.status == ValidationStatus::Insufficient {
            return ValidationOutcome::insufficient(ValidationTest::LexicalControl, "empty word list or lexicon");
        }
        ValidationOutcome {
            test: ValidationTest::LexicalControl,
            status: self.status,
            estimate: Some(self.p_value),
            interval: None,
            threshold: Some(self.alpha),
            iterations: self.iterations,
            summary: format!(
                "actual match {:.3} against chance mean {:.3} (95th {:.3}, 99th {:.3})",
                self.actual, self.null_mean, self.p95, self.p99
            ),
        }
    }
}

struct Scores(Vec<f64>);

impl Merge for Scores {
    fn merge(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LexicalControl {
    words: Vec<String>,
    lexicon: Vec<String>,
    vowel_weights: Vec<f64>,
    iterations: usize,
    seed: u64,
    alpha: f64,
    parallel: bool,
}

impl LexicalControl {
    pub fn new<W, L>(words: &[W], lexicon: &[L]) -> Self
    where
        W: AsRef<str>,
        L: AsRef<str>,
    {
        Self {
            words: words.iter().map(|w| romanize(w.as_ref())).filter(|w| !w.is_empty()).collect(),
            lexicon: lexicon.iter().map(|w| romanize(w.as_ref())).filter(|w| !w.is_empty()).collect(),
            vowel_weights: CORPUS_VOWEL_WEIGHTS.to_vec(),
            iterations: 1_000,
            seed: 42,
            alpha: 0.05,
            parallel: true,
        }
    }

    /// The published word list against the Hurrian comparison list.
    pub fn reference() -> Self {
        Self::new(&CORPUS_WORDS, &HURRIAN_LEXICON)
    }

    /// The corpus's own words against `lexicon`, with pseudo-words drawn at
    /// the corpus's vowel shares.
    pub fn from_corpus<L: AsRef<str>>(corpus: &Corpus, vowel_shares: &BTreeMap<String, f64>, lexicon: &[L]) -> Self {
        Self::new(&corpus_words(corpus), lexicon).with_vowel_shares(vowel_shares)
    }

    pub fn configured(mut self, config: &ValidationConfig) -> Self {
        self.iterations = config.effective_lexical_iterations();
        self.seed = config.effective_seed();
        self.alpha = config.effective_alpha();
        self.parallel = config.effective_parallel();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Vowel weights in `a i u e o` order; the corpus shares by default.
    pub fn with_vowel_weights(mut self, weights: [f64; 5]) -> Self {
        self.vowel_weights = weights.to_vec();
        self
    }

    /// Shares keyed by vowel; missing vowels get no weight. With no weight
    /// at all the control reports `Insufficient`.
    pub fn with_vowel_shares(mut self, shares: &BTreeMap<String, f64>) -> Self {
        self.vowel_weights = VOWELS.iter().map(|v| shares.get(*v).copied().unwrap_or(0.0)).collect();
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn vowel_weights(&self) -> &[f64] {
        &self.vowel_weights
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn pseudo_word<R: Rng>(rng: &mut R, vowels: &WeightedIndex<f64>) -> String {
        let syllables = rng.gen_range(MIN_SYLLABLES..=MAX_SYLLABLES);
        let mut word = String::with_capacity(syllables * 2);
        for _ in 0..syllables {
            word.push_str(CONSONANTS[rng.gen_range(0..CONSONANTS.len())]);
            word.push_str(VOWELS[vowels.sample(rng)]);
        }
        word
    }

    pub fn run(&self) -> LexicalReport {
        let insufficient = || LexicalReport {
            status: ValidationStatus::Insufficient,
            iterations: self.iterations,
            seed: self.seed,
            words: self.words.len(),
            actual: 0.0,
            null_mean: 0.0,
            p95: 0.0,
            p99: 0.0,
            p_value: 1.0,
            alpha: self.alpha,
        };
        if self.words.is_empty() || self.lexicon.is_empty() || self.iterations == 0 {
            return insufficient();
        }
        let Ok(vowels) = WeightedIndex::new(&self.vowel_weights) else {
            return insufficient();
        };

        let actual = lexicon_score(&self.words, &self.lexicon);
        let n_words = self.words.len();
        let scores = run_trials(
            self.iterations,
            self.parallel,
            || Scores(Vec::new()),
            |acc, t| {
                let mut rng = trial_rng(self.seed, LEXICAL_SALT, t);
                let pseudo: Vec<String> = (0..n_words).map(|_| Self::pseudo_word(&mut rng, &vowels)).collect();
                acc.0.push(lexicon_score(&pseudo, &self.lexicon));
            },
        );

        let mut null = scores.0;
        null.sort_by(f64::total_cmp);
        let at_least = null.iter().filter(|&&s| s >= actual).count();
        let p_value = at_least as f64 / null.len() as f64;
        info!(actual, p_value, "lexical control complete");
        LexicalReport {
            status: ValidationStatus::from_pass(p_value < self.alpha),
            iterations: self.iterations,
            seed: self.seed,
            words: n_words,
            actual,
            null_mean: null.iter().sum::<f64>() / null.len() as f64,
            p95: percentile(&null, 0.95).unwrap_or(0.0),
            p99: percentile(&null, 0.99).unwrap_or(0.0),
            p_value,
            alpha: self.alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_core::corpus::RawInscription;

    #[test]
    fn similarity_counts_shared_bigrams() {
        // atai: at ta ai; attai: at tt ta ai
        assert!((similarity("atai", "attai") - 0.75).abs() < 1e-12);
        assert_eq!(similarity("a", "b"), 0.0);
        assert_eq!(similarity("kuro", "kuro"), 1.0);
    }

    #[test]
    fn romanize_strips_separators() {
        assert_eq!(romanize("A-TA-I"), "atai");
        assert_eq!(romanize("DU-PU2-RE"), "dupure");
    }

    fn corpus(lines: &[&str]) -> Corpus {
        Corpus::load(vec![RawInscription::from_words("HT 1", "HT", lines, &["VIN"])]).unwrap()
    }

    #[test]
    fn corpus_words_are_distinct_and_multi_sign() {
        let corpus = corpus(&["KU-RO VIN 5 A", "KU-RO PO-TO-KU-RO *301-NA ?-NA"]);
        assert_eq!(corpus_words(&corpus), vec!["kuro".to_string(), "potokuro".to_string()]);
    }

    #[test]
    fn controls_follow_their_corpus() {
        let shares: BTreeMap<String, f64> = [("a", 0.5), ("o", 0.5)]
            .into_iter()
            .map(|(v, s)| (v.to_string(), s))
            .collect();
        let a = LexicalControl::from_corpus(&corpus(&["KU-RO"]), &shares, &HURRIAN_LEXICON);
        let b = LexicalControl::from_corpus(&corpus(&["PO-TO-KO TA-NA-TI"]), &shares, &HURRIAN_LEXICON);
        assert_eq!(a.words(), ["kuro"]);
        assert_eq!(b.words().len(), 2);
        assert_eq!(a.vowel_weights(), [0.5, 0.0, 0.0, 0.0, 0.5]);

        let (ra, rb) = (a.with_iterations(50).run(), b.with_iterations(50).run());
        assert_ne!(ra.words, rb.words);
        assert_ne!(ra.actual, rb.actual);
    }

    #[test]
    fn no_vowel_evidence_is_insufficient() {
        let control = LexicalControl::from_corpus(&corpus(&["KU-RO"]), &BTreeMap::new(), &HURRIAN_LEXICON);
        assert_eq!(control.with_iterations(10).run().status, ValidationStatus::Insufficient);
    }

    #[test]
    fn pseudo_words_respect_phonotactics() {
        let vowels = WeightedIndex::new(CORPUS_VOWEL_WEIGHTS).unwrap();
        let mut rng = trial_rng(5, LEXICAL_SALT, 0);
        for _ in 0..200 {
            let w = LexicalControl::pseudo_word(&mut rng, &vowels);
            let vowel_count = w.chars().filter(|c| "aiueo".contains(*c)).count();
            assert!((MIN_SYLLABLES..=MAX_SYLLABLES).contains(&vowel_count), "{w}");
        }
    }
}
