//! Sign streams: ordered sign sequences, one per token.
//!
//! Bigrams are taken within a sequence, never across token boundaries.

use serde::{Deserialize, Serialize};
use sigla_core::constants::UNKNOWN_SIGN;
use sigla_core::corpus::{Corpus, TokenClass};

use crate::formula::FormulaVariant;

/// Which tokens contribute to a corpus stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamScope {
    /// Syllabic word tokens only.
    #[default]
    Words,
    /// Words and logograms. Numbers never contribute.
    WordsAndLogograms,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignStream {
    sequences: Vec<Vec<String>>,
}

impl SignStream {
    /// Build from raw sequences. Illegible signs are dropped and split the sequence.
    pub fn from_sequences<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut out = Vec::new();
        for seq in sequences {
            let mut current = Vec::new();
            for sign in seq {
                let sign = sign.as_ref().trim();
                if sign.is_empty() {
                    continue;
                }
                if sign == UNKNOWN_SIGN {
                    if !current.is_empty() {
                        out.push(std::mem::take(&mut current));
                    }
                    continue;
                }
                current.push(sign.to_uppercase());
            }
            if !current.is_empty() {
                out.push(current);
            }
        }
        Self { sequences: out }
    }

    pub fn from_corpus(corpus: &Corpus, scope: StreamScope) -> Self {
        Self::from_sequences(
            corpus
                .inscriptions()
                .iter()
                .flat_map(|i| i.tokens())
                .filter(|t| match scope {
                    StreamScope::Words => t.class == TokenClass::Word,
                    StreamScope::WordsAndLogograms => t.class != TokenClass::Number,
                })
                .map(|t| t.sign_strs().collect::<Vec<_>>()),
        )
    }

    /// Signs of every filled slot across the given variants.
    pub fn from_variants(variants: &[FormulaVariant]) -> Self {
        Self::from_sequences(
            variants
                .iter()
                .flat_map(|v| v.slots.iter())
                .filter_map(|s| s.fill.as_ref())
                .map(|f| f.signs.clone()),
        )
    }

    pub fn sequences(&self) -> &[Vec<String>] {
        &self.sequences
    }

    pub fn signs(&self) -> impl Iterator<Item = &str> {
        self.sequences.iter().flatten().map(String::as_str)
    }

    pub fn bigrams(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sequences
            .iter()
            .flat_map(|s| s.windows(2).map(|w| (w[0].as_str(), w[1].as_str())))
    }

    pub fn sign_count(&self) -> usize {
        self.sequences.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
