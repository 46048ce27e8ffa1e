//! Raw inscription records as supplied by the ingestion collaborator.

use serde::{Deserialize, Serialize};

/// Sign kind as written in the raw input. `divider` separates words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawSignKind {
    Syllabogram,
    Logogram,
    Numeral,
    Fraction,
    Unclassified,
    Divider,
}

/// One sign as it appears in a raw line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSign {
    pub sign_id: String,
    #[serde(rename = "type")]
    pub kind: RawSignKind,
}

impl RawSign {
    pub fn new(sign_id: impl Into<String>, kind: RawSignKind) -> Self {
        Self {
            sign_id: sign_id.into(),
            kind,
        }
    }

    pub fn syllabogram(sign_id: impl Into<String>) -> Self {
        Self::new(sign_id, RawSignKind::Syllabogram)
    }

    pub fn logogram(sign_id: impl Into<String>) -> Self {
        Self::new(sign_id, RawSignKind::Logogram)
    }

    pub fn numeral(value: u64) -> Self {
        Self::new(value.to_string(), RawSignKind::Numeral)
    }

    pub fn divider() -> Self {
        Self::new("|", RawSignKind::Divider)
    }
}

/// `{id, site, lines: [[{sign_id, type} ...]]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInscription {
    pub id: String,
    #[serde(default)]
    pub site: String,
    pub lines: Vec<Vec<RawSign>>,
}

impl RawInscription {
    /// Build a raw inscription from word-level shorthand.
    ///
    /// Each line is a whitespace-separated list of words. Hyphenated words
    /// become syllabogram runs, bare integers become numerals, `n/d` becomes a
    /// fraction, and all-caps words of two or more letters without hyphens
    /// that are listed in `logograms` become logograms.
    pub fn from_words(id: &str, site: &str, lines: &[&str], logograms: &[&str]) -> Self {
        let lines = lines
            .iter()
            .map(|line| {
                let mut signs = Vec::new();
                for (i, word) in line.split_whitespace().enumerate() {
                    if i > 0 {
                        signs.push(RawSign::divider());
                    }
                    if word.parse::<u64>().is_ok() {
                        signs.push(RawSign::new(word, RawSignKind::Numeral));
                    } else if word.contains('/') {
                        signs.push(RawSign::new(word, RawSignKind::Fraction));
                    } else if logograms.contains(&word) {
                        signs.push(RawSign::logogram(word));
                    } else {
                        signs.extend(word.split('-').map(RawSign::syllabogram));
                    }
                }
                signs
            })
            .collect();
        Self {
            id: id.to_string(),
            site: site.to_string(),
            lines,
        }
    }
}
