//! Tokens: word-like runs of signs with their line position.

use serde::{Deserialize, Serialize};

use crate::types::collections::SignRun;
use crate::types::SignId;

/// Linear position of a token within its line.
///
/// A line holding a single token reports `Initial`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPosition {
    Initial,
    Medial,
    Final,
}

impl TokenPosition {
    pub fn of(index: usize, line_len: usize) -> Self {
        if index == 0 {
            Self::Initial
        } else if index + 1 == line_len {
            Self::Final
        } else {
            Self::Medial
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Medial => "medial",
            Self::Final => "final",
        }
    }
}

/// What kind of unit a token is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    /// A run of syllabograms (or unclassified signs).
    Word,
    /// A single logogram.
    Logogram,
    /// A run of numerals and fractions.
    Number,
}

/// Address of a token inside a [`Corpus`](super::Corpus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenRef {
    pub inscription: usize,
    pub line: usize,
    pub index: usize,
}

/// A maximal contiguous run of signs forming a word-like unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub signs: SignRun<SignId>,
    pub class: TokenClass,
    pub position: TokenPosition,
    pub line: usize,
    pub index: usize,
    /// Rendered transliteration, signs joined with `-`.
    pub text: String,
    /// Numeric value for `Number` tokens. `None` when a fraction could not be read.
    pub value: Option<f64>,
    /// At least one sign is illegible.
    pub has_unknown: bool,
}

impl Token {
    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    pub fn is_word(&self) -> bool {
        self.class == TokenClass::Word
    }

    pub fn is_number(&self) -> bool {
        self.class == TokenClass::Number
    }

    /// Sign transliterations in order.
    pub fn sign_strs(&self) -> impl Iterator<Item = &str> {
        self.text.split(crate::constants::SIGN_SEPARATOR)
    }

    pub fn contains(&self, sign: SignId) -> bool {
        self.signs.contains(&sign)
    }
}
