//! Inscriptions and their lines.

use serde::{Deserialize, Serialize};

use super::token::{Token, TokenClass};

/// Catalog number of an inscription (e.g. `IO Za 2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InscriptionId(pub String);

impl InscriptionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of an inscription.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub tokens: Vec<Token>,
}

/// An inscription. Owns its tokens exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Inscription {
    pub id: InscriptionId,
    pub site: String,
    pub lines: Vec<Line>,
}

impl Inscription {
    /// All tokens in reading order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.lines.iter().flat_map(|l| l.tokens.iter())
    }

    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens().filter(|t| t.class == TokenClass::Word)
    }

    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|l| l.tokens.len()).sum()
    }

    pub fn has_word(&self, text: &str) -> bool {
        self.words().any(|t| t.text == text)
    }

    pub fn has_token(&self, text: &str) -> bool {
        self.tokens().any(|t| t.text == text)
    }
}
