//! Signs and sign kinds.

use serde::{Deserialize, Serialize};

use super::raw::RawSignKind;
use crate::types::SignId;

/// Type tag of a sign in the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignKind {
    Syllabogram,
    Logogram,
    Numeral,
    Fraction,
    Unclassified,
}

impl SignKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Syllabogram => "syllabogram",
            Self::Logogram => "logogram",
            Self::Numeral => "numeral",
            Self::Fraction => "fraction",
            Self::Unclassified => "unclassified",
        }
    }

    /// Map a raw kind onto an alphabet kind. Dividers are not signs.
    pub fn from_raw(kind: RawSignKind) -> Option<Self> {
        match kind {
            RawSignKind::Syllabogram => Some(Self::Syllabogram),
            RawSignKind::Logogram => Some(Self::Logogram),
            RawSignKind::Numeral => Some(Self::Numeral),
            RawSignKind::Fraction => Some(Self::Fraction),
            RawSignKind::Unclassified => Some(Self::Unclassified),
            RawSignKind::Divider => None,
        }
    }

    /// Numerals and fractions carry numeric value.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeral | Self::Fraction)
    }
}

impl std::fmt::Display for SignKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An atomic symbol of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sign {
    pub id: SignId,
    pub kind: SignKind,
}
