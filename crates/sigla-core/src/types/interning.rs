//! Sign interning.
//!
//! Uses `lasso::Rodeo` while the corpus is loaded, then freezes into a
//! `lasso::RodeoReader` for contention-free concurrent reads.

use lasso::{Rodeo, RodeoReader};

use super::SignId;

/// Sign interner that trims whitespace and upper-cases syllabic values
/// before interning, so `ku`, ` KU` and `KU` share one id.
#[derive(Default)]
pub struct SignInterner {
    inner: Rodeo,
}

impl SignInterner {
    /// Create a new sign interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a sign transliteration.
    pub fn intern(&mut self, sign: &str) -> SignId {
        let normalized = Self::normalize(sign);
        SignId(self.inner.get_or_intern(normalized))
    }

    /// Look up a previously interned sign without inserting.
    pub fn get(&self, sign: &str) -> Option<SignId> {
        self.inner.get(Self::normalize(sign)).map(SignId)
    }

    /// Resolve a `SignId` back to its transliteration.
    pub fn resolve(&self, id: SignId) -> &str {
        self.inner.resolve(&id.0)
    }

    /// Number of distinct signs interned so far.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Freeze the interner into a read-only `RodeoReader`.
    pub fn into_reader(self) -> RodeoReader {
        self.inner.into_reader()
    }

    /// Normalize a transliteration: trim and upper-case.
    pub fn normalize(sign: &str) -> String {
        sign.trim().to_uppercase()
    }
}
