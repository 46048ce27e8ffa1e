//! The frozen sign alphabet, enumerated once at load time.

use lasso::RodeoReader;

use super::sign::{Sign, SignKind};
use crate::types::collections::FxHashMap;
use crate::types::SignId;

/// Immutable sign alphabet: interned transliterations plus their kinds.
pub struct SignAlphabet {
    reader: RodeoReader,
    kinds: FxHashMap<SignId, SignKind>,
}

impl SignAlphabet {
    pub(crate) fn new(reader: RodeoReader, kinds: FxHashMap<SignId, SignKind>) -> Self {
        Self { reader, kinds }
    }

    /// Look up a sign by transliteration.
    pub fn get(&self, sign: &str) -> Option<Sign> {
        let normalized = crate::types::SignInterner::normalize(sign);
        let id = SignId(self.reader.get(normalized.as_str())?);
        let kind = self.kinds.get(&id).copied()?;
        Some(Sign { id, kind })
    }

    pub fn id(&self, sign: &str) -> Option<SignId> {
        self.get(sign).map(|s| s.id)
    }

    pub fn resolve(&self, id: SignId) -> &str {
        self.reader.resolve(&id.0)
    }

    pub fn kind(&self, id: SignId) -> Option<SignKind> {
        self.kinds.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// All signs, sorted by transliteration for stable output.
    pub fn signs(&self) -> Vec<Sign> {
        let mut signs: Vec<Sign> = self
            .kinds
            .iter()
            .map(|(&id, &kind)| Sign { id, kind })
            .collect();
        signs.sort_by(|a, b| self.resolve(a.id).cmp(self.resolve(b.id)));
        signs
    }

    pub fn count_of(&self, kind: SignKind) -> usize {
        self.kinds.values().filter(|k| **k == kind).count()
    }
}

impl std::fmt::Debug for SignAlphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignAlphabet")
            .field("signs", &self.kinds.len())
            .finish()
    }
}
