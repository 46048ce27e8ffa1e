//! Candidate language families: immutable reference records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sigla_core::errors::ScoringError;
use sigla_core::types::collections::FxHashSet;

/// Raw typological data for a family, from which linguistic dimensions are derived.
///
/// Every numeric value is a share or similarity in [0,1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyProfile {
    /// Vowel frequency shares keyed by vowel letter.
    #[serde(default)]
    pub vowels: BTreeMap<String, f64>,
    /// A dialect distribution preferred over `vowels` when present.
    #[serde(default)]
    pub dialect_vowels: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    /// Similarity of the family's morphology to each case ending.
    #[serde(default)]
    pub suffix_similarity: BTreeMap<String, f64>,
    /// Match strength for each vocabulary item.
    #[serde(default)]
    pub vocabulary_matches: BTreeMap<String, f64>,
}

impl FamilyProfile {
    pub fn best_vowels(&self) -> &BTreeMap<String, f64> {
        self.dialect_vowels.as_ref().unwrap_or(&self.vowels)
    }

    fn values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.vowels
            .iter()
            .chain(self.dialect_vowels.iter().flatten())
            .chain(self.suffix_similarity.iter())
            .chain(self.vocabulary_matches.iter())
            .map(|(k, &v)| (k.as_str(), v))
    }
}

/// A named language-family hypothesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFamily {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Reference score per dimension, in [0,1].
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub justifications: BTreeMap<String, String>,
    /// Half-width of the plausible range around each reference score.
    #[serde(default)]
    pub uncertainty: BTreeMap<String, f64>,
    #[serde(default)]
    pub profile: Option<FamilyProfile>,
    /// Known-unrelated control, never a real candidate.
    #[serde(default)]
    pub control: bool,
}

impl CandidateFamily {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            scores: BTreeMap::new(),
            justifications: BTreeMap::new(),
            uncertainty: BTreeMap::new(),
            profile: None,
            control: false,
        }
    }

    pub fn with_score(mut self, dimension: &str, score: f64, justification: &str) -> Self {
        self.scores.insert(dimension.to_string(), score);
        if !justification.is_empty() {
            self.justifications
                .insert(dimension.to_string(), justification.to_string());
        }
        self
    }

    pub fn with_uncertainty(mut self, dimension: &str, bound: f64) -> Self {
        self.uncertainty.insert(dimension.to_string(), bound);
        self
    }

    pub fn with_profile(mut self, profile: FamilyProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn as_control(mut self) -> Self {
        self.control = true;
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        let out_of_range = |dimension: &str, score: f64| ScoringError::ScoreOutOfRange {
            candidate: self.id.clone(),
            dimension: dimension.to_string(),
            score,
        };
        for (d, &s) in &self.scores {
            if !(0.0..=1.0).contains(&s) {
                return Err(out_of_range(d, s));
            }
        }
        for (d, &u) in &self.uncertainty {
            if !(0.0..=1.0).contains(&u) {
                return Err(out_of_range(d, u));
            }
        }
        if let Some(profile) = &self.profile {
            for (key, v) in profile.values() {
                if !(0.0..=1.0).contains(&v) {
                    return Err(out_of_range(key, v));
                }
            }
        }
        Ok(())
    }
}

/// The fixed candidate list plus controls, validated once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySet {
    families: Vec<CandidateFamily>,
}

impl FamilySet {
    pub fn new(families: Vec<CandidateFamily>) -> Result<Self, ScoringError> {
        if families.is_empty() {
            return Err(ScoringError::NoCandidates);
        }
        let mut seen = FxHashSet::default();
        for family in &families {
            if family.id.trim().is_empty() {
                return Err(ScoringError::InvalidReference {
                    message: "family with empty id".to_string(),
                });
            }
            if !seen.insert(family.id.as_str()) {
                return Err(ScoringError::DuplicateCandidate {
                    candidate: family.id.clone(),
                });
            }
            family.validate()?;
        }
        Ok(Self { families })
    }

    /// Parse a JSON array of family records.
    pub fn from_json(json: &str) -> Result<Self, ScoringError> {
        let families: Vec<CandidateFamily> =
            serde_json::from_str(json).map_err(|e| ScoringError::InvalidReference {
                message: e.to_string(),
            })?;
        Self::new(families)
    }

    pub fn families(&self) -> &[CandidateFamily] {
        &self.families
    }

    pub fn candidates(&self) -> impl Iterator<Item = &CandidateFamily> {
        self.families.iter().filter(|f| !f.control)
    }

    pub fn controls(&self) -> impl Iterator<Item = &CandidateFamily> {
        self.families.iter().filter(|f| f.control)
    }

    pub fn get(&self, id: &str) -> Option<&CandidateFamily> {
        self.families.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_score_is_rejected() {
        let f = CandidateFamily::new("x", "X").with_score("timeline", 1.2, "");
        assert!(matches!(f.validate(), Err(ScoringError::ScoreOutOfRange { .. })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let f = CandidateFamily::new("x", "X");
        assert_eq!(
            FamilySet::new(vec![f.clone(), f]).unwrap_err(),
            ScoringError::DuplicateCandidate { candidate: "x".into() }
        );
        assert_eq!(FamilySet::new(vec![]).unwrap_err(), ScoringError::NoCandidates);
    }

    #[test]
    fn parses_json_records() {
        let set = FamilySet::from_json(
            r#"[{"id": "a", "scores": {"timeline": 0.5}, "justifications": {"timeline": "contemporary"}},
                {"id": "b", "control": true}]"#,
        )
        .unwrap();
        assert_eq!(set.candidates().count(), 1);
        assert_eq!(set.controls().next().unwrap().display_name(), "b");
        assert!(FamilySet::from_json("{").is_err());
    }
}
