//! Scoring dimensions.

use serde::{Deserialize, Serialize};

pub const VOWEL_SYSTEM: &str = "vowel_system";
pub const STRUCTURAL_FEATURES: &str = "structural_features";
pub const CASE_SYSTEM: &str = "case_system";
pub const VOCABULARY: &str = "vocabulary";
pub const GEOGRAPHIC: &str = "geographic";
pub const TIMELINE: &str = "timeline";
pub const SCHOLARLY_SUPPORT: &str = "scholarly_support";
pub const RELIGIOUS_PARALLEL: &str = "religious_parallel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionCategory {
    /// Measured against the corpus.
    Linguistic,
    /// Archaeological, chronological or scholarly context.
    Contextual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub label: String,
    pub category: DimensionCategory,
}

impl Dimension {
    pub fn new(id: &str, label: &str, category: DimensionCategory) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category,
        }
    }
}

/// Ordered set of dimensions every score vector is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionSchema {
    dimensions: Vec<Dimension>,
}

impl DimensionSchema {
    /// The eight-dimension schema: four linguistic, four contextual.
    pub fn standard() -> Self {
        use DimensionCategory::*;
        Self {
            dimensions: vec![
                Dimension::new(VOWEL_SYSTEM, "Vowel system", Linguistic),
                Dimension::new(STRUCTURAL_FEATURES, "Structural features", Linguistic),
                Dimension::new(CASE_SYSTEM, "Case system", Linguistic),
                Dimension::new(VOCABULARY, "Vocabulary", Linguistic),
                Dimension::new(GEOGRAPHIC, "Geographic", Contextual),
                Dimension::new(TIMELINE, "Timeline", Contextual),
                Dimension::new(SCHOLARLY_SUPPORT, "Scholarly support", Contextual),
                Dimension::new(RELIGIOUS_PARALLEL, "Religious parallel", Contextual),
            ],
        }
    }

    /// Ad-hoc schema. Dimensions with no known category count as linguistic.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let standard = Self::standard();
        let dimensions = ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                standard
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| Dimension::new(id, id, DimensionCategory::Linguistic))
            })
            .collect();
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|d| d.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.dimensions.iter().position(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn in_category(&self, category: DimensionCategory) -> Vec<&str> {
        self.dimensions
            .iter()
            .filter(|d| d.category == category)
            .map(|d| d.id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}
