//! Administrative-structure analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COOCCURRENCE_WINDOW, DEFAULT_DEFICIT_MARKER, DEFAULT_POSITIONAL_DOMINANCE,
    DEFAULT_POSITIONAL_MIN_OCCURRENCES, DEFAULT_TOTAL_MARKER,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AdministrativeConfig {
    /// Token marking a stated total. Default: `KU-RO`.
    pub total_marker: Option<String>,
    /// Token opening a new arithmetic section. Default: `KI-RO`.
    pub deficit_marker: Option<String>,
    /// Co-occurrence window in tokens; 0 means the whole line. Default: 0.
    pub cooccurrence_window: Option<usize>,
    /// Minimum occurrences before an item is positionally classified. Default: 5.
    pub positional_min_occurrences: Option<usize>,
    /// Share of occurrences in one position needed to classify. Default: 0.60.
    pub positional_dominance: Option<f64>,
    /// Vocabulary items to profile. Empty means every word token.
    #[serde(default)]
    pub vocabulary: Vec<String>,
}

impl AdministrativeConfig {
    pub fn effective_total_marker(&self) -> &str {
        self.total_marker.as_deref().unwrap_or(DEFAULT_TOTAL_MARKER)
    }

    pub fn effective_deficit_marker(&self) -> &str {
        self.deficit_marker.as_deref().unwrap_or(DEFAULT_DEFICIT_MARKER)
    }

    pub fn effective_cooccurrence_window(&self) -> usize {
        self.cooccurrence_window.unwrap_or(DEFAULT_COOCCURRENCE_WINDOW)
    }

    pub fn effective_positional_min_occurrences(&self) -> usize {
        self.positional_min_occurrences
            .unwrap_or(DEFAULT_POSITIONAL_MIN_OCCURRENCES)
    }

    pub fn effective_positional_dominance(&self) -> f64 {
        self.positional_dominance.unwrap_or(DEFAULT_POSITIONAL_DOMINANCE)
    }
}
