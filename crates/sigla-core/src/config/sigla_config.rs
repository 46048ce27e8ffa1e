//! Top-level sigla configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    AdministrativeConfig, FormulaConfig, NegativeControlConfig, ScoringConfig, ValidationConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`SIGLA_*`)
/// 3. TOML file passed to `load`
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiglaConfig {
    pub formula: FormulaConfig,
    pub administrative: AdministrativeConfig,
    pub scoring: ScoringConfig,
    pub validation: ValidationConfig,
    pub negative_control: NegativeControlConfig,
}

/// Programmatic overrides that beat every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub seed: Option<u64>,
    pub bootstrap_iterations: Option<usize>,
    pub permutation_iterations: Option<usize>,
    pub perturbation_trials: Option<usize>,
    pub min_slots: Option<usize>,
    pub parallel: Option<bool>,
}

impl SiglaConfig {
    /// Load configuration with layered resolution.
    pub fn load(path: Option<&Path>, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = path {
            let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;
            let file_config: SiglaConfig =
                toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            Self::merge(&mut config, &file_config);
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &SiglaConfig) -> Result<(), ConfigError> {
        let fail = |field: &str, message: &str| ConfigError::ValidationFailed {
            field: field.to_string(),
            message: message.to_string(),
        };

        if config.formula.min_slots == Some(0) {
            return Err(fail("formula.min_slots", "must be greater than 0"));
        }
        if let Some(rate) = config.formula.confirm_rate {
            if !(0.0..1.0).contains(&rate) {
                return Err(fail("formula.confirm_rate", "must be at least 0.0 and below 1.0"));
            }
        }
        if let Some(share) = config.administrative.positional_dominance {
            if !(0.5..=1.0).contains(&share) {
                return Err(fail(
                    "administrative.positional_dominance",
                    "must be between 0.5 and 1.0",
                ));
            }
        }
        for (dimension, weight) in &config.scoring.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(fail(
                    &format!("scoring.weights.{dimension}"),
                    "must be a finite, non-negative number",
                ));
            }
        }
        for (field, value) in [
            ("validation.bootstrap_iterations", config.validation.bootstrap_iterations),
            ("validation.permutation_iterations", config.validation.permutation_iterations),
            ("validation.perturbation_trials", config.validation.perturbation_trials),
            ("validation.lexical_iterations", config.validation.lexical_iterations),
        ] {
            if value == Some(0) {
                return Err(fail(field, "must be greater than 0"));
            }
        }
        if config
            .validation
            .perturbation_levels
            .iter()
            .any(|p| !(*p > 0.0 && *p < 1.0))
        {
            return Err(fail(
                "validation.perturbation_levels",
                "every level must lie strictly between 0.0 and 1.0",
            ));
        }
        if let Some(alpha) = config.validation.alpha {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(fail("validation.alpha", "must lie strictly between 0.0 and 1.0"));
            }
        }
        if let Some(max) = config.negative_control.max_composite {
            if !(0.0..=1.0).contains(&max) {
                return Err(fail(
                    "negative_control.max_composite",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` (or non-empty) value.
    fn merge(base: &mut SiglaConfig, other: &SiglaConfig) {
        // Formula
        if other.formula.min_slots.is_some() {
            base.formula.min_slots = other.formula.min_slots;
        }
        if other.formula.min_tested.is_some() {
            base.formula.min_tested = other.formula.min_tested;
        }
        if other.formula.confirm_rate.is_some() {
            base.formula.confirm_rate = other.formula.confirm_rate;
        }

        // Administrative
        if other.administrative.total_marker.is_some() {
            base.administrative.total_marker = other.administrative.total_marker.clone();
        }
        if other.administrative.deficit_marker.is_some() {
            base.administrative.deficit_marker = other.administrative.deficit_marker.clone();
        }
        if other.administrative.cooccurrence_window.is_some() {
            base.administrative.cooccurrence_window = other.administrative.cooccurrence_window;
        }
        if other.administrative.positional_min_occurrences.is_some() {
            base.administrative.positional_min_occurrences =
                other.administrative.positional_min_occurrences;
        }
        if other.administrative.positional_dominance.is_some() {
            base.administrative.positional_dominance = other.administrative.positional_dominance;
        }
        if !other.administrative.vocabulary.is_empty() {
            base.administrative.vocabulary = other.administrative.vocabulary.clone();
        }

        // Scoring
        if !other.scoring.weights.is_empty() {
            base.scoring.weights = other.scoring.weights.clone();
        }

        // Validation
        if other.validation.seed.is_some() {
            base.validation.seed = other.validation.seed;
        }
        if other.validation.bootstrap_iterations.is_some() {
            base.validation.bootstrap_iterations = other.validation.bootstrap_iterations;
        }
        if other.validation.permutation_iterations.is_some() {
            base.validation.permutation_iterations = other.validation.permutation_iterations;
        }
        if other.validation.perturbation_trials.is_some() {
            base.validation.perturbation_trials = other.validation.perturbation_trials;
        }
        if !other.validation.perturbation_levels.is_empty() {
            base.validation.perturbation_levels = other.validation.perturbation_levels.clone();
        }
        if other.validation.lexical_iterations.is_some() {
            base.validation.lexical_iterations = other.validation.lexical_iterations;
        }
        if other.validation.alpha.is_some() {
            base.validation.alpha = other.validation.alpha;
        }
        if other.validation.parallel.is_some() {
            base.validation.parallel = other.validation.parallel;
        }

        // Negative control
        if other.negative_control.max_composite.is_some() {
            base.negative_control.max_composite = other.negative_control.max_composite;
        }
        if other.negative_control.max_rank.is_some() {
            base.negative_control.max_rank = other.negative_control.max_rank;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `SIGLA_SEED`, `SIGLA_BOOTSTRAP_ITERATIONS`, etc.
    fn apply_env_overrides(config: &mut SiglaConfig) {
        if let Ok(val) = std::env::var("SIGLA_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.validation.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SIGLA_BOOTSTRAP_ITERATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.validation.bootstrap_iterations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SIGLA_PERMUTATION_ITERATIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.validation.permutation_iterations = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SIGLA_PERTURBATION_TRIALS") {
            if let Ok(v) = val.parse::<usize>() {
                config.validation.perturbation_trials = Some(v);
            }
        }
        if let Ok(val) = std::env::var("SIGLA_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.validation.parallel = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    fn apply_overrides(config: &mut SiglaConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.seed {
            config.validation.seed = Some(v);
        }
        if let Some(v) = overrides.bootstrap_iterations {
            config.validation.bootstrap_iterations = Some(v);
        }
        if let Some(v) = overrides.permutation_iterations {
            config.validation.permutation_iterations = Some(v);
        }
        if let Some(v) = overrides.perturbation_trials {
            config.validation.perturbation_trials = Some(v);
        }
        if let Some(v) = overrides.min_slots {
            config.formula.min_slots = Some(v);
        }
        if let Some(v) = overrides.parallel {
            config.validation.parallel = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
