//! Shared constants for the sigla analysis engine.

/// sigla version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transliteration of an illegible or damaged sign.
pub const UNKNOWN_SIGN: &str = "?";

/// Separator used when rendering a token's signs as text.
pub const SIGN_SEPARATOR: char = '-';

/// Default minimum number of filled slots for a formula variant.
pub const DEFAULT_MIN_SLOTS: usize = 2;

/// Default minimum testable instances before a rule can be labelled confirmed.
pub const DEFAULT_MIN_TESTED: usize = 3;

/// Default co-occurrence window (tokens). 0 means "whole line".
pub const DEFAULT_COOCCURRENCE_WINDOW: usize = 0;

/// Default minimum occurrences for positional classification.
pub const DEFAULT_POSITIONAL_MIN_OCCURRENCES: usize = 5;

/// Default positional dominance share for header/total/body classification.
pub const DEFAULT_POSITIONAL_DOMINANCE: f64 = 0.60;

/// Default total marker.
pub const DEFAULT_TOTAL_MARKER: &str = "KU-RO";

/// Default deficit marker.
pub const DEFAULT_DEFICIT_MARKER: &str = "KI-RO";

/// Default random seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default bootstrap iterations.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Default permutation iterations.
pub const DEFAULT_PERMUTATION_ITERATIONS: usize = 10_000;

/// Default perturbation trials per noise level.
pub const DEFAULT_PERTURBATION_TRIALS: usize = 1_000;

/// Default perturbation noise levels.
pub const DEFAULT_PERTURBATION_LEVELS: [f64; 5] = [0.10, 0.15, 0.20, 0.25, 0.30];

/// Default pseudo-lexicon draws for the lexical chance control.
pub const DEFAULT_LEXICAL_ITERATIONS: usize = 1_000;

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default ceiling on a negative control's composite score.
pub const DEFAULT_CONTROL_MAX_COMPOSITE: f64 = 0.55;

/// A negative control ranked at or above this position is a failure.
pub const DEFAULT_CONTROL_MAX_RANK: usize = 2;

/// Tolerance used when checking that weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Tolerance used by the arithmetic consistency check.
pub const ARITHMETIC_TOLERANCE: f64 = 1e-9;
