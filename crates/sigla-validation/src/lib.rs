//! sigla-validation: statistical controls wrapped around the candidate scorer.
//!
//! Every procedure transforms the scorer's inputs (weights, scores) and
//! replays it; reference data is never mutated. Resampling loops draw from a
//! ChaCha stream per trial and merge per-worker accumulators, so results are
//! identical whether trials run sequentially or on the rayon pool.

pub mod ablation;
pub mod bootstrap;
pub mod engine;
pub mod lexical;
pub mod negative_control;
pub mod outcome;
pub mod permutation;
pub mod perturbation;
pub mod sensitivity;
pub mod trial;

pub use ablation::{Ablation, AblationReport, AblationVerdict, DimensionAblation, ImpactClass};
pub use bootstrap::{Bootstrap, BootstrapCandidate, BootstrapReport, Significance};
pub use engine::{ValidationEngine, ValidationReport};
pub use lexical::{LexicalControl, LexicalReport};
pub use negative_control::{ControlResult, NegativeControl, NegativeControlReport};
pub use outcome::{Interval, ValidationOutcome, ValidationStatus, ValidationTest, ValidityWarning, WarningKind};
pub use permutation::{PermutationReport, PermutationTest};
pub use perturbation::{LevelResult, Perturbation, PerturbationReport, SurvivalTier};
pub use sensitivity::{SensitivityReport, SensitivityScenario, WeightSensitivity};
