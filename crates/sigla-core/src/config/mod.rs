//! Configuration for every sigla subsystem.

pub mod administrative_config;
pub mod formula_config;
pub mod scoring_config;
pub mod sigla_config;
pub mod validation_config;

pub use administrative_config::AdministrativeConfig;
pub use formula_config::FormulaConfig;
pub use scoring_config::{NegativeControlConfig, ScoringConfig};
pub use sigla_config::{ConfigOverrides, SiglaConfig};
pub use validation_config::ValidationConfig;
