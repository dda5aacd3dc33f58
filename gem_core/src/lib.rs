//! gem_core - Gem DPS calculation engine
//!
//! This library provides:
//! - GemRegistry: Catalog of gem definitions and their rank formulas
//! - evaluate / calculate: Aggregation of gem contributions into total DPS
//! - CalculationResult: Total DPS with a per-gem breakdown
//! - fingerprint: Order-independent cache key for a build

pub mod calc;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod gem;
pub mod prelude;
pub mod types;

// Re-export core types for convenience
pub use calc::{calculate, evaluate, Breakdown, CalculationMetadata, CalculationResult, GemContribution};
pub use config::ConfigError;
pub use error::{CalcError, EvaluationError, SelectionError};
pub use fingerprint::fingerprint;
pub use gem::{Coefficients, GemDefinition, GemFormula, GemRegistry, RankTable};
pub use types::{BuildOptions, BuildParams, CharacterStats, GemCategory, GemId, GemSelection};
