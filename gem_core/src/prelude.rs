//! Prelude module for convenient imports
//!
//! ```rust
//! use gem_core::prelude::*;
//! ```

// Build inputs
pub use crate::types::{BuildOptions, BuildParams, CharacterStats, GemCategory, GemId, GemSelection};

// Registry
pub use crate::gem::{GemDefinition, GemFormula, GemRegistry};

// Calculation
pub use crate::calc::{calculate, evaluate, CalculationResult, GemContribution};
pub use crate::error::{CalcError, EvaluationError};

// Caching
pub use crate::fingerprint::fingerprint;
