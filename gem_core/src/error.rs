//! Calculation error types

use crate::types::GemId;
use thiserror::Error;

/// Failure of a single calculation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Invalid build configuration: {0}")]
    InvalidBuild(String),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
    #[error("Failed to fingerprint build: {0}")]
    Fingerprint(String),
}

/// A gem formula could not be evaluated. Aborts the whole calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("gem {gem} has no rank {rank} in its rank table")]
    RankOutOfRange { gem: GemId, rank: u8 },
    #[error("gem {gem} produced a non-finite value")]
    NonFinite { gem: GemId },
}

/// Rejected change to a gem selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("gem {0} is not selected")]
    NotSelected(GemId),
    #[error("rank {0} is outside 1-10")]
    InvalidRank(u8),
}
