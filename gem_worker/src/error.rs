//! Error types surfaced by the calculator worker API.

use gem_core::ConfigError;
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// Invalid build or a gem formula failure. Nothing was cached or recorded.
    #[error("Failed to calculate DPS: {0}")]
    CalculationFailed(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to load gem catalog: {0}")]
    Catalog(#[from] ConfigError),

    #[error("calculator worker command channel closed")]
    CommandChannelClosed,

    #[error("calculator worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),
}
