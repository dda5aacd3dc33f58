//! Store contract for builds, cached results, history and settings.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::record::{Build, CachedCalculation, HistoryEntry};

/// How long a cached result stays valid
pub const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid store key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent storage used by the calculator worker
///
/// Cache entries are advisory: readers must tolerate staleness up to the TTL,
/// and expired entries are removed when read.
pub trait BuildStore: Send + Sync {
    /// Insert or replace a build. Keeps the stored `created_at` of an existing
    /// build and stamps `updated_at`. Returns the stored record.
    fn save_build(&self, build: Build) -> Result<Build>;

    /// Load a build by ID
    fn load_build(&self, id: &str) -> Result<Option<Build>>;

    /// All builds, most recently updated first
    fn list_builds(&self) -> Result<Vec<Build>>;

    /// Delete a build. Returns whether it existed.
    fn delete_build(&self, id: &str) -> Result<bool>;

    /// Cached result for a fingerprint, unless missing or expired at `now`
    fn cached(&self, hash: &str, now: DateTime<Utc>) -> Result<Option<CachedCalculation>>;

    /// Store a cache entry and its history entry together. On failure neither
    /// write is left behind.
    fn commit_calculation(&self, cache: CachedCalculation, history: HistoryEntry) -> Result<()>;

    /// Drop every cached result
    fn clear_cache(&self) -> Result<()>;

    /// Up to `limit` history entries, most recent first
    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    fn setting(&self, key: &str) -> Result<Option<serde_json::Value>>;

    fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<()>;
}

/// Default cache lifetime
pub fn default_ttl() -> Duration {
    Duration::hours(DEFAULT_CACHE_TTL_HOURS)
}

/// Stamp timestamps for a build that is about to be stored
pub(crate) fn stamp_build(mut build: Build, existing: Option<&Build>, now: DateTime<Utc>) -> Build {
    build.ensure_id();
    if let Some(existing) = existing {
        build.created_at = existing.created_at;
    }
    build.updated_at = now;
    build
}
