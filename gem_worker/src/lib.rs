//! gem_worker - Calculation worker and build persistence for gem_core
//!
//! This library provides:
//! - CalculatorHandle: Async API for calculations, builds, history and settings
//! - CalculatorWorker: Single consumer that owns the store and serializes requests
//! - BuildStore: Storage contract with in-memory and file-backed implementations
//! - WorkerConfig: TOML-loadable tunables (cache lifetime, data dir, catalog)

pub mod config;
pub mod error;
pub mod handle;
pub mod record;
pub mod store;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{Result, StoreError, WorkerError};
pub use handle::{load_registry, open_store, spawn_calculator, start, CalculatorHandle};
pub use record::{Build, CachedCalculation, HistoryEntry};
pub use store::{BuildStore, FileStore, InMemoryStore};
pub use worker::{CalculatorWorker, Command};
