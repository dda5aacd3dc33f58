//! Cloneable façade for issuing commands to the calculator worker.
//!
//! [`CalculatorHandle`] hides channel plumbing behind async methods, one per
//! worker command.

use std::sync::Arc;

use gem_core::config::load_gem_configs;
use gem_core::{BuildParams, CalculationResult, GemRegistry};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::WorkerConfig;
use crate::error::{Result, StoreError, WorkerError};
use crate::record::{Build, HistoryEntry};
use crate::store::{BuildStore, FileStore, InMemoryStore};
use crate::worker::{CalculatorWorker, Command};

/// Client-facing handle to the calculator worker
#[derive(Clone, Debug)]
pub struct CalculatorHandle {
    command_tx: mpsc::Sender<Command>,
}

impl CalculatorHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| WorkerError::CommandChannelClosed)?;

        reply_rx.await.map_err(WorkerError::ReplyChannelClosed)?
    }

    /// Calculate total DPS for a build.
    ///
    /// Identical builds within the cache lifetime return the cached result
    /// without adding a history entry.
    pub async fn calculate(&self, params: BuildParams) -> Result<CalculationResult> {
        self.request(|reply| Command::Calculate { params, reply }).await
    }

    /// Save a build, assigning an ID when it has none. Returns the ID.
    pub async fn save_build(&self, build: Build) -> Result<String> {
        self.request(|reply| Command::SaveBuild { build, reply }).await
    }

    pub async fn load_build(&self, id: impl Into<String>) -> Result<Option<Build>> {
        let id = id.into();
        self.request(|reply| Command::LoadBuild { id, reply }).await
    }

    /// All saved builds, most recently updated first
    pub async fn list_builds(&self) -> Result<Vec<Build>> {
        self.request(|reply| Command::ListBuilds { reply }).await
    }

    pub async fn delete_build(&self, id: impl Into<String>) -> Result<bool> {
        let id = id.into();
        self.request(|reply| Command::DeleteBuild { id, reply }).await
    }

    /// Most recent calculations first
    pub async fn get_history(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        self.request(|reply| Command::History { limit, reply }).await
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.request(|reply| Command::ClearCache { reply }).await
    }

    pub async fn get_setting(&self, key: impl Into<String>) -> Result<Option<serde_json::Value>> {
        let key = key.into();
        self.request(|reply| Command::GetSetting { key, reply }).await
    }

    pub async fn set_setting(&self, key: impl Into<String>, value: serde_json::Value) -> Result<()> {
        let key = key.into();
        self.request(|reply| Command::SetSetting { key, value, reply })
            .await
    }
}

/// Open the store described by `config`: files under `data_dir` when set,
/// otherwise in memory.
pub fn open_store(config: &WorkerConfig) -> std::result::Result<Box<dyn BuildStore>, StoreError> {
    let ttl = config.cache_ttl();
    match &config.data_dir {
        Some(dir) => Ok(Box::new(FileStore::with_ttl(dir, ttl)?)),
        None => Ok(Box::new(InMemoryStore::with_ttl(ttl))),
    }
}

/// Build the gem registry: built-in gems plus the optional catalog file
pub fn load_registry(config: &WorkerConfig) -> Result<GemRegistry> {
    let mut registry = GemRegistry::with_defaults();
    if let Some(path) = &config.catalog_path {
        let gems = load_gem_configs(path)?;
        info!(count = gems.len(), path = %path.display(), "loaded gem catalog");
        for gem in gems {
            registry.register(gem);
        }
    }
    Ok(registry)
}

/// Spawn a calculator worker on a blocking thread.
///
/// Must be called from within a tokio runtime. The worker stops once every
/// handle has been dropped; the returned join handle resolves then.
pub fn spawn_calculator(
    store: Box<dyn BuildStore>,
    config: &WorkerConfig,
) -> Result<(CalculatorHandle, JoinHandle<()>)> {
    let registry = Arc::new(load_registry(config)?);
    let (command_tx, command_rx) = mpsc::channel(config.channel_capacity);

    let worker = CalculatorWorker::new(store, registry, config.default_history_limit, command_rx);
    let join = tokio::task::spawn_blocking(move || worker.run());

    Ok((CalculatorHandle::new(command_tx), join))
}

/// Open the configured store and spawn a worker over it
pub fn start(config: &WorkerConfig) -> Result<(CalculatorHandle, JoinHandle<()>)> {
    let store = open_store(config)?;
    spawn_calculator(store, config)
}
