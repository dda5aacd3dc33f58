//! Calculator worker that owns the store and processes commands on its own thread

use std::sync::Arc;

use chrono::Utc;
use gem_core::{evaluate, fingerprint, BuildParams, CalculationResult, GemRegistry};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::error::{Result, WorkerError};
use crate::record::{Build, CachedCalculation, HistoryEntry};
use crate::store::BuildStore;

/// Commands that can be sent to the calculator worker
pub enum Command {
    /// Calculate DPS for a build, using the cache when possible
    Calculate {
        params: BuildParams,
        reply: oneshot::Sender<Result<CalculationResult>>,
    },
    SaveBuild {
        build: Build,
        reply: oneshot::Sender<Result<String>>,
    },
    LoadBuild {
        id: String,
        reply: oneshot::Sender<Result<Option<Build>>>,
    },
    ListBuilds {
        reply: oneshot::Sender<Result<Vec<Build>>>,
    },
    DeleteBuild {
        id: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    /// Most recent history entries; the configured default when `limit` is `None`
    History {
        limit: Option<usize>,
        reply: oneshot::Sender<Result<Vec<HistoryEntry>>>,
    },
    ClearCache {
        reply: oneshot::Sender<Result<()>>,
    },
    GetSetting {
        key: String,
        reply: oneshot::Sender<Result<Option<serde_json::Value>>>,
    },
    SetSetting {
        key: String,
        value: serde_json::Value,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Calculator worker
///
/// Commands are handled one at a time in arrival order, so a caller's
/// requests never overlap.
pub struct CalculatorWorker {
    store: Box<dyn BuildStore>,
    registry: Arc<GemRegistry>,
    default_history_limit: usize,
    command_rx: mpsc::Receiver<Command>,
}

impl CalculatorWorker {
    pub fn new(
        store: Box<dyn BuildStore>,
        registry: Arc<GemRegistry>,
        default_history_limit: usize,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            store,
            registry,
            default_history_limit,
            command_rx,
        }
    }

    /// Main worker loop. Blocks until every handle is dropped; run it on a
    /// blocking thread.
    pub fn run(mut self) {
        info!(gems = self.registry.len(), "calculator worker started");
        while let Some(cmd) = self.command_rx.blocking_recv() {
            self.handle_command(cmd);
        }
        info!("calculator worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Calculate { params, reply } => {
                let _ = reply.send(self.calculate(params));
            }
            Command::SaveBuild { build, reply } => {
                let result = self.store.save_build(build).map(|b| b.id);
                let _ = reply.send(result.map_err(WorkerError::from));
            }
            Command::LoadBuild { id, reply } => {
                let _ = reply.send(self.store.load_build(&id).map_err(WorkerError::from));
            }
            Command::ListBuilds { reply } => {
                let _ = reply.send(self.store.list_builds().map_err(WorkerError::from));
            }
            Command::DeleteBuild { id, reply } => {
                let _ = reply.send(self.store.delete_build(&id).map_err(WorkerError::from));
            }
            Command::History { limit, reply } => {
                let limit = limit.unwrap_or(self.default_history_limit);
                let _ = reply.send(self.store.history(limit).map_err(WorkerError::from));
            }
            Command::ClearCache { reply } => {
                let result = self.store.clear_cache();
                if result.is_ok() {
                    info!("calculation cache cleared");
                }
                let _ = reply.send(result.map_err(WorkerError::from));
            }
            Command::GetSetting { key, reply } => {
                let _ = reply.send(self.store.setting(&key).map_err(WorkerError::from));
            }
            Command::SetSetting { key, value, reply } => {
                let _ = reply.send(self.store.set_setting(&key, value).map_err(WorkerError::from));
            }
        }
    }

    /// Fingerprint → cache lookup → evaluate → commit cache and history.
    ///
    /// Nothing is written when validation or evaluation fails. Store failures
    /// are returned as they are and never trigger a silent recomputation.
    fn calculate(&self, params: BuildParams) -> Result<CalculationResult> {
        let (selection, stats, options) = params.validate().map_err(|e| {
            error!(error = %e, "calculation rejected");
            WorkerError::CalculationFailed(e.to_string())
        })?;

        let hash = fingerprint(selection, stats, options).map_err(|e| {
            error!(error = %e, "calculation rejected");
            WorkerError::CalculationFailed(e.to_string())
        })?;
        if let Some(cached) = self.store.cached(&hash, Utc::now())? {
            debug!(hash = %hash, "cache hit for calculation");
            return Ok(cached.result);
        }
        debug!(hash = %hash, "cache miss for calculation");

        let result = evaluate(&self.registry, selection, stats, options).map_err(|e| {
            error!(error = %e, "calculation error");
            WorkerError::CalculationFailed(e.to_string())
        })?;

        let now = Utc::now();
        self.store.commit_calculation(
            CachedCalculation::new(hash, result.clone(), now),
            HistoryEntry::new(params.clone(), result.clone(), now),
        )?;

        Ok(result)
    }
}
