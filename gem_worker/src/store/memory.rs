//! In-memory store.
//!
//! Everything lives in mutex-guarded maps and is lost when the store is dropped.
//! Useful for tests and for sessions that do not need persistence.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use super::{default_ttl, stamp_build, BuildStore, Result, StoreError};
use crate::record::{Build, CachedCalculation, HistoryEntry};

#[derive(Default)]
struct Tables {
    builds: HashMap<String, Build>,
    cache: HashMap<String, CachedCalculation>,
    /// Oldest first
    history: Vec<HistoryEntry>,
    settings: HashMap<String, serde_json::Value>,
}

/// In-memory store.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    ttl: Duration,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store with the default 24 hour cache lifetime.
    pub fn new() -> Self {
        Self::with_ttl(default_ttl())
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            ttl,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl BuildStore for InMemoryStore {
    fn save_build(&self, build: Build) -> Result<Build> {
        let mut tables = self.lock()?;
        let existing = tables.builds.get(&build.id);
        let build = stamp_build(build, existing, Utc::now());
        tables.builds.insert(build.id.clone(), build.clone());
        Ok(build)
    }

    fn load_build(&self, id: &str) -> Result<Option<Build>> {
        Ok(self.lock()?.builds.get(id).cloned())
    }

    fn list_builds(&self) -> Result<Vec<Build>> {
        let mut builds: Vec<_> = self.lock()?.builds.values().cloned().collect();
        builds.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(builds)
    }

    fn delete_build(&self, id: &str) -> Result<bool> {
        Ok(self.lock()?.builds.remove(id).is_some())
    }

    fn cached(&self, hash: &str, now: DateTime<Utc>) -> Result<Option<CachedCalculation>> {
        let mut tables = self.lock()?;
        let expired = match tables.cache.get(hash) {
            Some(entry) => entry.is_expired(now, self.ttl),
            None => return Ok(None),
        };
        if expired {
            tables.cache.remove(hash);
            return Ok(None);
        }
        Ok(tables.cache.get(hash).cloned())
    }

    fn commit_calculation(&self, cache: CachedCalculation, history: HistoryEntry) -> Result<()> {
        // Both writes happen under one lock
        let mut tables = self.lock()?;
        tables.cache.insert(cache.hash.clone(), cache);
        tables.history.push(history);
        Ok(())
    }

    fn clear_cache(&self) -> Result<()> {
        self.lock()?.cache.clear();
        Ok(())
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let tables = self.lock()?;
        let mut entries: Vec<_> = tables.history.iter().rev().cloned().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }

    fn setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.lock()?.settings.get(key).cloned())
    }

    fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.lock()?.settings.insert(key.to_string(), value);
        Ok(())
    }
}
