//! File-based store.
//!
//! # File Structure
//!
//! ```text
//! {base_dir}/
//!   builds/{id}.json
//!   cache/{hash}.json
//!   history/{timestamp_micros}_{id}.json
//!   settings.json
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{default_ttl, stamp_build, BuildStore, Result, StoreError};
use crate::record::{Build, CachedCalculation, HistoryEntry};

/// File-based store.
///
/// Every record is a JSON file written through a temp file and an atomic rename.
pub struct FileStore {
    base_dir: PathBuf,
    ttl: Duration,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_ttl(base_dir, default_ttl())
    }

    pub fn with_ttl(base_dir: impl AsRef<Path>, ttl: Duration) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        for dir in ["builds", "cache", "history"] {
            fs::create_dir_all(base_dir.join(dir))?;
        }
        Ok(Self { base_dir, ttl })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn build_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.base_dir.join("builds").join(format!("{}.json", checked_key(id)?)))
    }

    fn cache_path(&self, hash: &str) -> Result<PathBuf> {
        Ok(self.base_dir.join("cache").join(format!("{}.json", checked_key(hash)?)))
    }

    fn history_path(&self, entry: &HistoryEntry) -> Result<PathBuf> {
        Ok(self.base_dir.join("history").join(format!(
            "{:020}_{}.json",
            entry.timestamp.timestamp_micros().max(0),
            checked_key(&entry.id)?
        )))
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    fn load_settings(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        Ok(read_json(&self.settings_path())?.unwrap_or_default())
    }
}

/// Keys become file names, so only plain names are accepted
fn checked_key(key: &str) -> Result<&str> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(key)
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&temp_path, json)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

fn remove_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// JSON files in a directory, sorted by file name
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

impl BuildStore for FileStore {
    fn save_build(&self, mut build: Build) -> Result<Build> {
        build.ensure_id();
        let path = self.build_path(&build.id)?;
        let existing: Option<Build> = read_json(&path)?;
        let build = stamp_build(build, existing.as_ref(), Utc::now());
        write_json(&path, &build)?;
        debug!(id = %build.id, "saved build");
        Ok(build)
    }

    fn load_build(&self, id: &str) -> Result<Option<Build>> {
        read_json(&self.build_path(id)?)
    }

    fn list_builds(&self) -> Result<Vec<Build>> {
        let mut builds = Vec::new();
        for path in json_files(&self.base_dir.join("builds"))? {
            if let Some(build) = read_json::<Build>(&path)? {
                builds.push(build);
            }
        }
        builds.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(builds)
    }

    fn delete_build(&self, id: &str) -> Result<bool> {
        remove_if_exists(&self.build_path(id)?)
    }

    fn cached(&self, hash: &str, now: DateTime<Utc>) -> Result<Option<CachedCalculation>> {
        let path = self.cache_path(hash)?;
        match read_json::<CachedCalculation>(&path)? {
            Some(entry) if entry.is_expired(now, self.ttl) => {
                remove_if_exists(&path)?;
                debug!(hash, "dropped expired cache entry");
                Ok(None)
            }
            entry => Ok(entry),
        }
    }

    fn commit_calculation(&self, cache: CachedCalculation, history: HistoryEntry) -> Result<()> {
        let history_path = self.history_path(&history)?;
        let cache_path = self.cache_path(&cache.hash)?;

        write_json(&history_path, &history)?;
        if let Err(e) = write_json(&cache_path, &cache) {
            // Roll back so no history entry exists without its cache entry
            if let Err(cleanup) = remove_if_exists(&history_path) {
                warn!(error = %cleanup, path = %history_path.display(), "failed to roll back history entry");
            }
            return Err(e);
        }
        Ok(())
    }

    fn clear_cache(&self) -> Result<()> {
        for path in json_files(&self.base_dir.join("cache"))? {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let files = json_files(&self.base_dir.join("history"))?;
        let mut entries = Vec::with_capacity(limit.min(files.len()));
        for path in files.iter().rev().take(limit) {
            if let Some(entry) = read_json::<HistoryEntry>(path)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.load_settings()?.remove(key))
    }

    fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let mut settings = self.load_settings()?;
        settings.insert(key.to_string(), value);
        write_json(&self.settings_path(), &settings)
    }
}
