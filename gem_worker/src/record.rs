//! Persisted records: named builds, cached results and calculation history

use chrono::{DateTime, Duration, Utc};
use gem_core::{BuildOptions, BuildParams, CalculationResult, CharacterStats, GemSelection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named build configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    /// Empty until first saved
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub selection: GemSelection,
    #[serde(default)]
    pub character_stats: CharacterStats,
    #[serde(default)]
    pub build_options: BuildOptions,
    /// Last result calculated for this build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_dps: Option<CalculationResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Build {
    /// Create an unsaved build with default stats and options
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Build {
            id: String::new(),
            name: name.into(),
            description: None,
            selection: GemSelection::new(),
            character_stats: CharacterStats::default(),
            build_options: BuildOptions::default(),
            calculated_dps: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_selection(mut self, selection: GemSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_stats(mut self, stats: CharacterStats) -> Self {
        self.character_stats = stats;
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    /// Calculation input for this build
    pub fn params(&self) -> BuildParams {
        BuildParams::new(
            self.selection.clone(),
            self.character_stats.clone(),
            self.build_options,
        )
    }

    /// Assign a fresh ID if the build has none
    pub(crate) fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
    }
}

/// A result cached under a build fingerprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedCalculation {
    pub hash: String,
    pub result: CalculationResult,
    pub timestamp: DateTime<Utc>,
}

impl CachedCalculation {
    pub fn new(hash: impl Into<String>, result: CalculationResult, timestamp: DateTime<Utc>) -> Self {
        CachedCalculation {
            hash: hash.into(),
            result,
            timestamp,
        }
    }

    /// An entry is stale once it is older than `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp > ttl
    }
}

/// One completed calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub build: BuildParams,
    pub result: CalculationResult,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(build: BuildParams, result: CalculationResult, timestamp: DateTime<Utc>) -> Self {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            build,
            result,
            timestamp,
        }
    }
}
