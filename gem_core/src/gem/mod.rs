//! Gem registry - the catalog of gem definitions and their formulas

mod catalog;
mod definition;
mod formula;

pub use catalog::{default_gems, is_known_gem, KNOWN_GEM_IDS};
pub use definition::{Coefficients, GemDefinition, RankTable};
pub use formula::{
    group_thousands, strife_scaled, GemFormula, DEFAULT_MAX_STACKS, REFERENCE_WINDOW,
    STRIFE_DIVISOR,
};

use crate::config::{parse_gem_configs, ConfigError};
use crate::types::{GemCategory, GemId};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Gem registry
///
/// Keeps definitions in registration order. Read-only once built, so a single
/// instance can be shared between concurrent calculations.
#[derive(Debug, Clone, Default)]
pub struct GemRegistry {
    gems: Vec<GemDefinition>,
    /// Mapping from gem ID to position in `gems`
    index: HashMap<GemId, usize>,
}

impl GemRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        GemRegistry {
            gems: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a gem. Re-registering an ID replaces the definition in place.
    pub fn register(&mut self, gem: GemDefinition) {
        match self.index.get(&gem.id) {
            Some(&pos) => self.gems[pos] = gem,
            None => {
                self.index.insert(gem.id.clone(), self.gems.len());
                self.gems.push(gem);
            }
        }
    }

    /// Load the built-in catalog
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for gem in default_gems() {
            registry.register(gem);
        }
        registry
    }

    /// Process-wide built-in registry, built on first use
    pub fn global() -> &'static GemRegistry {
        static REGISTRY: OnceLock<GemRegistry> = OnceLock::new();
        REGISTRY.get_or_init(GemRegistry::with_defaults)
    }

    /// Add or override definitions from a TOML catalog.
    /// Returns how many definitions were read.
    pub fn extend_from_toml(&mut self, content: &str) -> Result<usize, ConfigError> {
        let gems = parse_gem_configs(content)?;
        let count = gems.len();
        for gem in gems {
            self.register(gem);
        }
        Ok(count)
    }

    /// Get a gem definition by ID
    pub fn get(&self, id: &GemId) -> Option<&GemDefinition> {
        self.index.get(id).map(|&pos| &self.gems[pos])
    }

    /// All definitions in registration order
    pub fn all(&self) -> &[GemDefinition] {
        &self.gems
    }

    pub fn by_category(&self, category: GemCategory) -> Vec<&GemDefinition> {
        self.gems.iter().filter(|g| g.category == category).collect()
    }

    pub fn by_stars(&self, stars: u8) -> Vec<&GemDefinition> {
        self.gems.iter().filter(|g| g.stars == stars).collect()
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}
