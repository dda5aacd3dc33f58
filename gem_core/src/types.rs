//! Build inputs: gem identifiers, character stats, options and selection

use crate::error::{CalcError, SelectionError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Lowest selectable gem rank
pub const MIN_RANK: u8 = 1;
/// Highest selectable gem rank
pub const MAX_RANK: u8 = 10;
/// Rank given to a gem when it is toggled on without an explicit rank
pub const DEFAULT_SELECTED_RANK: u8 = MAX_RANK;

/// Identifier for a gem in the registry (e.g. `bloodSoakedJade`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GemId(pub String);

impl GemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GemId {
    fn from(s: &str) -> Self {
        GemId(s.to_string())
    }
}

impl From<String> for GemId {
    fn from(s: String) -> Self {
        GemId(s)
    }
}

impl fmt::Display for GemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gem category, used for filtering the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GemCategory {
    /// Contributes a percentage damage bonus ("leg bonus")
    #[serde(rename = "leg")]
    Percentage,
    /// Mixes percentage and direct contributions
    #[serde(rename = "mixed")]
    Hybrid,
    /// Scales with critical strike stats
    #[serde(rename = "crit")]
    Critical,
    /// Contributes direct damage per second
    #[serde(rename = "direct")]
    Direct,
}

impl GemCategory {
    /// Get all categories
    pub fn all() -> &'static [GemCategory] {
        &[
            GemCategory::Percentage,
            GemCategory::Hybrid,
            GemCategory::Critical,
            GemCategory::Direct,
        ]
    }
}

/// Character stats snapshot used for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    pub base_damage: f64,
    /// Critical strike chance in percent
    pub crit_chance: f64,
    /// Critical strike damage in percent
    pub crit_damage: f64,
    /// Attacks per second multiplier
    pub attack_speed: f64,
    /// Effective number of targets hit
    pub enemy_count: f64,
    /// Current life, 0-100
    pub current_life_percent: f64,
    /// Share of damage dealt by the primary attack, 0-100
    pub primary_percent: f64,
    pub has_buff_skill: bool,
    pub has_dash_skill: bool,
    /// Vithus set bonus (extends buff durations)
    pub has_vithus: bool,
    pub has_feasting_baron: bool,
    pub fighting_elites: bool,
}

impl Default for CharacterStats {
    fn default() -> Self {
        CharacterStats {
            base_damage: 1000.0,
            crit_chance: 0.0,
            crit_damage: 0.0,
            attack_speed: 1.4,
            enemy_count: 1.0,
            current_life_percent: 100.0,
            primary_percent: 50.0,
            has_buff_skill: false,
            has_dash_skill: false,
            has_vithus: false,
            has_feasting_baron: false,
            fighting_elites: false,
        }
    }
}

impl CharacterStats {
    /// DPS before any gem is applied: base damage × attack speed
    pub fn base_dps(&self) -> f64 {
        self.base_damage * self.attack_speed
    }

    /// Current life as a 0-1 fraction
    pub fn life_ratio(&self) -> f64 {
        self.current_life_percent / 100.0
    }

    /// Check that every field is in its legal range
    pub fn validate(&self) -> Result<(), CalcError> {
        let numeric = [
            ("base_damage", self.base_damage),
            ("crit_chance", self.crit_chance),
            ("crit_damage", self.crit_damage),
            ("attack_speed", self.attack_speed),
            ("enemy_count", self.enemy_count),
            ("current_life_percent", self.current_life_percent),
            ("primary_percent", self.primary_percent),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(CalcError::InvalidBuild(format!("{} is not a finite number", name)));
            }
        }

        for (name, value) in [
            ("base_damage", self.base_damage),
            ("attack_speed", self.attack_speed),
            ("enemy_count", self.enemy_count),
        ] {
            if value < 0.0 {
                return Err(CalcError::InvalidBuild(format!("{} must not be negative", name)));
            }
        }

        for (name, value) in [
            ("current_life_percent", self.current_life_percent),
            ("primary_percent", self.primary_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(CalcError::InvalidBuild(format!("{} must be within 0-100", name)));
            }
        }

        Ok(())
    }
}

/// Global build toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Reduced mode: every gem coefficient is divided by 3
    pub use_strife: bool,
    /// Fated Trail gems are allowed; informational only
    pub use_fated_trail: bool,
}

/// Selected gems with their ranks
///
/// Selection order is kept for display; it never changes the computed totals.
/// Every rank entry belongs to a selected gem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemSelection {
    #[serde(rename = "selected_gems", default)]
    selected: Vec<GemId>,
    #[serde(rename = "gem_ranks", default)]
    ranks: BTreeMap<GemId, u8>,
}

impl GemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from `(id, rank)` pairs, in order
    pub fn from_ranks<I, G>(gems: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = (G, u8)>,
        G: Into<GemId>,
    {
        let mut selection = Self::new();
        for (id, rank) in gems {
            selection.select(id, rank)?;
        }
        Ok(selection)
    }

    /// Select a gem at a rank; re-selecting only updates the rank
    pub fn select(&mut self, id: impl Into<GemId>, rank: u8) -> Result<(), SelectionError> {
        check_rank(rank)?;
        let id = id.into();
        if !self.selected.contains(&id) {
            self.selected.push(id.clone());
        }
        self.ranks.insert(id, rank);
        Ok(())
    }

    /// Select a gem without a rank entry; the engine evaluates it at rank 1
    pub fn select_unranked(&mut self, id: impl Into<GemId>) {
        let id = id.into();
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    /// Toggle a gem on (at the default rank) or off. Returns whether it is now selected.
    pub fn toggle(&mut self, id: impl Into<GemId>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            self.deselect(&id);
            false
        } else {
            self.selected.push(id.clone());
            self.ranks.insert(id, DEFAULT_SELECTED_RANK);
            true
        }
    }

    /// Remove a gem and its rank entry
    pub fn deselect(&mut self, id: &GemId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|g| g != id);
        self.ranks.remove(id);
        self.selected.len() != before
    }

    /// Change the rank of an already selected gem
    pub fn set_rank(&mut self, id: &GemId, rank: u8) -> Result<(), SelectionError> {
        check_rank(rank)?;
        if !self.contains(id) {
            return Err(SelectionError::NotSelected(id.clone()));
        }
        self.ranks.insert(id.clone(), rank);
        Ok(())
    }

    /// Rank entry for a gem, if one was recorded
    pub fn rank_of(&self, id: &GemId) -> Option<u8> {
        self.ranks.get(id).copied()
    }

    pub fn contains(&self, id: &GemId) -> bool {
        self.selected.contains(id)
    }

    /// Selected gems in selection order
    pub fn iter(&self) -> impl Iterator<Item = &GemId> {
        self.selected.iter()
    }

    /// Rank entries, ordered by gem id
    pub fn ranks(&self) -> &BTreeMap<GemId, u8> {
        &self.ranks
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Check uniqueness, rank bounds and that ranks only exist for selected gems.
    /// Needed for selections that arrive through deserialization.
    pub fn validate(&self) -> Result<(), CalcError> {
        let mut seen = HashSet::new();
        for id in &self.selected {
            if !seen.insert(id) {
                return Err(CalcError::InvalidBuild(format!("gem {} is selected twice", id)));
            }
        }

        for (id, rank) in &self.ranks {
            if !seen.contains(id) {
                return Err(CalcError::InvalidBuild(format!(
                    "rank given for unselected gem {}",
                    id
                )));
            }
            if !(MIN_RANK..=MAX_RANK).contains(rank) {
                return Err(CalcError::InvalidBuild(format!(
                    "gem {} has rank {} outside {}-{}",
                    id, rank, MIN_RANK, MAX_RANK
                )));
            }
        }

        Ok(())
    }
}

fn check_rank(rank: u8) -> Result<(), SelectionError> {
    if (MIN_RANK..=MAX_RANK).contains(&rank) {
        Ok(())
    } else {
        Err(SelectionError::InvalidRank(rank))
    }
}

/// A possibly incomplete build, as received at the calculation boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<GemSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_stats: Option<CharacterStats>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_options: Option<BuildOptions>,
}

impl BuildParams {
    /// Complete build parameters
    pub fn new(selection: GemSelection, character_stats: CharacterStats, build_options: BuildOptions) -> Self {
        BuildParams {
            selection: Some(selection),
            character_stats: Some(character_stats),
            build_options: Some(build_options),
        }
    }

    /// Resolve into validated parts, or fail before any gem is evaluated
    pub fn validate(&self) -> Result<(&GemSelection, &CharacterStats, &BuildOptions), CalcError> {
        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| CalcError::InvalidBuild("missing gem selection".to_string()))?;
        let stats = self
            .character_stats
            .as_ref()
            .ok_or_else(|| CalcError::InvalidBuild("missing character stats".to_string()))?;
        let options = self
            .build_options
            .as_ref()
            .ok_or_else(|| CalcError::InvalidBuild("missing build options".to_string()))?;

        selection.validate()?;
        stats.validate()?;
        Ok((selection, stats, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert!((stats.base_dps() - 1400.0).abs() < 1e-9);
        assert!((stats.life_ratio() - 1.0).abs() < f64::EPSILON);
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn test_partial_stats_deserialize_with_defaults() {
        let stats: CharacterStats =
            serde_json::from_str(r#"{"base_damage": 2000, "has_buff_skill": true}"#).unwrap();
        assert!((stats.base_damage - 2000.0).abs() < f64::EPSILON);
        assert!((stats.attack_speed - 1.4).abs() < f64::EPSILON);
        assert!(stats.has_buff_skill);
    }

    #[test]
    fn test_stats_validation() {
        let stats = CharacterStats {
            current_life_percent: 120.0,
            ..Default::default()
        };
        assert!(stats.validate().is_err());

        let stats = CharacterStats {
            base_damage: f64::NAN,
            ..Default::default()
        };
        assert!(stats.validate().is_err());

        let stats = CharacterStats {
            attack_speed: -1.0,
            ..Default::default()
        };
        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_toggle_uses_default_rank() {
        let mut selection = GemSelection::new();
        assert!(selection.toggle("bloodSoakedJade"));
        assert_eq!(selection.rank_of(&"bloodSoakedJade".into()), Some(10));

        assert!(!selection.toggle("bloodSoakedJade"));
        assert!(selection.is_empty());
        assert!(selection.ranks().is_empty());
    }

    #[test]
    fn test_set_rank_requires_selection() {
        let mut selection = GemSelection::new();
        let id = GemId::from("ferventFang");
        assert!(matches!(
            selection.set_rank(&id, 3),
            Err(SelectionError::NotSelected(_))
        ));

        selection.select(id.clone(), 1).unwrap();
        assert!(matches!(
            selection.set_rank(&id, 11),
            Err(SelectionError::InvalidRank(11))
        ));
        selection.set_rank(&id, 7).unwrap();
        assert_eq!(selection.rank_of(&id), Some(7));
    }

    #[test]
    fn test_reselect_keeps_order() {
        let selection =
            GemSelection::from_ranks([("a", 1), ("b", 2), ("a", 5)]).unwrap();
        let order: Vec<_> = selection.iter().map(|g| g.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert_eq!(selection.rank_of(&"a".into()), Some(5));
    }

    #[test]
    fn test_deserialized_selection_validation() {
        let orphan: GemSelection = serde_json::from_str(
            r#"{"selected_gems": ["a"], "gem_ranks": {"a": 3, "b": 4}}"#,
        )
        .unwrap();
        assert!(orphan.validate().is_err());

        let duplicate: GemSelection =
            serde_json::from_str(r#"{"selected_gems": ["a", "a"]}"#).unwrap();
        assert!(duplicate.validate().is_err());

        let bad_rank: GemSelection =
            serde_json::from_str(r#"{"selected_gems": ["a"], "gem_ranks": {"a": 0}}"#).unwrap();
        assert!(bad_rank.validate().is_err());
    }

    #[test]
    fn test_build_params_missing_section() {
        let params = BuildParams {
            selection: Some(GemSelection::new()),
            character_stats: None,
            build_options: Some(BuildOptions::default()),
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("character stats"));
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&GemCategory::Percentage).unwrap();
        assert_eq!(json, "\"leg\"");
        let cat: GemCategory = serde_json::from_str("\"direct\"").unwrap();
        assert_eq!(cat, GemCategory::Direct);
    }
}
