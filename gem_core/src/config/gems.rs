//! Gem catalog loading

use super::ConfigError;
use crate::gem::{Coefficients, GemDefinition, GemFormula, RankTable};
use crate::types::{GemCategory, GemId, MAX_RANK, MIN_RANK};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Gem entry as written in a catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemConfig {
    pub id: String,
    pub name: String,
    pub stars: u8,
    pub category: GemCategory,
    pub formula: GemFormula,
    /// Rank ("1".."10") to coefficients
    pub ranks: BTreeMap<String, Coefficients>,
}

/// Container for gem configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GemsConfig {
    #[serde(rename = "gems")]
    gems: Vec<GemConfig>,
}

impl TryFrom<GemConfig> for GemDefinition {
    type Error = ConfigError;

    fn try_from(config: GemConfig) -> Result<Self, Self::Error> {
        if config.id.trim().is_empty() {
            return Err(ConfigError::ValidationError("gem id must not be empty".to_string()));
        }
        if !(1..=5).contains(&config.stars) {
            return Err(ConfigError::ValidationError(format!(
                "gem {} has {} stars, expected 1-5",
                config.id, config.stars
            )));
        }

        let mut rows = [Coefficients::default(); MAX_RANK as usize];
        for rank in MIN_RANK..=MAX_RANK {
            let coefficients = config.ranks.get(&rank.to_string()).ok_or_else(|| {
                ConfigError::ValidationError(format!("gem {} is missing rank {}", config.id, rank))
            })?;
            rows[usize::from(rank - MIN_RANK)] = *coefficients;
        }
        if let Some(extra) = config
            .ranks
            .keys()
            .find(|k| k.parse::<u8>().map_or(true, |r| !(MIN_RANK..=MAX_RANK).contains(&r)))
        {
            return Err(ConfigError::ValidationError(format!(
                "gem {} has unexpected rank key {:?}",
                config.id, extra
            )));
        }

        check_values(&config.id, &config.formula, &rows)?;

        Ok(GemDefinition {
            id: GemId::from(config.id),
            name: config.name,
            stars: config.stars,
            category: config.category,
            ranks: RankTable::new(rows),
            formula: config.formula,
        })
    }
}

/// Reject values that would make a formula negative or non-finite
fn check_values(id: &str, formula: &GemFormula, rows: &[Coefficients]) -> Result<(), ConfigError> {
    let invalid = |what: String| -> Result<(), ConfigError> {
        Err(ConfigError::ValidationError(format!("gem {} {}", id, what)))
    };

    for (i, c) in rows.iter().enumerate() {
        let rank = i + usize::from(MIN_RANK);
        for value in [c.primary, c.secondary] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("has invalid coefficient {} at rank {}", value, rank));
            }
        }
        if matches!(formula, GemFormula::BuffUptime { .. }) && c.secondary >= 100.0 {
            return invalid(format!(
                "has cooldown reduction {} at rank {}, expected below 100",
                c.secondary, rank
            ));
        }
    }

    let constants: Vec<(&str, f64)> = match formula {
        GemFormula::BuffUptime {
            base_duration,
            vithus_duration,
        } => vec![("base_duration", *base_duration), ("vithus_duration", *vithus_duration)],
        GemFormula::Summon { flat_damage, .. } => vec![("flat_damage", *flat_damage)],
        GemFormula::DamageOverTime {
            flat_damage,
            duration,
            max_targets,
            ..
        } => vec![
            ("flat_damage", *flat_damage),
            ("duration", *duration),
            ("max_targets", *max_targets),
        ],
        GemFormula::LifeScaled | GemFormula::Stacking { .. } | GemFormula::Flat { .. } => Vec::new(),
    };
    for (name, value) in constants {
        if !value.is_finite() || value < 0.0 {
            return invalid(format!("has invalid {} {}", name, value));
        }
    }
    Ok(())
}

/// Load gem definitions from a TOML file
pub fn load_gem_configs(path: &Path) -> Result<Vec<GemDefinition>, ConfigError> {
    let config: GemsConfig = super::load_toml(path)?;
    config.gems.into_iter().map(GemDefinition::try_from).collect()
}

/// Load gem definitions from a TOML string
pub fn parse_gem_configs(content: &str) -> Result<Vec<GemDefinition>, ConfigError> {
    let config: GemsConfig = super::parse_toml(content)?;
    config.gems.into_iter().map(GemDefinition::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gem::GemRegistry;
    use crate::types::CharacterStats;

    const MAW: &str = r#"
[[gems]]
id = "mawOfTheDeep"
name = "Maw of the Deep"
stars = 5
category = "leg"

[gems.formula]
kind = "flat"
condition = "vs bleeding"

[gems.ranks]
"1" = [2]
"2" = [3]
"3" = [3, 1]
"4" = [4, 1]
"5" = [4, 2]
"6" = [5, 2]
"7" = [5, 3]
"8" = [6, 3]
"9" = [6, 4]
"10" = [7, 4]
"#;

    #[test]
    fn test_parse_gems() {
        let gems = parse_gem_configs(MAW).unwrap();
        assert_eq!(gems.len(), 1);

        let maw = &gems[0];
        assert_eq!(maw.id, GemId::from("mawOfTheDeep"));
        assert_eq!(maw.ranks.get(1), Some(Coefficients::new(2.0, 0.0)));
        assert_eq!(maw.ranks.get(10), Some(Coefficients::new(7.0, 4.0)));

        let description = maw.describe(10, false, &CharacterStats::default()).unwrap();
        assert_eq!(description, "+7.0% damage vs bleeding");
    }

    #[test]
    fn test_missing_rank_is_validation_error() {
        let toml = MAW.replace("\"7\" = [5, 3]\n", "");
        let err = parse_gem_configs(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("rank 7")));
    }

    #[test]
    fn test_unexpected_rank_is_validation_error() {
        let toml = format!("{}\"11\" = [8, 5]\n", MAW);
        let err = parse_gem_configs(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_stars_is_validation_error() {
        let toml = MAW.replace("stars = 5", "stars = 6");
        assert!(matches!(
            parse_gem_configs(&toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_negative_coefficient_is_validation_error() {
        let toml = MAW.replace("\"4\" = [4, 1]", "\"4\" = [-4, 1]");
        let err = parse_gem_configs(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("rank 4")));
    }

    #[test]
    fn test_full_cooldown_reduction_is_validation_error() {
        let toml = MAW
            .replace("kind = \"flat\"\ncondition = \"vs bleeding\"", "kind = \"buff_uptime\"")
            .replace("\"10\" = [7, 4]", "\"10\" = [7, 100]");
        let err = parse_gem_configs(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("cooldown")));

        // Below 100 is accepted
        let ok = toml.replace("[7, 100]", "[7, 99]");
        assert!(parse_gem_configs(&ok).is_ok());
    }

    #[test]
    fn test_negative_formula_constant_is_validation_error() {
        let toml = MAW.replace(
            "kind = \"flat\"\ncondition = \"vs bleeding\"",
            "kind = \"summon\"\nflat_damage = -5.0",
        );
        let err = parse_gem_configs(&toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("flat_damage")));
    }

    #[test]
    fn test_unknown_formula_is_parse_error() {
        let toml = MAW.replace("kind = \"flat\"", "kind = \"mystery\"");
        assert!(matches!(parse_gem_configs(&toml), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_extend_registry() {
        let mut registry = GemRegistry::with_defaults();
        let added = registry.extend_from_toml(MAW).unwrap();
        assert_eq!(added, 1);
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.all().last().unwrap().id.as_str(), "mawOfTheDeep");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_gem_configs(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
