//! Gem definitions and rank tables

use crate::calc::GemContribution;
use crate::error::EvaluationError;
use crate::gem::GemFormula;
use crate::types::{CharacterStats, GemCategory, GemId, MAX_RANK, MIN_RANK};
use serde::{Deserialize, Serialize};

/// Raw values for one rank: one or two numbers, the second defaulting to 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Coefficients {
    pub primary: f64,
    pub secondary: f64,
}

impl Coefficients {
    pub fn new(primary: f64, secondary: f64) -> Self {
        Coefficients { primary, secondary }
    }
}

impl TryFrom<Vec<f64>> for Coefficients {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [primary] => Ok(Coefficients::new(*primary, 0.0)),
            [primary, secondary] => Ok(Coefficients::new(*primary, *secondary)),
            other => Err(format!("expected 1 or 2 coefficients, got {}", other.len())),
        }
    }
}

impl From<Coefficients> for Vec<f64> {
    fn from(c: Coefficients) -> Self {
        vec![c.primary, c.secondary]
    }
}

/// Coefficients for every rank from 1 to 10
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    rows: [Coefficients; MAX_RANK as usize],
}

impl RankTable {
    pub fn new(rows: [Coefficients; MAX_RANK as usize]) -> Self {
        RankTable { rows }
    }

    /// Build from `[c1, c2]` pairs, rank 1 first
    pub fn from_pairs(pairs: [[f64; 2]; MAX_RANK as usize]) -> Self {
        RankTable {
            rows: pairs.map(|[a, b]| Coefficients::new(a, b)),
        }
    }

    /// Coefficients for a rank, or `None` outside 1-10
    pub fn get(&self, rank: u8) -> Option<Coefficients> {
        if (MIN_RANK..=MAX_RANK).contains(&rank) {
            Some(self.rows[usize::from(rank - MIN_RANK)])
        } else {
            None
        }
    }

    /// `(rank, coefficients)` pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (u8, Coefficients)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u8 + MIN_RANK, *c))
    }
}

/// Static definition of a gem
#[derive(Debug, Clone, PartialEq)]
pub struct GemDefinition {
    pub id: GemId,
    /// Display name
    pub name: String,
    /// Star tier, 1-5
    pub stars: u8,
    pub category: GemCategory,
    pub ranks: RankTable,
    pub formula: GemFormula,
}

impl GemDefinition {
    /// Evaluate bonus, direct DPS and description for a rank
    pub fn evaluate(
        &self,
        rank: u8,
        is_strife: bool,
        stats: &CharacterStats,
    ) -> Result<GemContribution, EvaluationError> {
        let coefficients = self
            .ranks
            .get(rank)
            .ok_or_else(|| EvaluationError::RankOutOfRange {
                gem: self.id.clone(),
                rank,
            })?;

        let contribution = self.formula.evaluate(coefficients, is_strife, stats);
        if !contribution.leg_bonus.is_finite() || !contribution.direct_dps.is_finite() {
            return Err(EvaluationError::NonFinite {
                gem: self.id.clone(),
            });
        }
        Ok(contribution)
    }

    /// Percentage damage bonus ("leg bonus")
    pub fn leg_bonus(&self, rank: u8, is_strife: bool, stats: &CharacterStats) -> Result<f64, EvaluationError> {
        Ok(self.evaluate(rank, is_strife, stats)?.leg_bonus)
    }

    /// Direct damage per second
    pub fn direct_dps(&self, rank: u8, is_strife: bool, stats: &CharacterStats) -> Result<f64, EvaluationError> {
        Ok(self.evaluate(rank, is_strife, stats)?.direct_dps)
    }

    /// Human-readable effect at a rank
    pub fn describe(&self, rank: u8, is_strife: bool, stats: &CharacterStats) -> Result<String, EvaluationError> {
        Ok(self.evaluate(rank, is_strife, stats)?.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jade() -> GemDefinition {
        GemDefinition {
            id: GemId::from("jade"),
            name: "Jade".to_string(),
            stars: 5,
            category: GemCategory::Percentage,
            ranks: RankTable::from_pairs([
                [8.0, 0.0],
                [10.5, 0.0],
                [10.5, 2.0],
                [13.5, 2.0],
                [13.5, 4.0],
                [17.0, 4.0],
                [17.0, 6.0],
                [20.5, 6.0],
                [20.5, 8.0],
                [24.0, 8.0],
            ]),
            formula: GemFormula::LifeScaled,
        }
    }

    #[test]
    fn test_rank_table_bounds() {
        let gem = jade();
        assert!(gem.ranks.get(0).is_none());
        assert!(gem.ranks.get(11).is_none());
        assert_eq!(gem.ranks.get(1), Some(Coefficients::new(8.0, 0.0)));
        assert_eq!(gem.ranks.get(10), Some(Coefficients::new(24.0, 8.0)));
        assert_eq!(gem.ranks.iter().count(), 10);
    }

    #[test]
    fn test_out_of_range_rank_is_an_error() {
        let gem = jade();
        let err = gem.evaluate(11, false, &CharacterStats::default()).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::RankOutOfRange {
                gem: GemId::from("jade"),
                rank: 11
            }
        );
    }

    #[test]
    fn test_accessors_agree_with_evaluate() {
        let gem = jade();
        let stats = CharacterStats {
            current_life_percent: 40.0,
            ..Default::default()
        };
        let full = gem.evaluate(7, true, &stats).unwrap();
        assert_eq!(gem.leg_bonus(7, true, &stats).unwrap(), full.leg_bonus);
        assert_eq!(gem.direct_dps(7, true, &stats).unwrap(), full.direct_dps);
        assert_eq!(gem.describe(7, true, &stats).unwrap(), full.description);
    }

    #[test]
    fn test_description_rounds_halves_up() {
        let gem = jade();
        let empty = CharacterStats {
            current_life_percent: 0.0,
            ..Default::default()
        };
        // 10.5 / 2 = 5.25
        assert_eq!(gem.describe(2, false, &empty).unwrap(), "+5.3% damage (at 0% HP)");
        assert_eq!(gem.describe(3, false, &empty).unwrap(), "+5.3% damage (at 0% HP)");
    }

    #[test]
    fn test_non_finite_result_is_an_error() {
        let gem = GemDefinition {
            id: GemId::from("broken"),
            name: "Broken".to_string(),
            stars: 1,
            category: GemCategory::Percentage,
            ranks: RankTable::from_pairs([[10.0, 100.0]; 10]),
            formula: GemFormula::BuffUptime {
                base_duration: 6.0,
                vithus_duration: 7.8,
            },
        };
        let stats = CharacterStats {
            has_buff_skill: true,
            ..Default::default()
        };
        assert!(matches!(
            gem.evaluate(1, false, &stats),
            Err(EvaluationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_coefficients_from_single_value() {
        let c: Coefficients = serde_json::from_str("[4.5]").unwrap();
        assert_eq!(c, Coefficients::new(4.5, 0.0));
        assert!(serde_json::from_str::<Coefficients>("[1, 2, 3]").is_err());
    }
}
