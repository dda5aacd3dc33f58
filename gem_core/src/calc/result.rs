//! CalculationResult - Outcome of a DPS calculation

use crate::types::GemId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What one gem added to the build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemContribution {
    /// Percentage damage bonus
    pub leg_bonus: f64,
    /// Direct damage per second
    pub direct_dps: f64,
    pub description: String,
}

impl GemContribution {
    /// A percentage-bonus contribution
    pub fn leg(leg_bonus: f64, description: impl Into<String>) -> Self {
        GemContribution {
            leg_bonus,
            direct_dps: 0.0,
            description: description.into(),
        }
    }

    /// A direct-damage contribution
    pub fn direct(direct_dps: f64, description: impl Into<String>) -> Self {
        GemContribution {
            leg_bonus: 0.0,
            direct_dps,
            description: description.into(),
        }
    }

    /// Contributes nothing
    pub fn inactive(description: impl Into<String>) -> Self {
        GemContribution {
            leg_bonus: 0.0,
            direct_dps: 0.0,
            description: description.into(),
        }
    }
}

/// Per-gem contributions and their totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Contributions in evaluation order
    pub contributions: Vec<(GemId, GemContribution)>,
    /// Sum of leg bonuses, in percent
    pub total_leg_bonus: f64,
    pub total_direct_dps: f64,
}

impl Breakdown {
    /// Get the contribution of a specific gem
    pub fn contribution(&self, id: &GemId) -> Option<&GemContribution> {
        self.contributions
            .iter()
            .find(|(gem, _)| gem == id)
            .map(|(_, c)| c)
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationMetadata {
    pub calculated_at: DateTime<Utc>,
    /// Wall-clock time spent in the engine
    pub calculation_time: Duration,
}

/// Result of evaluating a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_dps: f64,
    /// DPS before any gem
    pub base_dps: f64,
    pub breakdown: Breakdown,
    pub metadata: CalculationMetadata,
}

impl CalculationResult {
    /// Total multiplier applied to base DPS by leg bonuses
    pub fn multiplier(&self) -> f64 {
        1.0 + self.breakdown.total_leg_bonus / 100.0
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{:.2} DPS", self.total_dps)];

        if self.breakdown.total_leg_bonus > 0.0 {
            parts.push(format!("+{:.2}% from gems", self.breakdown.total_leg_bonus));
        }

        if self.breakdown.total_direct_dps > 0.0 {
            parts.push(format!("{:.2} direct DPS", self.breakdown.total_direct_dps));
        }

        parts.push(format!("base {:.2}", self.base_dps));
        parts.join(", ")
    }
}

/// Round to two decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(total_leg_bonus: f64, total_direct_dps: f64) -> CalculationResult {
        CalculationResult {
            total_dps: 1736.0,
            base_dps: 1400.0,
            breakdown: Breakdown {
                contributions: vec![(
                    GemId::from("bloodSoakedJade"),
                    GemContribution::leg(24.0, "+24.0% damage (at 100% HP)"),
                )],
                total_leg_bonus,
                total_direct_dps,
            },
            metadata: CalculationMetadata {
                calculated_at: Utc::now(),
                calculation_time: Duration::ZERO,
            },
        }
    }

    #[test]
    fn test_round2() {
        assert!((round2(1.005 * 1000.0) - 1005.0).abs() < f64::EPSILON);
        assert!((round2(2.345678) - 2.35).abs() < 1e-12);
        assert!((round2(-2.345678) + 2.35).abs() < 1e-12);
        assert!((round2(1399.9999999) - 1400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_breakdown_lookup() {
        let r = result(24.0, 0.0);
        assert!(r.breakdown.contribution(&GemId::from("bloodSoakedJade")).is_some());
        assert!(r.breakdown.contribution(&GemId::from("frozenHeart")).is_none());
        assert!((r.multiplier() - 1.24).abs() < 1e-12);
    }

    #[test]
    fn test_summary() {
        let summary = result(24.0, 0.0).summary();
        assert!(summary.contains("1736.00 DPS"));
        assert!(summary.contains("+24.00% from gems"));
        assert!(!summary.contains("direct"));

        let summary = result(0.0, 411.0).summary();
        assert!(summary.contains("411.00 direct DPS"));
    }

    #[test]
    fn test_result_json_roundtrip() {
        let r = result(24.0, 0.0);
        let json = serde_json::to_string(&r).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
