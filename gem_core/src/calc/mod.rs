//! DPS aggregation - turning a build into a CalculationResult
//!
//! ```text
//! base_dps  = base_damage × attack_speed
//! total_dps = base_dps × (1 + Σ leg_bonus / 100) + Σ direct_dps
//! ```

mod result;

pub use result::{round2, Breakdown, CalculationMetadata, CalculationResult, GemContribution};

use crate::error::CalcError;
use crate::gem::{is_known_gem, GemRegistry};
use crate::types::{BuildOptions, BuildParams, CharacterStats, GemSelection, MIN_RANK};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, warn};

/// Calculate DPS for possibly incomplete build parameters.
///
/// Fails with `InvalidBuild` before any gem is evaluated when a section is
/// missing or malformed.
pub fn calculate(registry: &GemRegistry, params: &BuildParams) -> Result<CalculationResult, CalcError> {
    let (selection, stats, options) = params.validate()?;
    evaluate(registry, selection, stats, options)
}

/// Calculate DPS for a validated build.
///
/// Selected gems missing from the registry are skipped. Gems without a rank
/// entry are evaluated at rank 1. Any evaluation error aborts the calculation.
pub fn evaluate(
    registry: &GemRegistry,
    selection: &GemSelection,
    stats: &CharacterStats,
    options: &BuildOptions,
) -> Result<CalculationResult, CalcError> {
    let start = Instant::now();
    let is_strife = options.use_strife;

    let base_dps = stats.base_dps();

    let mut contributions = Vec::with_capacity(selection.len());
    let mut total_leg_bonus = 0.0;
    let mut total_direct_dps = 0.0;

    for id in selection.iter() {
        let Some(gem) = registry.get(id) else {
            if is_known_gem(id) {
                debug!(gem = %id, "gem has no formula yet, skipping");
            } else {
                warn!(gem = %id, "selected gem is not in the registry, skipping");
            }
            continue;
        };

        let rank = selection.rank_of(id).unwrap_or(MIN_RANK);
        let contribution = gem.evaluate(rank, is_strife, stats)?;

        total_leg_bonus += contribution.leg_bonus;
        total_direct_dps += contribution.direct_dps;
        contributions.push((id.clone(), contribution));
    }

    let multiplier = 1.0 + total_leg_bonus / 100.0;
    let total_dps = base_dps * multiplier + total_direct_dps;

    let result = CalculationResult {
        total_dps: round2(total_dps),
        base_dps: round2(base_dps),
        breakdown: Breakdown {
            contributions,
            total_leg_bonus: round2(total_leg_bonus),
            total_direct_dps: round2(total_direct_dps),
        },
        metadata: CalculationMetadata {
            calculated_at: Utc::now(),
            calculation_time: start.elapsed(),
        },
    };

    debug!(
        total_dps = result.total_dps,
        gems = result.breakdown.contributions.len(),
        strife = is_strife,
        "build evaluated"
    );

    Ok(result)
}
