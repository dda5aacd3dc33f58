//! Gem formula variants and their evaluation

use crate::calc::GemContribution;
use crate::gem::Coefficients;
use crate::types::CharacterStats;
use serde::{Deserialize, Serialize};

/// Reduced mode (Strife) divides every coefficient by this
pub const STRIFE_DIVISOR: f64 = 3.0;
/// Time window that direct damage and buff uptimes are averaged over
pub const REFERENCE_WINDOW: f64 = 20.0;
/// Stack count assumed for stacking gems
pub const DEFAULT_MAX_STACKS: u32 = 10;

/// How a gem turns its rank coefficients into a contribution
///
/// Coefficient slots: `c1` is the first value of the rank row, `c2` the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GemFormula {
    /// Bonus scales linearly with current life, from `c1 / 2` at 0% to `c1` at 100%
    LifeScaled,
    /// Damage buff (`c1`) for the buff skill's uptime, plus cooldown reduction (`c2`)
    /// converted into extra skill damage. Inactive without a buff skill.
    BuffUptime {
        #[serde(default = "default_buff_duration")]
        base_duration: f64,
        /// Duration with the Vithus bonus
        #[serde(default = "default_vithus_duration")]
        vithus_duration: f64,
    },
    /// Summoned companion hitting every enemy for `c1`% of base damage plus a flat amount
    Summon {
        flat_damage: f64,
        #[serde(default = "default_label")]
        label: String,
    },
    /// Damage over time of `c1`% base damage plus a flat amount per second,
    /// spreading to at most `max_targets` enemies
    DamageOverTime {
        flat_damage: f64,
        duration: f64,
        max_targets: f64,
        #[serde(default = "default_label")]
        label: String,
    },
    /// `c1` per stack at full stacks, plus `c2` against elites when `elite_bonus` is set
    Stacking {
        #[serde(default = "default_max_stacks")]
        max_stacks: u32,
        #[serde(default)]
        elite_bonus: bool,
    },
    /// Unconditional `c1` bonus under a situational condition shown in the description
    Flat { condition: String },
}

fn default_buff_duration() -> f64 {
    6.0
}
fn default_vithus_duration() -> f64 {
    7.8
}
fn default_max_stacks() -> u32 {
    DEFAULT_MAX_STACKS
}
fn default_label() -> String {
    "direct".to_string()
}

/// Apply reduced-mode scaling to a raw value
pub fn strife_scaled(value: f64, is_strife: bool) -> f64 {
    if is_strife {
        value / STRIFE_DIVISOR
    } else {
        value
    }
}

impl GemFormula {
    /// Evaluate the formula once, producing the bonus, direct DPS and the
    /// description rendered from those same numbers
    pub fn evaluate(
        &self,
        coefficients: Coefficients,
        is_strife: bool,
        stats: &CharacterStats,
    ) -> GemContribution {
        let c1 = strife_scaled(coefficients.primary, is_strife);
        let c2 = strife_scaled(coefficients.secondary, is_strife);

        match self {
            GemFormula::LifeScaled => {
                let min = c1 / 2.0;
                let bonus = min + (c1 - min) * stats.life_ratio();
                GemContribution::leg(
                    bonus,
                    format!("+{:.1}% damage (at {}% HP)", tenths(bonus), stats.current_life_percent),
                )
            }
            GemFormula::BuffUptime {
                base_duration,
                vithus_duration,
            } => {
                if !stats.has_buff_skill {
                    return GemContribution::inactive("Inactive (no buff skill)");
                }

                let duration = if stats.has_vithus {
                    *vithus_duration
                } else {
                    *base_duration
                };
                let damage_bonus = c1 * (duration / REFERENCE_WINDOW);

                if c2 > 0.0 {
                    let cdr = c2 / 100.0;
                    let speedup = 1.0 / (1.0 - cdr) - 1.0;
                    let skill_share = 1.0 - stats.primary_percent / 100.0;
                    let cdr_bonus = speedup * 100.0 * skill_share;
                    GemContribution::leg(
                        damage_bonus + cdr_bonus,
                        format!("+{:.1}% dmg + {:.1}% CDR", tenths(damage_bonus), tenths(c2)),
                    )
                } else {
                    GemContribution::leg(damage_bonus, format!("+{:.1}% damage", tenths(damage_bonus)))
                }
            }
            GemFormula::Summon { flat_damage, label } => {
                let flat = strife_scaled(*flat_damage, is_strife);
                let hit = stats.base_damage * (c1 / 100.0) + flat;
                let dps = hit * stats.enemy_count / REFERENCE_WINDOW;
                GemContribution::direct(dps, format!("{} {} DPS", group_thousands(dps), label))
            }
            GemFormula::DamageOverTime {
                flat_damage,
                duration,
                max_targets,
                label,
            } => {
                let flat = strife_scaled(*flat_damage, is_strife);
                let per_second = stats.base_damage * (c1 / 100.0) + flat;
                let total = per_second * duration;
                let targets = stats.enemy_count.min(*max_targets);
                let dps = total * targets / REFERENCE_WINDOW;
                GemContribution::direct(dps, format!("{} {} DPS", group_thousands(dps), label))
            }
            GemFormula::Stacking {
                max_stacks,
                elite_bonus,
            } => {
                let mut bonus = c1 * f64::from(*max_stacks);
                if *elite_bonus && stats.fighting_elites {
                    bonus += c2;
                }
                GemContribution::leg(bonus, format!("+{:.1}% damage ({} stacks)", tenths(bonus), max_stacks))
            }
            GemFormula::Flat { condition } => {
                GemContribution::leg(c1, format!("+{:.1}% damage {}", tenths(c1), condition))
            }
        }
    }

    /// Whether the bonus is a linear function of the rank coefficients,
    /// so reduced mode divides the result by exactly 3
    pub fn is_coefficient_linear(&self) -> bool {
        !matches!(self, GemFormula::BuffUptime { .. })
    }
}

/// Round to one decimal, halves away from zero. `{:.1}` alone rounds exact
/// ties to even, so `5.25` would print as `5.2`.
pub fn tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to a whole number and group thousands with commas (e.g. `12,345`)
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
