//! Build fingerprints for result caching
//!
//! A fingerprint is a rolling hash over a canonical JSON form of the build.
//! Gem IDs are sorted and ranks are keyed by ID, so selection order never
//! changes the fingerprint. Every stat and option field is part of the text.
//!
//! The hash is 64-bit and not collision resistant. Use it as a cache key only.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CalcError;
use crate::types::{BuildOptions, CharacterStats, GemId, GemSelection};

/// Inputs that affect a calculation, in a fixed field order
#[derive(Serialize)]
struct CanonicalBuild<'a> {
    selected_gems: Vec<&'a str>,
    gem_ranks: &'a BTreeMap<GemId, u8>,
    character_stats: CharacterStats,
    build_options: &'a BuildOptions,
}

/// Fingerprint a build
pub fn fingerprint(
    selection: &GemSelection,
    stats: &CharacterStats,
    options: &BuildOptions,
) -> Result<String, CalcError> {
    let canonical = canonical_form(selection, stats, options)?;
    Ok(to_base36(rolling_hash(&canonical)))
}

/// Deterministic JSON form of the inputs that affect a calculation.
///
/// Gem IDs are sorted and JSON-escaped, so IDs containing separators cannot
/// run into each other. `-0.0` is written as `0.0`.
pub fn canonical_form(
    selection: &GemSelection,
    stats: &CharacterStats,
    options: &BuildOptions,
) -> Result<String, CalcError> {
    let mut selected_gems: Vec<_> = selection.iter().map(|g| g.as_str()).collect();
    selected_gems.sort_unstable();

    let build = CanonicalBuild {
        selected_gems,
        gem_ranks: selection.ranks(),
        character_stats: without_negative_zero(stats),
        build_options: options,
    };
    serde_json::to_string(&build).map_err(|e| CalcError::Fingerprint(e.to_string()))
}

fn without_negative_zero(stats: &CharacterStats) -> CharacterStats {
    // -0.0 + 0.0 == +0.0
    let z = |v: f64| v + 0.0;
    CharacterStats {
        base_damage: z(stats.base_damage),
        crit_chance: z(stats.crit_chance),
        crit_damage: z(stats.crit_damage),
        attack_speed: z(stats.attack_speed),
        enemy_count: z(stats.enemy_count),
        current_life_percent: z(stats.current_life_percent),
        primary_percent: z(stats.primary_percent),
        ..stats.clone()
    }
}

/// `hash = hash × 31 + unit` over UTF-16 code units, wrapping at 64 bits
fn rolling_hash(text: &str) -> u64 {
    text.encode_utf16()
        .fold(0u64, |hash, unit| hash.wrapping_mul(31).wrapping_add(u64::from(unit)))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.iter().rev().map(|&d| char::from(d)).collect()
}
