//! Built-in gem catalog

use crate::gem::{GemDefinition, GemFormula, RankTable};
use crate::types::{GemCategory, GemId};

/// Identifiers of every gem the catalog knows about, cataloged or not.
/// Selections may reference any of these; only those with a definition contribute.
pub const KNOWN_GEM_IDS: &[&str] = &[
    "bloodSoakedJade",
    "bottledHope",
    "mawOfTheDeep",
    "gloomCask",
    "bloodFloe",
    "colossusEngine",
    "roilingConsequence",
    "hauntCoil",
    "ferventFang",
    "howlersCall",
    "spitefulBlood",
    "concentratedWill",
    "goldenFirmament",
    "wulfheort",
    "seepingBile",
    "frozenHeart",
    "phoenixAshes",
    "bloodyReach",
    "echoingShade",
    "cutthroatsGrin",
    "berserkersEye",
    "chipOfStonedFlesh",
];

/// Whether `id` names a gem of the game, whether or not it has a definition yet
pub fn is_known_gem(id: &GemId) -> bool {
    KNOWN_GEM_IDS.contains(&id.as_str())
}

fn gem(
    id: &str,
    name: &str,
    stars: u8,
    category: GemCategory,
    ranks: [[f64; 2]; 10],
    formula: GemFormula,
) -> GemDefinition {
    GemDefinition {
        id: GemId::from(id),
        name: name.to_string(),
        stars,
        category,
        ranks: RankTable::from_pairs(ranks),
        formula,
    }
}

/// Definitions shipped with the calculator, in catalog order
pub fn default_gems() -> Vec<GemDefinition> {
    vec![
        gem(
            "bloodSoakedJade",
            "Blood-Soaked Jade",
            5,
            GemCategory::Percentage,
            [
                [8.0, 0.0], [10.5, 0.0], [10.5, 2.0], [13.5, 2.0], [13.5, 4.0],
                [17.0, 4.0], [17.0, 6.0], [20.5, 6.0], [20.5, 8.0], [24.0, 8.0],
            ],
            GemFormula::LifeScaled,
        ),
        gem(
            "bottledHope",
            "Bottled Hope",
            5,
            GemCategory::Percentage,
            [
                [8.0, 0.0], [10.5, 0.0], [10.5, 1.5], [13.5, 1.5], [13.5, 3.0],
                [17.0, 3.0], [17.0, 4.5], [20.5, 4.5], [20.5, 6.0], [24.0, 6.0],
            ],
            GemFormula::BuffUptime {
                base_duration: 6.0,
                vithus_duration: 7.8,
            },
        ),
        gem(
            "howlersCall",
            "Howler's Call",
            5,
            GemCategory::Direct,
            [
                [150.0, 0.0], [180.0, 0.0], [180.0, 12.0], [220.0, 12.0], [220.0, 24.0],
                [260.0, 24.0], [260.0, 36.0], [310.0, 36.0], [310.0, 48.0], [360.0, 48.0],
            ],
            GemFormula::Summon {
                flat_damage: 1458.0,
                label: "wolf".to_string(),
            },
        ),
        gem(
            "seepingBile",
            "Seeping Bile",
            5,
            GemCategory::Direct,
            [
                [25.0, 0.0], [30.0, 0.0], [30.0, 6.0], [35.0, 6.0], [35.0, 12.0],
                [45.0, 12.0], [45.0, 18.0], [55.0, 18.0], [55.0, 24.0], [65.0, 24.0],
            ],
            GemFormula::DamageOverTime {
                flat_damage: 263.0,
                duration: 6.0,
                max_targets: 1.5,
                label: "poison".to_string(),
            },
        ),
        gem(
            "ferventFang",
            "Fervent Fang",
            2,
            GemCategory::Percentage,
            [
                [0.8, 0.0], [1.05, 0.0], [1.05, 1.5], [1.35, 1.5], [1.35, 3.0],
                [1.7, 3.0], [1.7, 4.5], [2.1, 4.5], [2.1, 6.0], [2.4, 6.0],
            ],
            GemFormula::Stacking {
                max_stacks: 10,
                elite_bonus: true,
            },
        ),
        gem(
            "berserkersEye",
            "Berserker's Eye",
            5,
            GemCategory::Percentage,
            [
                [1.5, 0.0], [2.0, 0.0], [2.0, 2.0], [2.5, 2.0], [2.5, 4.0],
                [3.0, 4.0], [3.0, 6.0], [3.5, 6.0], [3.5, 8.0], [4.0, 8.0],
            ],
            GemFormula::Stacking {
                max_stacks: 10,
                elite_bonus: false,
            },
        ),
        gem(
            "frozenHeart",
            "Frozen Heart",
            5,
            GemCategory::Percentage,
            [
                [4.0, 0.0], [5.0, 0.0], [5.0, 2.0], [6.0, 2.0], [6.0, 4.0],
                [8.0, 4.0], [8.0, 6.0], [10.0, 6.0], [10.0, 8.0], [12.0, 8.0],
            ],
            GemFormula::Flat {
                condition: "vs chilled".to_string(),
            },
        ),
    ]
}
