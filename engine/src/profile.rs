use serde::{Deserialize, Serialize};

/// Score at which a stat contributes no modifier.
pub const BASELINE_STAT_SCORE: i32 = 16;

/// Attack-side and defense-side numbers for one participant in a contest.
///
/// All values are expected to be fully computed upstream; `defense_value`
/// already includes the defender's own combat modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CombatantProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hit_bonus: i32,
    #[serde(default)]
    pub agility_modifier: i32,
    #[serde(default)]
    pub defense_value: i32,
    /// Only counts toward the autohit check on the unmodified roll.
    #[serde(default)]
    pub natural_hit_bonus: i32,
}

impl CombatantProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Fill `agility_modifier` from a raw Agility score.
    pub fn with_agility_score(mut self, score: i32) -> Self {
        self.agility_modifier = agility_modifier_from_score(score);
        self
    }
}

/// The held item used for the attempt: an injector, or any melee weapon.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ToolProfile {
    pub label: String,
    #[serde(default)]
    pub hit_bonus: i32,
    #[serde(default)]
    pub natural_hit_bonus: i32,
}

impl ToolProfile {
    pub fn new(label: impl Into<String>, hit_bonus: i32) -> Self {
        Self { label: label.into(), hit_bonus, natural_hit_bonus: 0 }
    }
}

/// Stat modifier = floor((score - 16) / 2).
pub fn agility_modifier_from_score(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - BASELINE_STAT_SCORE).div_euclid(2)
}
