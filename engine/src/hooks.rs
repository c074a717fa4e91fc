use serde::{Deserialize, Serialize};

use crate::profile::{CombatantProfile, ToolProfile};

/// Interception points of a contest, listed in the order they run.
///
/// 1. to-hit: `ToolToHit`, `AttackerToHit` adjust the total roll
/// 2. defense: `DefenderDefense`, `ToolDefense` adjust the defense value
/// 3. natural: `ToolNaturalHit`, `AttackerNaturalHit`, `DefenderNaturalHit`
///    adjust the bonus used for the autohit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookStage {
    ToolToHit,
    AttackerToHit,
    DefenderDefense,
    ToolDefense,
    ToolNaturalHit,
    AttackerNaturalHit,
    DefenderNaturalHit,
}

impl HookStage {
    pub const TO_HIT: [HookStage; 2] = [HookStage::ToolToHit, HookStage::AttackerToHit];
    pub const DEFENSE: [HookStage; 2] = [HookStage::DefenderDefense, HookStage::ToolDefense];
    pub const NATURAL: [HookStage; 3] = [
        HookStage::ToolNaturalHit,
        HookStage::AttackerNaturalHit,
        HookStage::DefenderNaturalHit,
    ];
}

/// Read-only view handed to each hook. Running values include every delta
/// applied by earlier hooks.
#[derive(Debug, Clone, Copy)]
pub struct RollContext<'a> {
    pub stage: HookStage,
    pub attacker: &'a CombatantProfile,
    pub defender: &'a CombatantProfile,
    pub tool: Option<&'a ToolProfile>,
    pub natural_roll: i32,
    pub total_roll: i64,
    pub defense_value: i64,
    pub natural_hit_bonus: i64,
}

/// A situational modifier plugged into a [`crate::ContestResolver`].
///
/// Return `0` for stages the hook does not care about.
pub trait RollHook: Send + Sync {
    fn adjust_roll(&self, ctx: &RollContext<'_>) -> i32;
}

/// A fixed delta applied at one stage, e.g. a situational penalty from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlatModifier {
    pub stage: HookStage,
    pub delta: i32,
}

impl RollHook for FlatModifier {
    fn adjust_roll(&self, ctx: &RollContext<'_>) -> i32 {
        if ctx.stage == self.stage { self.delta } else { 0 }
    }
}
