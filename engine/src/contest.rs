use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::hooks::{HookStage, RollContext, RollHook};
use crate::profile::{CombatantProfile, ToolProfile};
use crate::RollSource;

/// A natural roll plus natural hit bonus at or above this always lands.
pub const AUTOHIT_THRESHOLD: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContestError {
    #[error("invalid profile: defense value {defense_value} is negative")]
    InvalidProfile { defense_value: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Hit,
    Miss,
    Fumble,
}

/// Result of one contest. Produced fresh per action and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContestOutcome {
    pub hit: bool,
    /// Only ever true on a miss.
    pub fumble: bool,
    pub autohit: bool,
    pub natural_roll: i32,
    /// Widened so any combination of `i32` bonuses sums exactly.
    pub total_roll: i64,
    /// Defense value the total was compared against, after hooks.
    pub defense_value: i64,
    /// `defense_value - total_roll`; positive means a miss by that much.
    pub margin: i64,
    /// Second die, drawn only when the attack misses.
    pub fumble_roll: Option<i32>,
}

impl ContestOutcome {
    pub fn verdict(&self) -> Verdict {
        if self.hit {
            Verdict::Hit
        } else if self.fumble {
            Verdict::Fumble
        } else {
            Verdict::Miss
        }
    }
}

/// Resolves attack-vs-defense contests, running any installed [`RollHook`]s
/// in [`HookStage`] order. Hooks within a stage run in installation order.
#[derive(Default)]
pub struct ContestResolver {
    hooks: Vec<Box<dyn RollHook>>,
}

impl ContestResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hook(mut self, hook: impl RollHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Roll one contest. `tool = None` is an unarmed attempt.
    ///
    /// Draws one d20 for the attack and, only on a non-autohit miss, a second
    /// d20 for the fumble check.
    pub fn resolve(
        &self,
        attacker: &CombatantProfile,
        defender: &CombatantProfile,
        tool: Option<&ToolProfile>,
        rng: &mut impl RollSource,
    ) -> Result<ContestOutcome, ContestError> {
        if defender.defense_value < 0 {
            return Err(ContestError::InvalidProfile {
                defense_value: defender.defense_value,
            });
        }

        let natural_roll = rng.d20();
        debug_assert!((1..=20).contains(&natural_roll), "d20 out of range: {natural_roll}");
        let natural = i64::from(natural_roll);

        let tool_hit_bonus = tool.map_or(0, |t| t.hit_bonus);
        let tool_natural_bonus = tool.map_or(0, |t| t.natural_hit_bonus);

        let mut ctx = RollContext {
            stage: HookStage::ToolToHit,
            attacker,
            defender,
            tool,
            natural_roll,
            total_roll: natural
                + i64::from(attacker.hit_bonus)
                + i64::from(tool_hit_bonus)
                + i64::from(attacker.agility_modifier),
            defense_value: i64::from(defender.defense_value),
            natural_hit_bonus: i64::from(tool_natural_bonus)
                + i64::from(attacker.natural_hit_bonus)
                + i64::from(defender.natural_hit_bonus),
        };

        if !self.hooks.is_empty() {
            for stage in HookStage::TO_HIT
                .into_iter()
                .chain(HookStage::DEFENSE)
                .chain(HookStage::NATURAL)
            {
                self.run_stage(stage, &mut ctx);
            }
        }

        let autohit = natural + ctx.natural_hit_bonus >= AUTOHIT_THRESHOLD;
        let hit = autohit || ctx.total_roll >= ctx.defense_value;
        let margin = ctx.defense_value - ctx.total_roll;

        let fumble_roll = if hit { None } else { Some(rng.d20()) };
        let fumble = fumble_roll
            .is_some_and(|r| i64::from(r) + i64::from(attacker.agility_modifier) <= margin);

        let outcome = ContestOutcome {
            hit,
            fumble,
            autohit,
            natural_roll,
            total_roll: ctx.total_roll,
            defense_value: ctx.defense_value,
            margin,
            fumble_roll,
        };
        debug!(
            attacker = %attacker.name,
            defender = %defender.name,
            tool = tool.map_or("unarmed", |t| t.label.as_str()),
            natural = natural_roll,
            total = outcome.total_roll,
            dv = outcome.defense_value,
            verdict = ?outcome.verdict(),
            "contest resolved"
        );
        Ok(outcome)
    }

    fn run_stage(&self, stage: HookStage, ctx: &mut RollContext<'_>) {
        ctx.stage = stage;
        for hook in &self.hooks {
            let delta = i64::from(hook.adjust_roll(ctx));
            if delta == 0 {
                continue;
            }
            trace!(?stage, delta, "roll hook adjusted contest");
            match stage {
                HookStage::ToolToHit | HookStage::AttackerToHit => ctx.total_roll += delta,
                HookStage::DefenderDefense | HookStage::ToolDefense => ctx.defense_value += delta,
                HookStage::ToolNaturalHit
                | HookStage::AttackerNaturalHit
                | HookStage::DefenderNaturalHit => ctx.natural_hit_bonus += delta,
            }
        }
    }
}

/// Resolve with no hooks installed.
pub fn resolve(
    attacker: &CombatantProfile,
    defender: &CombatantProfile,
    tool: Option<&ToolProfile>,
    rng: &mut impl RollSource,
) -> Result<ContestOutcome, ContestError> {
    ContestResolver::new().resolve(attacker, defender, tool, rng)
}
