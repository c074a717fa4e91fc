use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::contest::{ContestError, ContestOutcome, ContestResolver, Verdict};
use crate::profile::{CombatantProfile, ToolProfile};
use crate::RollSource;

pub const ENERGY_COST: u32 = 1000;
pub const EXPERTISE_ENERGY_COST: u32 = 750;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityError {
    #[error("You are frozen!")]
    Frozen,
    #[error("Equip at least one usable injector in a hand!")]
    NoInjectors,
    #[error("No valid target!")]
    NoValidTarget,
    #[error(transparent)]
    Contest(#[from] ContestError),
}

/// Something standing in the chosen direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub profile: CombatantProfile,
    pub hostile: bool,
}

pub struct InjectorRequest<'a> {
    pub user: &'a CombatantProfile,
    pub frozen: bool,
    pub injectors: &'a [ToolProfile],
    pub candidates: &'a [Candidate],
    /// The target has hostiles nearby, so every injection needs a to-hit contest.
    pub hostiles_nearby: bool,
    pub short_blades_expertise: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionResult {
    /// Caller should apply the injector's tonic to the target.
    Applied,
    Missed,
    /// Caller should unequip and drop the injector.
    Dropped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionAttempt {
    pub injector: String,
    pub result: InjectionResult,
    /// None when no contest was needed.
    pub contest: Option<ContestOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectorReport {
    pub target: String,
    pub attempts: Vec<InjectionAttempt>,
    pub energy_cost: u32,
}

impl InjectorReport {
    pub fn applied(&self) -> impl Iterator<Item = &InjectionAttempt> {
        self.attempts
            .iter()
            .filter(|a| a.result == InjectionResult::Applied)
    }

    pub fn dropped(&self) -> impl Iterator<Item = &InjectionAttempt> {
        self.attempts
            .iter()
            .filter(|a| a.result == InjectionResult::Dropped)
    }
}

pub fn energy_cost(short_blades_expertise: bool) -> u32 {
    if short_blades_expertise {
        EXPERTISE_ENERGY_COST
    } else {
        ENERGY_COST
    }
}

/// Work out what happens when the user applies each held injector to the first
/// friendly candidate. Item drops, tonic effects and energy spending are left
/// to the caller; `log` receives the player-facing messages.
pub fn apply_injectors(
    resolver: &ContestResolver,
    request: InjectorRequest<'_>,
    rng: &mut impl RollSource,
    mut log: impl FnMut(String),
) -> Result<InjectorReport, AbilityError> {
    if request.frozen {
        return Err(AbilityError::Frozen);
    }
    if request.injectors.is_empty() {
        return Err(AbilityError::NoInjectors);
    }
    let target = request
        .candidates
        .iter()
        .find(|c| !c.hostile)
        .map(|c| &c.profile)
        .ok_or(AbilityError::NoValidTarget)?;

    let mut attempts = Vec::with_capacity(request.injectors.len());
    for injector in request.injectors {
        let contest = if request.hostiles_nearby {
            Some(resolver.resolve(request.user, target, Some(injector), rng)?)
        } else {
            None
        };

        let result = match contest.map(|c| c.verdict()) {
            Some(Verdict::Fumble) => {
                log(format!("[INJECT] You miss, dropping the {}!", injector.label));
                InjectionResult::Dropped
            }
            Some(Verdict::Miss) => {
                log(format!("[INJECT] You miss with the {}!", injector.label));
                InjectionResult::Missed
            }
            Some(Verdict::Hit) | None => {
                log(format!(
                    "[INJECT] You apply the {} to {}.",
                    injector.label, target.name
                ));
                InjectionResult::Applied
            }
        };
        attempts.push(InjectionAttempt {
            injector: injector.label.clone(),
            result,
            contest,
        });
    }

    let energy_cost = energy_cost(request.short_blades_expertise);
    info!(
        user = %request.user.name,
        target = %target.name,
        injectors = attempts.len(),
        energy_cost,
        "injector ability used"
    );

    Ok(InjectorReport {
        target: target.name.clone(),
        attempts,
        energy_cost,
    })
}
