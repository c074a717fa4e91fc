use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod contest;
pub mod content;
pub mod hooks;
pub mod injector;
pub mod profile;

pub use contest::{resolve, ContestError, ContestOutcome, ContestResolver, Verdict};
pub use hooks::{FlatModifier, HookStage, RollContext, RollHook};
pub use injector::{
    apply_injectors, energy_cost, AbilityError, Candidate, InjectionAttempt, InjectionResult,
    InjectorReport, InjectorRequest,
};
pub use profile::{agility_modifier_from_score, CombatantProfile, ToolProfile};

/// A source of uniform integers over an inclusive range.
///
/// Implementations must return a value in `low..=high`. The resolver relies on
/// this for its `1..=20` natural roll and checks it with a debug assertion.
pub trait RollSource {
    fn uniform(&mut self, low: i32, high: i32) -> i32;

    fn d20(&mut self) -> i32 {
        self.uniform(1, 20)
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { rolls: VecDeque<i32>, played: Vec<i32> },
}

pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    /// Dice that return `rolls` in order, then start over from the first one.
    ///
    /// A scripted value outside the requested range wraps around into it, so
    /// a scripted 25 on a d20 reads as 5.
    pub fn from_scripted(rolls: Vec<i32>) -> Self {
        Self {
            source: Source::Scripted { rolls: rolls.into(), played: Vec::new() },
        }
    }
}

impl RollSource for Dice {
    fn uniform(&mut self, low: i32, high: i32) -> i32 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(low..=high),
            Source::Scripted { rolls, played } => {
                if rolls.is_empty() {
                    rolls.extend(played.drain(..));
                }
                match rolls.pop_front() {
                    Some(roll) => {
                        played.push(roll);
                        fold_into(roll, low, high)
                    }
                    // Empty script: behave like a die that always shows its lowest face.
                    None => low,
                }
            }
        }
    }
}

fn fold_into(roll: i32, low: i32, high: i32) -> i32 {
    if (low..=high).contains(&roll) {
        return roll;
    }
    let span = i64::from(high) - i64::from(low) + 1;
    let offset = (i64::from(roll) - i64::from(low)).rem_euclid(span);
    // offset < span, so low + offset <= high fits in i32
    (i64::from(low) + offset) as i32
}
