use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use encoding_rs::Encoding;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::content::{builtin_combatants, builtin_matchups, builtin_tools, Embedded, Format};
use crate::hooks::FlatModifier;
use crate::{CombatantProfile, ContestOutcome, ContestResolver, Dice, ToolProfile, Verdict};

/// One attacker/defender/tool matchup. Each side is given inline or by
/// built-in id; inline wins when both are present. No tool means unarmed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContestConfig {
    #[serde(default)]
    pub attacker: Option<CombatantProfile>,
    #[serde(default)]
    pub attacker_id: Option<String>,
    #[serde(default)]
    pub defender: Option<CombatantProfile>,
    #[serde(default)]
    pub defender_id: Option<String>,
    #[serde(default)]
    pub tool: Option<ToolProfile>,
    #[serde(default)]
    pub tool_id: Option<String>,
    #[serde(default)]
    pub seed: u64,
    /// Situational modifiers, run as roll hooks in stage order.
    #[serde(default)]
    pub modifiers: Vec<FlatModifier>,
}

impl ContestConfig {
    /// Load a JSON or YAML config (picked by extension). A leading byte-order
    /// mark selects the text encoding; otherwise the file must be UTF-8.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_text_auto(path)
            .with_context(|| format!("failed to read contest config: {}", path.display()))?;
        Self::parse(&text, Format::from_path(&path.to_string_lossy()))
            .with_context(|| format!("failed to parse contest config: {}", path.display()))
    }

    pub fn parse(text: &str, format: Format) -> Result<Self> {
        parse_as(text, format)
    }

    pub fn builtin(id: &str) -> Result<Self> {
        let embedded = lookup(&builtin_matchups(), "matchup", id)?;
        parse_as(embedded.text, embedded.format)
            .with_context(|| format!("built-in matchup '{}' is malformed", id))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContestReport {
    pub verdict: Verdict,
    pub outcome: ContestOutcome,
    pub log: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ContestStats {
    pub samples: u32,
    pub hits: u32,
    pub autohits: u32,
    pub misses: u32,
    pub fumbles: u32,
    pub hit_rate: f64,
    pub fumble_rate: f64,
}

struct Matchup {
    attacker: CombatantProfile,
    defender: CombatantProfile,
    tool: Option<ToolProfile>,
    resolver: ContestResolver,
}

impl Matchup {
    fn from_config(cfg: &ContestConfig) -> Result<Self> {
        let combatants = builtin_combatants();
        let attacker = pick(&cfg.attacker, cfg.attacker_id.as_deref(), &combatants, "combatant")?
            .ok_or_else(|| anyhow::anyhow!("config has no attacker"))?;
        let defender = pick(&cfg.defender, cfg.defender_id.as_deref(), &combatants, "combatant")?
            .ok_or_else(|| anyhow::anyhow!("config has no defender"))?;
        let tool = pick(&cfg.tool, cfg.tool_id.as_deref(), &builtin_tools(), "tool")?;
        let resolver = cfg
            .modifiers
            .iter()
            .fold(ContestResolver::new(), |r, m| r.with_hook(*m));
        Ok(Self { attacker, defender, tool, resolver })
    }

    fn resolve(&self, dice: &mut Dice) -> Result<ContestOutcome> {
        let outcome = self
            .resolver
            .resolve(&self.attacker, &self.defender, self.tool.as_ref(), dice)?;
        Ok(outcome)
    }
}

pub fn simulate_contest(cfg: ContestConfig) -> Result<ContestReport> {
    let matchup = Matchup::from_config(&cfg)?;
    let mut dice = Dice::from_seed(cfg.seed);
    let outcome = matchup.resolve(&mut dice)?;

    let mut log = vec![format!(
        "[CONTEST] {} with {} vs {} (DV {})",
        matchup.attacker.name,
        matchup.tool.as_ref().map_or("bare hands", |t| t.label.as_str()),
        matchup.defender.name,
        matchup.defender.defense_value
    )];
    log.extend(describe_outcome(&matchup.attacker, &outcome));

    Ok(ContestReport {
        verdict: outcome.verdict(),
        outcome,
        log,
    })
}

/// Run `samples` contests; sample `i` uses seed `cfg.seed + i`.
pub fn simulate_contest_many(cfg: ContestConfig, samples: u32) -> Result<ContestStats> {
    let matchup = Matchup::from_config(&cfg)?;
    let mut stats = ContestStats {
        samples,
        ..ContestStats::default()
    };

    for i in 0..samples {
        let mut dice = Dice::from_seed(cfg.seed.wrapping_add(i as u64));
        let outcome = matchup.resolve(&mut dice)?;
        match outcome.verdict() {
            Verdict::Hit => stats.hits += 1,
            Verdict::Miss => stats.misses += 1,
            Verdict::Fumble => stats.fumbles += 1,
        }
        if outcome.autohit {
            stats.autohits += 1;
        }
    }

    if samples > 0 {
        stats.hit_rate = stats.hits as f64 / samples as f64;
        stats.fumble_rate = stats.fumbles as f64 / samples as f64;
    }
    Ok(stats)
}

pub fn builtin_combatant(id: &str) -> Result<CombatantProfile> {
    let embedded = lookup(&builtin_combatants(), "combatant", id)?;
    parse_as(embedded.text, embedded.format)
        .with_context(|| format!("built-in combatant '{}' is malformed", id))
}

/// Log lines for one outcome, from the attacker's point of view.
pub fn describe_outcome(attacker: &CombatantProfile, outcome: &ContestOutcome) -> Vec<String> {
    let result = if outcome.autohit {
        "AUTOHIT ✔"
    } else if outcome.hit {
        "HIT ✔"
    } else {
        "MISS ✖"
    };
    let mut lines = vec![format!(
        "[ATTACK][{}] d20={} total={} vs DV={} → {}",
        attacker.name, outcome.natural_roll, outcome.total_roll, outcome.defense_value, result
    )];
    if let Some(roll) = outcome.fumble_roll {
        lines.push(format!(
            "[FUMBLE][{}] d20={} {} vs margin={} → {}",
            attacker.name,
            roll,
            format_modifier(attacker.agility_modifier),
            outcome.margin,
            if outcome.fumble { "FUMBLE" } else { "RECOVERED" }
        ));
    }
    lines
}

fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        format!("-{}", modifier.unsigned_abs())
    }
}

fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

pub fn builtin_tool(id: &str) -> Result<ToolProfile> {
    let embedded = lookup(&builtin_tools(), "tool", id)?;
    parse_as(embedded.text, embedded.format)
        .with_context(|| format!("built-in tool '{}' is malformed", id))
}

fn parse_as<T: DeserializeOwned>(text: &str, format: Format) -> Result<T> {
    let value = match format {
        Format::Json => serde_json::from_str(text)?,
        Format::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(value)
}

fn lookup(registry: &IndexMap<&'static str, Embedded>, kind: &str, id: &str) -> Result<Embedded> {
    match registry.get(id) {
        Some(embedded) => Ok(*embedded),
        None => bail!(
            "unknown {} '{}' (known: {})",
            kind,
            id,
            registry.keys().copied().collect::<Vec<_>>().join(", ")
        ),
    }
}

fn pick<T: Clone + DeserializeOwned>(
    inline: &Option<T>,
    id: Option<&str>,
    registry: &IndexMap<&'static str, Embedded>,
    kind: &str,
) -> Result<Option<T>> {
    if let Some(value) = inline {
        return Ok(Some(value.clone()));
    }
    let Some(id) = id else {
        return Ok(None);
    };
    let embedded = lookup(registry, kind, id)?;
    let value = parse_as(embedded.text, embedded.format)
        .with_context(|| format!("built-in {} '{}' is malformed", kind, id))?;
    Ok(Some(value))
}
