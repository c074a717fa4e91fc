use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use contest_engine::api::{
    builtin_combatant, builtin_tool, describe_outcome, simulate_contest, simulate_contest_many,
    ContestConfig,
};
use contest_engine::content::{builtin_combatants, builtin_matchups, builtin_tools};
use contest_engine::{
    apply_injectors, resolve, Candidate, CombatantProfile, ContestResolver, Dice, InjectorRequest,
    RollSource, ToolProfile,
};
use tracing::Level;

#[derive(Subcommand)]
enum Cmd {
    /// Roll a d20 multiple times
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Resolve one contest from explicit numbers
    Resolve {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Attacker flat hit bonus
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        hit_bonus: i32,
        /// Attacker agility modifier
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        agility: i32,
        /// Tool hit bonus; omit for an unarmed attempt
        #[arg(long, allow_hyphen_values = true)]
        tool_bonus: Option<i32>,
        /// Defender defense value (must be >= 0)
        #[arg(long, allow_hyphen_values = true)]
        dv: i32,
        /// Attacker natural hit bonus
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        attacker_natural: i32,
        /// Defender natural hit bonus
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        defender_natural: i32,
        /// Print the outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run a matchup once, or many times with --samples
    Simulate {
        /// Path to a JSON or YAML contest config
        #[arg(long, conflicts_with = "builtin")]
        config: Option<PathBuf>,
        /// Built-in matchup id (see `list`)
        #[arg(long)]
        builtin: Option<String>,
        /// Override the config seed
        #[arg(long)]
        seed: Option<u64>,
        /// Number of samples; sample i uses seed+i
        #[arg(long)]
        samples: Option<u32>,
        /// Print JSON instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Apply held injectors to a friendly target
    Inject {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Built-in combatant applying the injectors
        #[arg(long, default_value = "medic")]
        user: String,
        /// Built-in combatant receiving them
        #[arg(long, default_value = "snapjaw")]
        target: String,
        /// Built-in tool id, one per held injector (see `list`)
        #[arg(long = "injector", default_value = "injector")]
        injectors: Vec<String>,
        /// The target is hostile to the user
        #[arg(long, default_value_t = false)]
        hostile_target: bool,
        /// Hostiles are nearby, so each injection needs a to-hit roll
        #[arg(long, default_value_t = false)]
        hostiles_nearby: bool,
        /// User has short blades expertise
        #[arg(long, default_value_t = false)]
        expertise: bool,
        /// User is frozen
        #[arg(long, default_value_t = false)]
        frozen: bool,
    },
    /// List built-in content ids
    List,
}

#[derive(Parser)]
#[command(name = "contest-cli")]
#[command(about = "Melee contest resolver harness")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(config: Option<PathBuf>, builtin: Option<String>) -> anyhow::Result<ContestConfig> {
    match (config, builtin) {
        (Some(path), _) => ContestConfig::from_path(path),
        (None, Some(id)) => ContestConfig::builtin(&id),
        (None, None) => anyhow::bail!("pass --config PATH or --builtin ID"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Roll { seed, rolls } => {
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", dice.d20());
            }
        }
        Cmd::Resolve {
            seed,
            hit_bonus,
            agility,
            tool_bonus,
            dv,
            attacker_natural,
            defender_natural,
            json,
        } => {
            let attacker = CombatantProfile {
                hit_bonus,
                agility_modifier: agility,
                natural_hit_bonus: attacker_natural,
                ..CombatantProfile::named("attacker")
            };
            let defender = CombatantProfile {
                defense_value: dv,
                natural_hit_bonus: defender_natural,
                ..CombatantProfile::named("defender")
            };
            let tool = tool_bonus.map(|b| ToolProfile::new("tool", b));
            let mut dice = Dice::from_seed(seed);
            let outcome = resolve(&attacker, &defender, tool.as_ref(), &mut dice)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                for line in describe_outcome(&attacker, &outcome) {
                    println!("{}", line);
                }
            }
        }
        Cmd::Simulate {
            config,
            builtin,
            seed,
            samples,
            json,
        } => {
            let mut cfg = load_config(config, builtin)?;
            if let Some(seed) = seed {
                cfg.seed = seed;
            }
            match samples {
                Some(samples) => {
                    let stats = simulate_contest_many(cfg, samples)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    } else {
                        println!("samples:      {}", stats.samples);
                        println!("hits:         {} ({} autohits)", stats.hits, stats.autohits);
                        println!("misses:       {}", stats.misses);
                        println!("fumbles:      {}", stats.fumbles);
                        println!("hit rate:     {:.1}%", stats.hit_rate * 100.0);
                        println!("fumble rate:  {:.1}%", stats.fumble_rate * 100.0);
                    }
                }
                None => {
                    let report = simulate_contest(cfg)?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    } else {
                        for line in &report.log {
                            println!("{}", line);
                        }
                    }
                }
            }
        }
        Cmd::Inject {
            seed,
            user,
            target,
            injectors,
            hostile_target,
            hostiles_nearby,
            expertise,
            frozen,
        } => {
            let user = builtin_combatant(&user)?;
            let candidates = [Candidate {
                profile: builtin_combatant(&target)?,
                hostile: hostile_target,
            }];
            let injectors = injectors
                .iter()
                .map(|id| builtin_tool(id))
                .collect::<anyhow::Result<Vec<ToolProfile>>>()?;
            let request = InjectorRequest {
                user: &user,
                frozen,
                injectors: &injectors,
                candidates: &candidates,
                hostiles_nearby,
                short_blades_expertise: expertise,
            };
            let mut dice = Dice::from_seed(seed);
            let report = apply_injectors(&ContestResolver::new(), request, &mut dice, |msg| {
                println!("{}", msg)
            })?;
            println!("[ENERGY][{}] -{}", user.name, report.energy_cost);
        }
        Cmd::List => {
            println!("matchups:   {}", join_keys(builtin_matchups().keys()));
            println!("combatants: {}", join_keys(builtin_combatants().keys()));
            println!("tools:      {}", join_keys(builtin_tools().keys()));
        }
    }
    Ok(())
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a &'static str>) -> String {
    keys.copied().collect::<Vec<_>>().join(", ")
}
