//! Headless Match Runner
//!
//! Plays a full match with the autopilot driving every hero and prints
//! the match summary.

use clap::Parser;
use legends_valor::battle::{new_match, render_board, Autopilot};
use legends_valor::core::{MatchConfig, Result, ValorError};
use legends_valor::core::types::Lane;
use legends_valor::units::UnitCatalog;

/// Headless match runner - autopilot heroes against the monster AI
#[derive(Parser, Debug)]
#[command(name = "valor_sim")]
#[command(about = "Run an autopilot match and output the summary")]
struct Args {
    /// Match config TOML (defaults apply when omitted)
    #[arg(long)]
    config: Option<String>,

    /// Unit catalog TOML (built-in heroes and monsters when omitted)
    #[arg(long)]
    catalog: Option<String>,

    /// Comma-separated hero template names
    #[arg(long, default_value = "Gaerdal,Segojan,Rillifane")]
    heroes: String,

    /// Comma-separated home lanes (top, mid, bot), one per hero
    #[arg(long)]
    lanes: Option<String>,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum rounds before the match is aborted (overrides the config)
    #[arg(long, default_value_t = 200)]
    max_rounds: u32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the board and combat log to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_lanes(list: &str) -> Result<Vec<Lane>> {
    split_list(list)
        .iter()
        .map(|name| {
            Lane::from_name(name)
                .ok_or_else(|| ValorError::InvalidParty(format!("unknown lane '{}'", name)))
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legends_valor=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.max_rounds = Some(args.max_rounds);

    let catalog = match &args.catalog {
        Some(path) => UnitCatalog::load(path)?,
        None => UnitCatalog::builtin(),
    };
    let party = catalog.build_party(&split_list(&args.heroes))?;
    let lanes = args.lanes.as_deref().map(parse_lanes).transpose()?;

    let mut manager = new_match(config, party, lanes.as_deref(), Box::new(catalog))?;
    if args.verbose {
        eprintln!("=== Match Started (seed {}) ===", manager.seed());
        eprint!("{}", render_board(manager.field()));
    }

    let mut pilot = Autopilot;
    let mut logged = 0;
    while !manager.is_finished() {
        manager.play_round(&mut pilot);
        if args.verbose {
            eprintln!("=== Round {} ===", manager.round());
            for event in manager.log().events.iter().skip(logged) {
                eprintln!("  [{}] {:?}: {}", event.round, event.event_type, event.description);
            }
            logged = manager.log().len();
            eprint!("{}", render_board(manager.field()));
        }
    }

    let summary = manager.summary();
    match args.format.as_str() {
        "text" => {
            println!("Match Result");
            println!("============");
            println!("Outcome: {:?}", summary.outcome);
            println!("Rounds: {}", summary.rounds);
            println!("Score: {}", summary.score);
            for hero in &summary.heroes {
                println!(
                    "  {}: {} kills, {} faints, {} dealt, {} taken",
                    hero.name, hero.kills, hero.faints, hero.damage_dealt, hero.damage_taken
                );
            }
            println!("Seed: {}", summary.seed);
        }
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
