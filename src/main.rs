//! Legends of Valor - Entry Point
//!
//! Interactive console match: pick a party, then type one command per
//! hero turn. Set `RUST_LOG` to see engine logging.

use crossterm::style::{Color, Stylize};
use legends_valor::battle::render::{glyph_rows, unit_listing};
use legends_valor::battle::{
    new_match, parse_command, ActionError, CellGlyph, CommandSource, HeroCommand, Market,
    TurnPrompt, COLS, HERO_NEXUS_ROW, MONSTER_NEXUS_ROW,
};
use legends_valor::core::types::HeroId;
use legends_valor::core::{MatchConfig, Result};
use legends_valor::units::{Combatant, Hero, UnitCatalog};

use std::io::{self, BufRead, Write};

fn colored_board(prompt: &TurnPrompt<'_>) -> String {
    let mut out = String::from("   ");
    for col in 0..COLS {
        out.push_str(&format!(" {}", col));
    }
    out.push('\n');
    for (row, glyphs) in glyph_rows(prompt.field).iter().enumerate() {
        out.push_str(&format!("{:>2} ", row));
        for glyph in glyphs {
            let symbol = glyph.symbol().to_string();
            let styled = match glyph {
                CellGlyph::Contested { .. } => symbol.with(Color::Yellow).bold(),
                CellGlyph::Hero(id) if *id == prompt.hero => symbol.with(Color::Cyan).bold(),
                CellGlyph::Hero(_) => symbol.with(Color::Cyan),
                CellGlyph::Monster(_) => symbol.with(Color::Red),
                CellGlyph::Terrain(_) if row as i32 == MONSTER_NEXUS_ROW => symbol.with(Color::DarkRed),
                CellGlyph::Terrain(_) if row as i32 == HERO_NEXUS_ROW => symbol.with(Color::DarkBlue),
                CellGlyph::Terrain(_) => symbol.with(Color::Grey),
            };
            out.push_str(&format!(" {}", styled));
        }
        out.push('\n');
    }
    out
}

fn print_help() {
    println!("Commands:");
    for (usage, meaning) in HeroCommand::HELP {
        println!("  {:<16} - {}", usage, meaning);
    }
    println!("  {:<16} - {}", "H", "show this help");
    println!("  {:<16} - {}", "I", "show hero details");
}

fn print_hero(hero: &Hero) {
    println!(
        "{} (level {}) HP {}/{} MP {}/{} gold {}",
        hero.name,
        hero.level(),
        hero.hp(),
        hero.max_hp(),
        hero.mp(),
        hero.max_mp(),
        hero.gold
    );
    println!(
        "  STR {:.0} DEX {:.0} AGI {:.0}",
        hero.strength(),
        hero.dexterity(),
        hero.agility()
    );
    if let Some(w) = hero.weapon() {
        println!("  weapon: {} ({} dmg)", w.name, w.damage);
    }
    if let Some(a) = hero.armor() {
        println!("  armor: {} ({} reduction)", a.name, a.damage_reduction);
    }
    for (i, spell) in hero.spells().iter().enumerate() {
        println!("  spell {}: {} ({} dmg, {} mp)", i + 1, spell.name, spell.damage, spell.mana_cost);
    }
    for (i, potion) in hero.potions().iter().enumerate() {
        println!("  potion {}: {} (+{})", i + 1, potion.name, potion.amount);
    }
}

/// Reads hero commands from stdin, re-prompting on malformed input
struct ConsoleInput<R> {
    reader: R,
}

impl<R: BufRead> CommandSource for ConsoleInput<R> {
    fn next_command(&mut self, prompt: &TurnPrompt<'_>) -> HeroCommand {
        println!();
        print!("{}", colored_board(prompt));
        for line in unit_listing(prompt.field) {
            println!("  {}", line);
        }
        let name = prompt
            .field
            .roster
            .hero(prompt.hero)
            .map(|h| h.name.clone())
            .unwrap_or_default();

        loop {
            print!("[round {}] {} > ", prompt.round, name);
            let _ = io::stdout().flush();

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) | Err(_) => return HeroCommand::Quit,
                Ok(_) => {}
            }
            match line.trim().to_ascii_uppercase().as_str() {
                "" => continue,
                "H" | "?" => {
                    print_help();
                    continue;
                }
                "I" => {
                    if let Some(hero) = prompt.field.roster.hero(prompt.hero) {
                        print_hero(hero);
                    }
                    continue;
                }
                _ => {}
            }
            match parse_command(&line) {
                Ok(command) => return command,
                Err(err) => println!("{}", format!("Invalid input: {}", err).with(Color::Red)),
            }
        }
    }

    fn rejected(&mut self, _hero: HeroId, reason: &ActionError) {
        println!("{}", format!("Cannot do that: {}", reason).with(Color::Red));
    }
}

/// Read-only shop counter: shows the hero's purse and gear
struct ConsoleMarket;

impl Market for ConsoleMarket {
    fn open_for(&mut self, hero: &mut Hero) {
        println!("{}", "=== Market ===".with(Color::Yellow));
        print_hero(hero);
        println!("Nothing is for sale today.");
    }
}

fn read_party(catalog: &UnitCatalog, max: usize) -> Result<Vec<Hero>> {
    println!("Available heroes:");
    for (i, t) in catalog.heroes.iter().enumerate() {
        println!(
            "  {}. {} (level {}, STR {:.0} DEX {:.0} AGI {:.0})",
            i + 1,
            t.name,
            t.level,
            t.strength,
            t.dexterity,
            t.agility
        );
    }
    print!("Choose up to {} heroes by name, comma-separated (blank for all): ", max);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let mut names: Vec<String> = line
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if names.is_empty() {
        names = catalog.heroes.iter().map(|t| t.name.clone()).collect();
    }
    names.truncate(max);
    catalog.build_party(&names)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "legends_valor=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    tracing::info!("Legends of Valor starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    let catalog = UnitCatalog::builtin();

    println!("\n=== LEGENDS OF VALOR ===");
    println!("Reach the monsters' nexus (row 0) before they reach yours (row 7).");
    println!();
    print_help();
    println!();

    let party = read_party(&catalog, config.max_party_size)?;
    let mut manager = new_match(config, party, None, Box::new(catalog))?;
    manager.set_market(Box::new(ConsoleMarket));

    let stdin = io::stdin();
    let mut input = ConsoleInput {
        reader: stdin.lock(),
    };
    let mut logged = manager.log().len();
    while !manager.is_finished() {
        manager.play_round(&mut input);
        for event in manager.log().events.iter().skip(logged) {
            println!("  {}", event.description);
        }
        logged = manager.log().len();
    }

    let summary = manager.summary();
    println!();
    println!("{}", format!("=== {} ===", summary.outcome).bold());
    println!("Rounds: {}  Score: {}", summary.rounds, summary.score);
    for hero in &summary.heroes {
        println!(
            "  {}: {} kills, {} faints, {} damage dealt, {} taken",
            hero.name, hero.kills, hero.faints, hero.damage_dealt, hero.damage_taken
        );
    }
    Ok(())
}
