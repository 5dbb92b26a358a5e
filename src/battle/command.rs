//! Hero command vocabulary and text parsing
//!
//! One line of input is one command. Directions use the W/A/S/D keys
//! (or full compass names). Item and target numbers are 1-based as typed
//! and stored 0-based.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::core::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

/// Everything a hero can do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroCommand {
    Move(Direction),
    /// Basic attack; `None` picks the first enemy in range
    Attack { target: Option<usize> },
    CastSpell { spell: usize, target: Option<usize> },
    UsePotion(usize),
    Equip { slot: EquipSlot, index: usize },
    /// Jump next to the ally with party index `ally`. `side` picks the
    /// cell beside the ally; `None` takes the first legal one.
    Teleport { ally: usize, side: Option<Direction> },
    Recall,
    RemoveObstacle(Direction),
    OpenMarket,
    Wait,
    Quit,
}

impl HeroCommand {
    /// Usage line for each command, for help output
    pub const HELP: &'static [(&'static str, &'static str)] = &[
        ("W/A/S/D", "move north/west/south/east"),
        ("F [n]", "attack enemy n in range (default: first)"),
        ("C <spell> [n]", "cast spell on enemy n in range"),
        ("P <n>", "drink potion n"),
        ("E <W|A> <n>", "equip weapon or armor n"),
        ("T <hero> [dir]", "teleport beside another hero"),
        ("R", "recall to your home nexus"),
        ("O <dir>", "remove an adjacent obstacle"),
        ("M", "open the market (on your nexus)"),
        ("N", "wait"),
        ("Q", "quit the match"),
    ];
}

/// Malformed command input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a positive number")]
    InvalidNumber(String),

    #[error("'{0}' is not a direction")]
    InvalidDirection(String),

    #[error("'{0}' is not an equipment slot (W or A)")]
    InvalidSlot(String),
}

fn parse_direction(token: &str) -> Result<Direction, CommandParseError> {
    let dir = match token.to_ascii_uppercase().as_str() {
        "W" => Some(Direction::North),
        "A" => Some(Direction::West),
        "S" => Some(Direction::South),
        "D" => Some(Direction::East),
        word if word.len() > 1 => Direction::from_compass(word),
        _ => None,
    };
    dir.ok_or_else(|| CommandParseError::InvalidDirection(token.to_string()))
}

/// 1-based number as typed to 0-based index
fn parse_index(token: &str) -> Result<usize, CommandParseError> {
    match token.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandParseError::InvalidNumber(token.to_string())),
    }
}

fn required<'a>(
    token: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandParseError> {
    token.ok_or(CommandParseError::MissingArgument { command, argument })
}

pub fn parse_command(input: &str) -> Result<HeroCommand, CommandParseError> {
    let mut tokens = input.split_whitespace();
    let head = tokens.next().ok_or(CommandParseError::Empty)?;
    let arg1 = tokens.next();
    let arg2 = tokens.next();

    let command = match head.to_ascii_uppercase().as_str() {
        "W" | "A" | "S" | "D" => HeroCommand::Move(parse_direction(head)?),
        "F" => HeroCommand::Attack {
            target: arg1.map(parse_index).transpose()?,
        },
        "C" => HeroCommand::CastSpell {
            spell: parse_index(required(arg1, "C", "a spell number")?)?,
            target: arg2.map(parse_index).transpose()?,
        },
        "P" => HeroCommand::UsePotion(parse_index(required(arg1, "P", "a potion number")?)?),
        "E" => {
            let slot_token = required(arg1, "E", "a slot (W or A)")?;
            let slot = match slot_token.to_ascii_uppercase().as_str() {
                "W" | "WEAPON" => EquipSlot::Weapon,
                "A" | "ARMOR" => EquipSlot::Armor,
                _ => return Err(CommandParseError::InvalidSlot(slot_token.to_string())),
            };
            HeroCommand::Equip {
                slot,
                index: parse_index(required(arg2, "E", "an item number")?)?,
            }
        }
        "T" => HeroCommand::Teleport {
            ally: parse_index(required(arg1, "T", "a hero number")?)?,
            side: arg2.map(parse_direction).transpose()?,
        },
        "R" => HeroCommand::Recall,
        "O" => HeroCommand::RemoveObstacle(parse_direction(required(arg1, "O", "a direction")?)?),
        "M" => HeroCommand::OpenMarket,
        "N" => HeroCommand::Wait,
        "Q" => HeroCommand::Quit,
        _ => return Err(CommandParseError::UnknownCommand(head.to_string())),
    };
    Ok(command)
}

impl FromStr for HeroCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}

impl fmt::Display for HeroCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeroCommand::Move(dir) => write!(f, "move {}", dir),
            HeroCommand::Attack { target: Some(t) } => write!(f, "attack #{}", t + 1),
            HeroCommand::Attack { target: None } => write!(f, "attack"),
            HeroCommand::CastSpell { spell, .. } => write!(f, "cast spell #{}", spell + 1),
            HeroCommand::UsePotion(i) => write!(f, "use potion #{}", i + 1),
            HeroCommand::Equip { slot, index } => write!(f, "equip {:?} #{}", slot, index + 1),
            HeroCommand::Teleport { ally, .. } => write!(f, "teleport to hero #{}", ally + 1),
            HeroCommand::Recall => write!(f, "recall"),
            HeroCommand::RemoveObstacle(dir) => write!(f, "remove obstacle {}", dir),
            HeroCommand::OpenMarket => write!(f, "open market"),
            HeroCommand::Wait => write!(f, "wait"),
            HeroCommand::Quit => write!(f, "quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(parse_command("w"), Ok(HeroCommand::Move(Direction::North)));
        assert_eq!(parse_command("A"), Ok(HeroCommand::Move(Direction::West)));
        assert_eq!(parse_command(" s "), Ok(HeroCommand::Move(Direction::South)));
        assert_eq!(parse_command("d"), Ok(HeroCommand::Move(Direction::East)));
    }

    #[test]
    fn test_indices_are_one_based() {
        assert_eq!(parse_command("f"), Ok(HeroCommand::Attack { target: None }));
        assert_eq!(parse_command("f 2"), Ok(HeroCommand::Attack { target: Some(1) }));
        assert_eq!(
            parse_command("c 1 3"),
            Ok(HeroCommand::CastSpell {
                spell: 0,
                target: Some(2)
            })
        );
        assert_eq!(parse_command("p 0"), Err(CommandParseError::InvalidNumber("0".into())));
    }

    #[test]
    fn test_compound_commands() {
        assert_eq!(
            parse_command("e a 2"),
            Ok(HeroCommand::Equip {
                slot: EquipSlot::Armor,
                index: 1
            })
        );
        assert_eq!(
            parse_command("t 3 d"),
            Ok(HeroCommand::Teleport {
                ally: 2,
                side: Some(Direction::East)
            })
        );
        assert_eq!(
            parse_command("o north"),
            Ok(HeroCommand::RemoveObstacle(Direction::North))
        );
        assert_eq!(
            "t 1".parse::<HeroCommand>(),
            Ok(HeroCommand::Teleport { ally: 0, side: None })
        );
    }

    #[test]
    fn test_malformed_input() {
        assert_eq!(parse_command("   "), Err(CommandParseError::Empty));
        assert_eq!(
            parse_command("x"),
            Err(CommandParseError::UnknownCommand("x".into()))
        );
        assert_eq!(
            parse_command("c"),
            Err(CommandParseError::MissingArgument {
                command: "C",
                argument: "a spell number"
            })
        );
        assert_eq!(
            parse_command("e z 1"),
            Err(CommandParseError::InvalidSlot("z".into()))
        );
        assert_eq!(
            parse_command("o q"),
            Err(CommandParseError::InvalidDirection("q".into()))
        );
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(parse_command("r"), Ok(HeroCommand::Recall));
        assert_eq!(parse_command("m"), Ok(HeroCommand::OpenMarket));
        assert_eq!(parse_command("n"), Ok(HeroCommand::Wait));
        assert_eq!(parse_command("Q"), Ok(HeroCommand::Quit));
    }
}
