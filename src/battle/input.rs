//! Where hero commands come from
//!
//! The turn manager blocks on [`CommandSource::next_command`] for every
//! hero action. The console front end implements it over stdin; the
//! scripted and autopilot sources here drive tests and headless runs.

use std::collections::VecDeque;

use crate::battle::actions::ActionError;
use crate::battle::combat::attack_range_of;
use crate::battle::command::HeroCommand;
use crate::battle::field::Battlefield;
use crate::battle::movement::validate_move;
use crate::core::types::{Direction, HeroId, UnitRef};

/// Context handed to a command source when a hero is up
pub struct TurnPrompt<'a> {
    pub round: u32,
    pub hero: HeroId,
    pub field: &'a Battlefield,
}

pub trait CommandSource {
    /// Produce the next command for the prompted hero
    fn next_command(&mut self, prompt: &TurnPrompt<'_>) -> HeroCommand;

    /// Feedback when a command was refused; the same hero is asked again
    fn rejected(&mut self, _hero: HeroId, _reason: &ActionError) {}
}

/// Plays a fixed list of commands, then quits
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    queue: VecDeque<HeroCommand>,
    pub rejections: Vec<(HeroId, ActionError)>,
}

impl ScriptedCommands {
    pub fn new(commands: impl IntoIterator<Item = HeroCommand>) -> Self {
        Self {
            queue: commands.into_iter().collect(),
            rejections: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl CommandSource for ScriptedCommands {
    fn next_command(&mut self, _prompt: &TurnPrompt<'_>) -> HeroCommand {
        self.queue.pop_front().unwrap_or(HeroCommand::Quit)
    }

    fn rejected(&mut self, hero: HeroId, reason: &ActionError) {
        self.rejections.push((hero, reason.clone()));
    }
}

/// Simple hero policy: attack anything in range, else push north, else
/// sidestep, else wait. Only issues commands it has checked are legal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl CommandSource for Autopilot {
    fn next_command(&mut self, prompt: &TurnPrompt<'_>) -> HeroCommand {
        let unit = UnitRef::Hero(prompt.hero);
        if !attack_range_of(prompt.field, unit).is_empty() {
            return HeroCommand::Attack { target: None };
        }
        [Direction::North, Direction::West, Direction::East]
            .into_iter()
            .find(|dir| validate_move(prompt.field, unit, *dir).is_ok())
            .map_or(HeroCommand::Wait, HeroCommand::Move)
    }

    fn rejected(&mut self, hero: HeroId, reason: &ActionError) {
        tracing::warn!(?hero, %reason, "autopilot command rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::board::Board;
    use crate::core::types::{GridPos, MonsterId};
    use crate::units::{Attributes, Hero, Monster, Roster};

    fn field() -> Battlefield {
        let mut roster = Roster::new();
        roster.add_hero(Hero::new("H", 1, Attributes::default()));
        roster.add_monster(Monster::new("M", 1, 10.0, 0.0, 0.0));
        Battlefield::new(Board::plain(), roster)
    }

    #[test]
    fn test_script_quits_when_exhausted() {
        let f = field();
        let prompt = TurnPrompt {
            round: 1,
            hero: HeroId(0),
            field: &f,
        };
        let mut script = ScriptedCommands::new([HeroCommand::Wait]);
        assert_eq!(script.next_command(&prompt), HeroCommand::Wait);
        assert_eq!(script.next_command(&prompt), HeroCommand::Quit);
        assert_eq!(script.remaining(), 0);
    }

    #[test]
    fn test_autopilot_prefers_attack_then_north() {
        let mut f = field();
        f.place_unit(UnitRef::Hero(HeroId(0)), GridPos::new(5, 0));
        let mut pilot = Autopilot;
        let cmd = pilot.next_command(&TurnPrompt {
            round: 1,
            hero: HeroId(0),
            field: &f,
        });
        assert_eq!(cmd, HeroCommand::Move(Direction::North));

        f.place_unit(UnitRef::Monster(MonsterId(0)), GridPos::new(4, 0));
        let cmd = pilot.next_command(&TurnPrompt {
            round: 1,
            hero: HeroId(0),
            field: &f,
        });
        assert_eq!(cmd, HeroCommand::Attack { target: None });
    }
}
