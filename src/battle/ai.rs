//! Default monster behavior
//!
//! Priority: attack the first hero in range, else step south, else step
//! sideways (direction order shuffled per decision), else hold.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::battle::combat::{attack_range_of, basic_attack, AttackOutcome};
use crate::battle::field::Battlefield;
use crate::battle::movement::move_unit;
use crate::core::types::{Direction, HeroId, MonsterId, UnitRef};
use crate::stats::StatsSink;

/// What a monster did with its action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterAction {
    Attacked { hero: HeroId, outcome: AttackOutcome },
    Moved(Direction),
    Held,
}

/// Run one monster's action for the defender phase
pub fn take_monster_turn(
    field: &mut Battlefield,
    monster: MonsterId,
    rng: &mut dyn RngCore,
    stats: Option<&mut dyn StatsSink>,
) -> MonsterAction {
    let unit = UnitRef::Monster(monster);

    let first_target = attack_range_of(field, unit)
        .into_iter()
        .find_map(|target| match target {
            UnitRef::Hero(hero) => Some(hero),
            UnitRef::Monster(_) => None,
        });
    if let Some(hero) = first_target {
        match basic_attack(field, unit, UnitRef::Hero(hero), rng, stats) {
            Ok(outcome) => return MonsterAction::Attacked { hero, outcome },
            Err(reason) => tracing::debug!(?monster, %reason, "monster attack failed"),
        }
    }

    if move_unit(field, unit, Direction::South) {
        return MonsterAction::Moved(Direction::South);
    }

    let mut laterals = [Direction::West, Direction::East];
    laterals.shuffle(rng);
    for dir in laterals {
        if move_unit(field, unit, dir) {
            return MonsterAction::Moved(dir);
        }
    }

    tracing::debug!(?monster, "monster holds position");
    MonsterAction::Held
}
