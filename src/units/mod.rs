//! Units: heroes, monsters, their items and the per-match roster
//!
//! The battle core only sees units through [`Combatant`] and the
//! concrete accessors on [`Hero`] and [`Monster`]; positions live on the
//! board, never on the unit.

pub mod catalog;
pub mod hero;
pub mod items;
pub mod monster;
pub mod roster;

pub use catalog::{HeroTemplate, MonsterFactory, MonsterTemplate, UnitCatalog};
pub use hero::{Attributes, Hero};
pub use items::{Armor, Item, ItemKind, Potion, PotionStat, Spell, SpellElement, Weapon};
pub use monster::Monster;
pub use roster::Roster;

use serde::{Deserialize, Serialize};

/// An attribute a terrain tile can boost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Dexterity,
    Agility,
}

/// The read/write surface the battle core needs from any unit
pub trait Combatant {
    fn name(&self) -> &str;

    fn level(&self) -> u32;

    fn hp(&self) -> i32;

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    /// Probability in [0, 1] that an incoming attack or spell is evaded
    fn dodge_chance(&self) -> f64;

    /// Apply incoming damage after the unit's own mitigation.
    ///
    /// HP never drops below zero. Returns the HP actually lost.
    fn apply_damage(&mut self, amount: i32) -> i32;

    /// Start a terrain bonus of `fraction` on `stat`, replacing any
    /// bonus already active. Units without boostable stats ignore it.
    fn enter_terrain(&mut self, _stat: Stat, _fraction: f64) {}

    /// Drop the active terrain bonus, if any
    fn leave_terrain(&mut self) {}
}
