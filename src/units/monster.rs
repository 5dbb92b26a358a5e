//! Monsters: the defending side

use serde::{Deserialize, Serialize};

use crate::battle::constants::{HP_PER_LEVEL, MAX_UNIT_LEVEL, MITIGATION_SCALE};
use crate::units::Combatant;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    level: u32,
    hp: i32,
    /// Base damage before the monster attack scale is applied
    pub damage: f64,
    pub defense: f64,
    dodge_chance: f64,
}

impl Monster {
    /// A monster at full HP for its level. `dodge_chance` is a probability.
    /// The level is clamped to `1..=MAX_UNIT_LEVEL`.
    pub fn new(name: impl Into<String>, level: u32, damage: f64, defense: f64, dodge_chance: f64) -> Self {
        let level = level.clamp(1, MAX_UNIT_LEVEL);
        Self {
            name: name.into(),
            level,
            hp: level as i32 * HP_PER_LEVEL,
            damage,
            defense,
            dodge_chance: dodge_chance.clamp(0.0, 1.0),
        }
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp.max(0);
        self
    }

    pub fn max_hp(&self) -> i32 {
        self.level as i32 * HP_PER_LEVEL
    }

    pub fn set_dodge_chance(&mut self, chance: f64) {
        self.dodge_chance = chance.clamp(0.0, 1.0);
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn hp(&self) -> i32 {
        self.hp
    }

    fn dodge_chance(&self) -> f64 {
        self.dodge_chance
    }

    fn apply_damage(&mut self, amount: i32) -> i32 {
        let reduction = (self.defense * MITIGATION_SCALE).round() as i32;
        let lost = (amount - reduction).max(0).min(self.hp);
        self.hp -= lost;
        lost
    }
}
