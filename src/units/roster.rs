//! Per-match arena of units
//!
//! Units are addressed by index handles. Dead units stay in the arena;
//! only their board occupancy is cleared.

use crate::core::types::{HeroId, MonsterId, UnitRef};
use crate::units::{Combatant, Hero, Monster};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    heroes: Vec<Hero>,
    monsters: Vec<Monster>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hero(&mut self, hero: Hero) -> HeroId {
        self.heroes.push(hero);
        HeroId(self.heroes.len() - 1)
    }

    pub fn add_monster(&mut self, monster: Monster) -> MonsterId {
        self.monsters.push(monster);
        MonsterId(self.monsters.len() - 1)
    }

    pub fn hero(&self, id: HeroId) -> Option<&Hero> {
        self.heroes.get(id.0)
    }

    pub fn hero_mut(&mut self, id: HeroId) -> Option<&mut Hero> {
        self.heroes.get_mut(id.0)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(id.0)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(id.0)
    }

    pub fn unit(&self, unit: UnitRef) -> Option<&dyn Combatant> {
        match unit {
            UnitRef::Hero(id) => self.hero(id).map(|h| h as &dyn Combatant),
            UnitRef::Monster(id) => self.monster(id).map(|m| m as &dyn Combatant),
        }
    }

    pub fn unit_mut(&mut self, unit: UnitRef) -> Option<&mut dyn Combatant> {
        match unit {
            UnitRef::Hero(id) => self.hero_mut(id).map(|h| h as &mut dyn Combatant),
            UnitRef::Monster(id) => self.monster_mut(id).map(|m| m as &mut dyn Combatant),
        }
    }

    pub fn is_alive(&self, unit: UnitRef) -> bool {
        self.unit(unit).is_some_and(|u| u.is_alive())
    }

    /// Hero handles in party order
    pub fn hero_ids(&self) -> impl Iterator<Item = HeroId> {
        (0..self.heroes.len()).map(HeroId)
    }

    /// Monster handles in spawn order
    pub fn monster_ids(&self) -> impl Iterator<Item = MonsterId> {
        (0..self.monsters.len()).map(MonsterId)
    }

    pub fn hero_count(&self) -> usize {
        self.heroes.len()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// Highest level in the party, used to scale reinforcements
    pub fn max_hero_level(&self) -> u32 {
        self.heroes.iter().map(|h| h.level()).max().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Attributes;

    #[test]
    fn test_handles_are_sequential() {
        let mut roster = Roster::new();
        let a = roster.add_hero(Hero::new("A", 1, Attributes::default()));
        let b = roster.add_hero(Hero::new("B", 3, Attributes::default()));
        let m = roster.add_monster(Monster::new("M", 1, 10.0, 0.0, 0.0));
        assert_eq!(a, HeroId(0));
        assert_eq!(b, HeroId(1));
        assert_eq!(m, MonsterId(0));
        assert_eq!(roster.max_hero_level(), 3);
    }

    #[test]
    fn test_unit_lookup_by_ref() {
        let mut roster = Roster::new();
        let m = roster.add_monster(Monster::new("M", 1, 10.0, 0.0, 0.0).with_hp(0));
        assert_eq!(roster.unit(UnitRef::Monster(m)).unwrap().name(), "M");
        assert!(!roster.is_alive(UnitRef::Monster(m)));
        assert!(!roster.is_alive(UnitRef::Hero(HeroId(9))));
    }
}
