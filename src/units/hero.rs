//! Heroes: the attacking side

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    HERO_ATTACK_SCALE, HERO_DODGE_PER_AGILITY, HP_PER_LEVEL, MAX_DODGE_CHANCE, MAX_UNIT_LEVEL,
    MITIGATION_SCALE, MP_PER_LEVEL,
};
use crate::units::items::{Armor, Item, ItemKind, Potion, PotionStat, Spell, Weapon};
use crate::units::{Combatant, Stat};

/// Base attributes, before any terrain bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Attributes {
    pub strength: f64,
    pub dexterity: f64,
    pub agility: f64,
}

impl Attributes {
    pub fn new(strength: f64, dexterity: f64, agility: f64) -> Self {
        Self {
            strength,
            dexterity,
            agility,
        }
    }

    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Dexterity => self.dexterity,
            Stat::Agility => self.agility,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::Strength => &mut self.strength,
            Stat::Dexterity => &mut self.dexterity,
            Stat::Agility => &mut self.agility,
        }
    }
}

/// Additive layer on top of one base attribute while standing on a bonus tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct TerrainLayer {
    stat: Stat,
    delta: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    level: u32,
    hp: i32,
    mp: i32,
    base: Attributes,
    terrain: Option<TerrainLayer>,
    pub gold: u32,
    pub experience: u32,
    inventory: Vec<Item>,
    weapon: Option<Weapon>,
    armor: Option<Armor>,
}

impl Hero {
    /// A hero at full HP and MP for its level, with an empty inventory.
    /// The level is clamped to `1..=MAX_UNIT_LEVEL`.
    pub fn new(name: impl Into<String>, level: u32, base: Attributes) -> Self {
        let level = level.clamp(1, MAX_UNIT_LEVEL);
        Self {
            name: name.into(),
            level,
            hp: level as i32 * HP_PER_LEVEL,
            mp: level as i32 * MP_PER_LEVEL,
            base,
            terrain: None,
            gold: 0,
            experience: 0,
            inventory: Vec::new(),
            weapon: None,
            armor: None,
        }
    }

    pub fn max_hp(&self) -> i32 {
        self.level as i32 * HP_PER_LEVEL
    }

    pub fn max_mp(&self) -> i32 {
        self.level as i32 * MP_PER_LEVEL
    }

    pub fn mp(&self) -> i32 {
        self.mp
    }

    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp());
    }

    pub fn set_mp(&mut self, mp: i32) {
        self.mp = mp.clamp(0, self.max_mp());
    }

    /// Refill HP and MP to the level-derived maxima
    pub fn restore_full(&mut self) {
        self.hp = self.max_hp();
        self.mp = self.max_mp();
    }

    /// Restore `fraction` of max HP and MP, capped at the max
    pub fn regenerate(&mut self, fraction: f64) {
        let hp_gain = (self.max_hp() as f64 * fraction).round() as i32;
        let mp_gain = (self.max_mp() as f64 * fraction).round() as i32;
        self.set_hp(self.hp + hp_gain);
        self.set_mp(self.mp + mp_gain);
    }

    pub fn base_attributes(&self) -> Attributes {
        self.base
    }

    /// Current value of `stat`, including any terrain bonus
    pub fn stat(&self, stat: Stat) -> f64 {
        let bonus = match self.terrain {
            Some(layer) if layer.stat == stat => layer.delta,
            _ => 0.0,
        };
        self.base.get(stat) + bonus
    }

    pub fn strength(&self) -> f64 {
        self.stat(Stat::Strength)
    }

    pub fn dexterity(&self) -> f64 {
        self.stat(Stat::Dexterity)
    }

    pub fn agility(&self) -> f64 {
        self.stat(Stat::Agility)
    }

    /// The stat and amount of the active terrain bonus
    pub fn terrain_bonus(&self) -> Option<(Stat, f64)> {
        self.terrain.map(|layer| (layer.stat, layer.delta))
    }

    /// Raw attack power before rounding
    pub fn attack_power(&self) -> f64 {
        let weapon_damage = self.weapon.as_ref().map_or(0.0, |w| w.damage);
        (self.strength() + weapon_damage) * HERO_ATTACK_SCALE
    }

    pub fn has_mana(&self, cost: i32) -> bool {
        self.mp >= cost
    }

    /// Deduct `cost` MP. Returns false and changes nothing if MP is short.
    pub fn spend_mana(&mut self, cost: i32) -> bool {
        if !self.has_mana(cost) {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn armor(&self) -> Option<&Armor> {
        self.armor.as_ref()
    }

    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    /// Inventory items of one kind, in inventory order
    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.inventory.iter().filter(move |item| item.kind() == kind)
    }

    pub fn spells(&self) -> Vec<&Spell> {
        self.inventory.iter().filter_map(Item::as_spell).collect()
    }

    pub fn potions(&self) -> Vec<&Potion> {
        self.inventory.iter().filter_map(Item::as_potion).collect()
    }

    /// Remove and return the `index`-th item of `kind`
    pub fn take_item(&mut self, kind: ItemKind, index: usize) -> Option<Item> {
        let slot = self
            .inventory
            .iter()
            .enumerate()
            .filter(|(_, item)| item.kind() == kind)
            .nth(index)
            .map(|(slot, _)| slot)?;
        Some(self.inventory.remove(slot))
    }

    /// Equip a weapon; the previously held weapon goes back to the inventory
    pub fn equip_weapon(&mut self, weapon: Weapon) {
        if let Some(old) = self.weapon.replace(weapon) {
            self.inventory.push(Item::Weapon(old));
        }
    }

    /// Equip armor; the previously worn armor goes back to the inventory
    pub fn equip_armor(&mut self, armor: Armor) {
        if let Some(old) = self.armor.replace(armor) {
            self.inventory.push(Item::Armor(old));
        }
    }

    /// Apply a potion's effects. The potion is consumed by the caller.
    pub fn use_potion(&mut self, potion: &Potion) {
        for stat in &potion.affects {
            match stat {
                PotionStat::Health => self.set_hp(self.hp + potion.amount.round() as i32),
                PotionStat::Mana => self.set_mp(self.mp + potion.amount.round() as i32),
                PotionStat::Strength => self.base.strength += potion.amount,
                PotionStat::Dexterity => self.base.dexterity += potion.amount,
                PotionStat::Agility => self.base.agility += potion.amount,
            }
        }
    }
}

impl Combatant for Hero {
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
        (self.agility() * HERO_DODGE_PER_AGILITY).clamp(0.0, MAX_DODGE_CHANCE)
    }

    fn apply_damage(&mut self, amount: i32) -> i32 {
        let reduction = self
            .armor
            .as_ref()
            .map_or(0, |a| (a.damage_reduction * MITIGATION_SCALE).round() as i32);
        let lost = (amount - reduction).max(0).min(self.hp);
        self.hp -= lost;
        lost
    }

    fn enter_terrain(&mut self, stat: Stat, fraction: f64) {
        // Base stats never carry a previous bonus, so re-entry cannot stack
        self.terrain = Some(TerrainLayer {
            stat,
            delta: self.base.get(stat) * fraction,
        });
    }

    fn leave_terrain(&mut self) {
        self.terrain = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> Hero {
        Hero::new("Sir Alric", 2, Attributes::new(700.0, 600.0, 500.0))
    }

    #[test]
    fn test_level_derived_maxima() {
        let hero = knight();
        assert_eq!(hero.max_hp(), 200);
        assert_eq!(hero.max_mp(), 100);
        assert_eq!(hero.hp(), 200);
        assert_eq!(hero.mp(), 100);
    }

    #[test]
    fn test_level_is_clamped() {
        let hero = Hero::new("Ancient", 30_000_000, Attributes::default());
        assert_eq!(hero.level(), MAX_UNIT_LEVEL);
        assert_eq!(hero.max_hp(), MAX_UNIT_LEVEL as i32 * HP_PER_LEVEL);
        assert_eq!(Hero::new("Novice", 0, Attributes::default()).level(), 1);
    }

    #[test]
    fn test_dodge_scales_with_agility_up_to_cap() {
        let nimble = Hero::new("A", 1, Attributes::new(0.0, 0.0, 300.0));
        assert!((nimble.dodge_chance() - 0.06).abs() < 1e-9);

        let clumsy = Hero::new("B", 1, Attributes::new(0.0, 0.0, 0.0));
        assert_eq!(clumsy.dodge_chance(), 0.0);

        let blur = Hero::new("C", 1, Attributes::new(0.0, 0.0, 10_000.0));
        assert_eq!(blur.dodge_chance(), MAX_DODGE_CHANCE);
        assert_eq!(MAX_DODGE_CHANCE, 0.5);
    }

    #[test]
    fn test_attack_power_includes_weapon() {
        let mut hero = knight();
        assert!((hero.attack_power() - 35.0).abs() < 1e-9);
        hero.equip_weapon(Weapon {
            name: "Sword".into(),
            cost: 500,
            required_level: 1,
            damage: 800.0,
            hands: 1,
        });
        assert!((hero.attack_power() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut hero = knight();
        let lost = hero.apply_damage(500);
        assert_eq!(lost, 200);
        assert_eq!(hero.hp(), 0);
        assert!(!hero.is_alive());
    }

    #[test]
    fn test_armor_mitigates() {
        let mut hero = knight();
        hero.equip_armor(Armor {
            name: "Platinum Shield".into(),
            cost: 150,
            required_level: 1,
            damage_reduction: 200.0,
        });
        assert_eq!(hero.apply_damage(30), 26);
    }

    #[test]
    fn test_spend_mana_rejects_shortfall() {
        let mut hero = knight();
        assert!(!hero.spend_mana(101));
        assert_eq!(hero.mp(), 100);
        assert!(hero.spend_mana(60));
        assert_eq!(hero.mp(), 40);
    }

    #[test]
    fn test_terrain_bonus_does_not_stack() {
        let mut hero = knight();
        hero.enter_terrain(Stat::Dexterity, 0.10);
        hero.enter_terrain(Stat::Dexterity, 0.10);
        assert!((hero.dexterity() - 660.0).abs() < 1e-9);
        hero.leave_terrain();
        assert_eq!(hero.dexterity(), 600.0);
    }

    #[test]
    fn test_regenerate_caps_at_max() {
        let mut hero = knight();
        hero.set_hp(195);
        hero.set_mp(10);
        hero.regenerate(0.10);
        assert_eq!(hero.hp(), 200);
        assert_eq!(hero.mp(), 20);
    }

    #[test]
    fn test_potion_and_take_item() {
        let mut hero = knight();
        hero.set_hp(50);
        hero.add_item(Item::Potion(Potion {
            name: "Healing Potion".into(),
            cost: 250,
            required_level: 1,
            amount: 100.0,
            affects: vec![PotionStat::Health, PotionStat::Strength],
        }));
        let item = hero.take_item(ItemKind::Potion, 0).unwrap();
        hero.use_potion(item.as_potion().unwrap());
        assert_eq!(hero.hp(), 150);
        assert_eq!(hero.base_attributes().strength, 800.0);
        assert!(hero.potions().is_empty());
    }

    #[test]
    fn test_equip_returns_previous_to_inventory() {
        let mut hero = knight();
        let axe = Weapon {
            name: "Axe".into(),
            cost: 550,
            required_level: 5,
            damage: 850.0,
            hands: 1,
        };
        hero.equip_weapon(axe.clone());
        hero.equip_weapon(Weapon {
            name: "Dagger".into(),
            damage: 250.0,
            ..axe
        });
        assert_eq!(hero.weapon().unwrap().name, "Dagger");
        assert_eq!(hero.items_of(ItemKind::Weapon).count(), 1);
    }
}
