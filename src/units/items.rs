//! Item model
//!
//! Items are a closed sum type. Callers resolve the category once with
//! the `as_*` accessors instead of probing types at use sites.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub damage: f64,
    #[serde(default = "default_hands")]
    pub hands: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub damage_reduction: f64,
}

/// A stat a potion can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotionStat {
    Health,
    Mana,
    Strength,
    Dexterity,
    Agility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potion {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub amount: f64,
    pub affects: Vec<PotionStat>,
}

/// Spell element, which selects the debuff a landed spell applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellElement {
    /// Lowers the target's defense
    Fire,
    /// Lowers the target's damage
    Ice,
    /// Lowers the target's dodge chance
    Lightning,
}

impl fmt::Display for SpellElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpellElement::Fire => "fire",
            SpellElement::Ice => "ice",
            SpellElement::Lightning => "lightning",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    pub damage: f64,
    pub mana_cost: i32,
    pub element: SpellElement,
}

fn default_required_level() -> u32 {
    1
}

fn default_hands() -> u8 {
    1
}

/// Item category, used to select inventory slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Spell,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
    Spell(Spell),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Weapon(_) => ItemKind::Weapon,
            Item::Armor(_) => ItemKind::Armor,
            Item::Potion(_) => ItemKind::Potion,
            Item::Spell(_) => ItemKind::Spell,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Weapon(w) => &w.name,
            Item::Armor(a) => &a.name,
            Item::Potion(p) => &p.name,
            Item::Spell(s) => &s.name,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Item::Weapon(w) => w.cost,
            Item::Armor(a) => a.cost,
            Item::Potion(p) => p.cost,
            Item::Spell(s) => s.cost,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Item::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&Armor> {
        match self {
            Item::Armor(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_potion(&self) -> Option<&Potion> {
        match self {
            Item::Potion(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_spell(&self) -> Option<&Spell> {
        match self {
            Item::Spell(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireball() -> Item {
        Item::Spell(Spell {
            name: "Flame Tornado".into(),
            cost: 700,
            required_level: 4,
            damage: 850.0,
            mana_cost: 300,
            element: SpellElement::Fire,
        })
    }

    #[test]
    fn test_capability_accessors() {
        let item = fireball();
        assert_eq!(item.kind(), ItemKind::Spell);
        assert!(item.as_spell().is_some());
        assert!(item.as_weapon().is_none());
        assert!(item.as_potion().is_none());
        assert_eq!(item.name(), "Flame Tornado");
        assert_eq!(item.cost(), 700);
    }

    #[test]
    fn test_tagged_toml_item() {
        let text = r#"
            kind = "potion"
            name = "Healing Potion"
            amount = 100.0
            affects = ["health"]
        "#;
        let item: Item = toml::from_str(text).unwrap();
        let potion = item.as_potion().unwrap();
        assert_eq!(potion.affects, vec![PotionStat::Health]);
        assert_eq!(potion.required_level, 1);
    }
}
