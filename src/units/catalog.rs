//! Unit catalog and monster generation
//!
//! Templates are loaded once at match setup (built-in defaults or a TOML
//! file) and passed explicitly to whatever needs them.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::battle::constants::MAX_UNIT_LEVEL;
use crate::core::error::{Result, ValorError};
use crate::units::items::{Armor, Item, Potion, PotionStat, Spell, SpellElement, Weapon};
use crate::units::{Attributes, Hero, Monster};

/// Produces reinforcement monsters
pub trait MonsterFactory {
    /// Create one monster for a party whose strongest hero is `level`.
    /// `None` means nothing can be generated and the lane is skipped.
    fn generate(&mut self, level: u32, rng: &mut dyn RngCore) -> Option<Monster>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub strength: f64,
    pub dexterity: f64,
    pub agility: f64,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub weapon: Option<Weapon>,
    #[serde(default)]
    pub armor: Option<Armor>,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl HeroTemplate {
    pub fn instantiate(&self) -> Hero {
        let mut hero = Hero::new(
            self.name.clone(),
            self.level,
            Attributes::new(self.strength, self.dexterity, self.agility),
        );
        hero.gold = self.gold;
        if let Some(weapon) = &self.weapon {
            hero.equip_weapon(weapon.clone());
        }
        if let Some(armor) = &self.armor {
            hero.equip_armor(armor.clone());
        }
        for item in &self.items {
            hero.add_item(item.clone());
        }
        hero
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    pub damage: f64,
    pub defense: f64,
    /// Probability in [0, 1]
    pub dodge_chance: f64,
}

impl MonsterTemplate {
    pub fn instantiate(&self, level: u32) -> Monster {
        Monster::new(
            self.name.clone(),
            level,
            self.damage,
            self.defense,
            self.dodge_chance,
        )
    }
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitCatalog {
    #[serde(default)]
    pub heroes: Vec<HeroTemplate>,
    #[serde(default)]
    pub monsters: Vec<MonsterTemplate>,
}

impl UnitCatalog {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let catalog: UnitCatalog = toml::from_str(text)?;
        if catalog.monsters.is_empty() {
            return Err(ValorError::InvalidConfig(
                "unit catalog defines no monsters".into(),
            ));
        }
        catalog.validate().map_err(ValorError::InvalidConfig)?;
        Ok(catalog)
    }

    /// Check template levels are within `1..=MAX_UNIT_LEVEL`
    pub fn validate(&self) -> std::result::Result<(), String> {
        let levels = self
            .heroes
            .iter()
            .map(|t| (&t.name, t.level))
            .chain(self.monsters.iter().map(|t| (&t.name, t.level)));
        for (name, level) in levels {
            if !(1..=MAX_UNIT_LEVEL).contains(&level) {
                return Err(format!(
                    "{} has level {}, must be between 1 and {}",
                    name, level, MAX_UNIT_LEVEL
                ));
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml_str(&text)?;
        tracing::info!(
            path = %path.as_ref().display(),
            heroes = catalog.heroes.len(),
            monsters = catalog.monsters.len(),
            "loaded unit catalog"
        );
        Ok(catalog)
    }

    pub fn hero_template(&self, name: &str) -> Option<&HeroTemplate> {
        self.heroes
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Instantiate heroes by template name, in the given order
    pub fn build_party(&self, names: &[String]) -> Result<Vec<Hero>> {
        names
            .iter()
            .map(|name| {
                self.hero_template(name)
                    .map(HeroTemplate::instantiate)
                    .ok_or_else(|| ValorError::UnknownHero(name.clone()))
            })
            .collect()
    }

    /// Templates closest to `level`: exact matches, else the strongest
    /// below it, else the weakest above it.
    fn templates_near(&self, level: u32) -> Vec<&MonsterTemplate> {
        let exact: Vec<_> = self.monsters.iter().filter(|t| t.level == level).collect();
        if !exact.is_empty() {
            return exact;
        }
        let below = self
            .monsters
            .iter()
            .filter(|t| t.level < level)
            .map(|t| t.level)
            .max();
        let chosen = below.or_else(|| self.monsters.iter().map(|t| t.level).min());
        match chosen {
            Some(lvl) => self.monsters.iter().filter(|t| t.level == lvl).collect(),
            None => Vec::new(),
        }
    }

    /// Built-in content used when no catalog file is given
    pub fn builtin() -> Self {
        let heroes = vec![
            HeroTemplate {
                name: "Gaerdal".into(),
                level: 1,
                strength: 700.0,
                dexterity: 600.0,
                agility: 500.0,
                gold: 1354,
                weapon: Some(Weapon {
                    name: "Sword".into(),
                    cost: 500,
                    required_level: 1,
                    damage: 800.0,
                    hands: 1,
                }),
                armor: None,
                items: vec![healing_potion()],
            },
            HeroTemplate {
                name: "Rillifane".into(),
                level: 1,
                strength: 750.0,
                dexterity: 450.0,
                agility: 500.0,
                gold: 2500,
                weapon: None,
                armor: Some(Armor {
                    name: "Platinum Shield".into(),
                    cost: 150,
                    required_level: 1,
                    damage_reduction: 200.0,
                }),
                items: vec![
                    Item::Spell(Spell {
                        name: "Snow Cannon".into(),
                        cost: 500,
                        required_level: 1,
                        damage: 650.0,
                        mana_cost: 25,
                        element: SpellElement::Ice,
                    }),
                    healing_potion(),
                ],
            },
            HeroTemplate {
                name: "Segojan".into(),
                level: 1,
                strength: 650.0,
                dexterity: 700.0,
                agility: 400.0,
                gold: 2500,
                weapon: None,
                armor: None,
                items: vec![
                    Item::Spell(Spell {
                        name: "Flame Tornado".into(),
                        cost: 700,
                        required_level: 1,
                        damage: 850.0,
                        mana_cost: 30,
                        element: SpellElement::Fire,
                    }),
                    Item::Spell(Spell {
                        name: "Thunder Blast".into(),
                        cost: 750,
                        required_level: 1,
                        damage: 950.0,
                        mana_cost: 40,
                        element: SpellElement::Lightning,
                    }),
                    Item::Potion(Potion {
                        name: "Magic Potion".into(),
                        cost: 350,
                        required_level: 1,
                        amount: 50.0,
                        affects: vec![PotionStat::Mana],
                    }),
                ],
            },
        ];

        let monster = |name: &str, level, damage, defense, dodge_chance| MonsterTemplate {
            name: name.into(),
            level,
            damage,
            defense,
            dodge_chance,
        };
        let monsters = vec![
            monster("Natsunomeryu", 1, 100.0, 200.0, 0.10),
            monster("Casper", 1, 100.0, 100.0, 0.50),
            monster("Andrealphus", 2, 600.0, 500.0, 0.40),
            monster("Blinky", 1, 450.0, 350.0, 0.35),
            monster("Chrysophylax", 2, 200.0, 500.0, 0.20),
            monster("Desghidorrah", 3, 300.0, 400.0, 0.35),
            monster("Aim-Haborym", 3, 450.0, 350.0, 0.35),
        ];

        Self { heroes, monsters }
    }
}

fn healing_potion() -> Item {
    Item::Potion(Potion {
        name: "Healing Potion".into(),
        cost: 250,
        required_level: 1,
        amount: 100.0,
        affects: vec![PotionStat::Health],
    })
}

impl MonsterFactory for UnitCatalog {
    fn generate(&mut self, level: u32, rng: &mut dyn RngCore) -> Option<Monster> {
        let candidates = self.templates_near(level);
        candidates
            .choose(rng)
            .map(|template| template.instantiate(level))
    }
}
