//! Combat resolution: basic attacks, spells and attack range
//!
//! Dodge rolls draw one uniform value in [0, 1); the attack is evaded
//! when it falls below the target's dodge chance. Evaded attacks still
//! use up the attacker's action.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::constants::{MONSTER_DAMAGE_SCALE, SPELL_DEBUFF, SPELL_DEXTERITY_DIVISOR};
use crate::battle::field::Battlefield;
use crate::core::types::{Direction, GridPos, HeroId, MonsterId, UnitRef};
use crate::stats::StatsSink;
use crate::units::{Combatant, Hero, Monster, Spell, SpellElement};

/// Why an attack or spell could not be attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("attacker is not on the board")]
    AttackerNotPlaced,

    #[error("target is already dead")]
    TargetDead,

    #[error("target is not in range")]
    OutOfRange,

    #[error("cannot attack a unit on the same side")]
    SameSide,

    #[error("not enough mana: need {needed}, have {available}")]
    InsufficientMana { needed: i32, available: i32 },

    #[error("unknown unit {0:?}")]
    UnknownUnit(UnitRef),
}

/// Result of an attempted attack or spell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// The target evaded; the action is still spent
    Dodged,
    /// `damage` is the formula value, `hp_lost` what the target actually lost
    Hit {
        damage: i32,
        hp_lost: i32,
        killed: bool,
    },
}

impl AttackOutcome {
    pub fn killed(&self) -> bool {
        matches!(self, AttackOutcome::Hit { killed: true, .. })
    }
}

/// Hero basic attack damage: round(attack power)
pub fn hero_attack_damage(hero: &Hero) -> i32 {
    hero.attack_power().round() as i32
}

/// Monster attack damage: round(base damage * 0.3)
pub fn monster_attack_damage(monster: &Monster) -> i32 {
    (monster.damage * MONSTER_DAMAGE_SCALE).round() as i32
}

/// Spell damage: round(base + dexterity / 10000 * base)
pub fn spell_damage(base: f64, dexterity: f64) -> i32 {
    (base + dexterity / SPELL_DEXTERITY_DIVISOR * base).round() as i32
}

/// Live enemies on the unit's own tile or one orthogonal step away,
/// in row-major board order.
pub fn attack_range_of(field: &Battlefield, unit: UnitRef) -> Vec<UnitRef> {
    let Some(origin) = field.position_of(unit) else {
        return Vec::new();
    };
    let enemy = unit.faction().opponent();
    let mut cells: Vec<GridPos> = std::iter::once(origin)
        .chain(Direction::ALL.iter().map(|dir| origin.step(*dir)))
        .filter(|pos| field.board.in_bounds(*pos))
        .collect();
    cells.sort();
    cells
        .into_iter()
        .filter_map(|pos| field.board.tile(pos).occupant(enemy))
        .filter(|target| field.is_alive(*target))
        .collect()
}

pub fn in_range(field: &Battlefield, unit: UnitRef, target: UnitRef) -> bool {
    attack_range_of(field, unit).contains(&target)
}

fn roll_dodge(dodge_chance: f64, rng: &mut dyn RngCore) -> bool {
    rng.gen::<f64>() < dodge_chance
}

/// Common pre-checks for any attack from `attacker` on `target`
fn check_target(field: &Battlefield, attacker: UnitRef, target: UnitRef) -> Result<(), CombatError> {
    if attacker.faction() == target.faction() {
        return Err(CombatError::SameSide);
    }
    if field.position_of(attacker).is_none() {
        return Err(CombatError::AttackerNotPlaced);
    }
    let unit = field.unit(target).ok_or(CombatError::UnknownUnit(target))?;
    if !unit.is_alive() {
        return Err(CombatError::TargetDead);
    }
    if !in_range(field, attacker, target) {
        return Err(CombatError::OutOfRange);
    }
    Ok(())
}

/// Apply `damage` to `target`, clear it from the board if it dies and
/// report to the stats sink.
fn land_hit(
    field: &mut Battlefield,
    attacker: UnitRef,
    target: UnitRef,
    damage: i32,
    stats: Option<&mut dyn StatsSink>,
) -> Result<AttackOutcome, CombatError> {
    let unit = field
        .roster
        .unit_mut(target)
        .ok_or(CombatError::UnknownUnit(target))?;
    let hp_lost = unit.apply_damage(damage);
    let killed = !unit.is_alive();
    let target_name = unit.name().to_string();

    if killed {
        field.remove_unit(target);
        tracing::info!(?attacker, target = %target_name, "unit slain");
    }

    if let Some(sink) = stats {
        match (attacker, target) {
            (UnitRef::Hero(hero), _) => {
                sink.record_damage_dealt(hero, hp_lost);
                if killed {
                    sink.record_kill(hero);
                }
            }
            (_, UnitRef::Hero(hero)) => {
                sink.record_damage_taken(hero, hp_lost);
                if killed {
                    sink.record_faint(hero);
                }
            }
            _ => {}
        }
    }

    Ok(AttackOutcome::Hit {
        damage,
        hp_lost,
        killed,
    })
}

/// Resolve one basic attack. Errors mean nothing happened; `Dodged` and
/// `Hit` both consume the attacker's action.
pub fn basic_attack(
    field: &mut Battlefield,
    attacker: UnitRef,
    target: UnitRef,
    rng: &mut dyn RngCore,
    stats: Option<&mut dyn StatsSink>,
) -> Result<AttackOutcome, CombatError> {
    check_target(field, attacker, target)?;

    let damage = match attacker {
        UnitRef::Hero(id) => field.roster.hero(id).map(hero_attack_damage),
        UnitRef::Monster(id) => field.roster.monster(id).map(monster_attack_damage),
    }
    .ok_or(CombatError::UnknownUnit(attacker))?;

    let dodge_chance = field
        .unit(target)
        .map_or(0.0, |unit| unit.dodge_chance());
    if roll_dodge(dodge_chance, rng) {
        tracing::debug!(?attacker, ?target, "attack dodged");
        return Ok(AttackOutcome::Dodged);
    }

    land_hit(field, attacker, target, damage, stats)
}

/// Lower one monster stat by the spell debuff fraction, permanently
pub fn apply_spell_debuff(monster: &mut Monster, element: SpellElement) {
    let keep = 1.0 - SPELL_DEBUFF;
    match element {
        SpellElement::Fire => monster.defense = (monster.defense * keep).max(0.0),
        SpellElement::Ice => monster.damage = (monster.damage * keep).max(0.0),
        SpellElement::Lightning => {
            let chance = monster.dodge_chance() * keep;
            monster.set_dodge_chance(chance.max(0.0));
        }
    }
}

/// Cast `spell` from `caster` at `target`.
///
/// Mana is spent once the target and mana checks pass, even if the
/// target then dodges. A landed spell also debuffs the target according
/// to the spell's element.
pub fn spell_cast(
    field: &mut Battlefield,
    caster: HeroId,
    spell: &Spell,
    target: MonsterId,
    rng: &mut dyn RngCore,
    stats: Option<&mut dyn StatsSink>,
) -> Result<AttackOutcome, CombatError> {
    let caster_ref = UnitRef::Hero(caster);
    let target_ref = UnitRef::Monster(target);
    check_target(field, caster_ref, target_ref)?;

    let hero = field
        .roster
        .hero_mut(caster)
        .ok_or(CombatError::UnknownUnit(caster_ref))?;
    if !hero.spend_mana(spell.mana_cost) {
        return Err(CombatError::InsufficientMana {
            needed: spell.mana_cost,
            available: hero.mp(),
        });
    }
    let damage = spell_damage(spell.damage, hero.dexterity());

    let monster = field
        .roster
        .monster_mut(target)
        .ok_or(CombatError::UnknownUnit(target_ref))?;
    if roll_dodge(monster.dodge_chance(), rng) {
        tracing::debug!(spell = %spell.name, ?target, "spell dodged");
        return Ok(AttackOutcome::Dodged);
    }
    apply_spell_debuff(monster, spell.element);

    land_hit(field, caster_ref, target_ref, damage, stats)
}
