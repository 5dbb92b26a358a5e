//! Hero actions
//!
//! Executes one parsed command for one hero. Every rejection is an
//! `ActionError` and leaves the battlefield untouched, so the same hero
//! can simply be asked again.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::board::Board;
use crate::battle::combat::{attack_range_of, basic_attack, spell_cast, AttackOutcome, CombatError};
use crate::battle::command::{EquipSlot, HeroCommand};
use crate::battle::constants::HERO_NEXUS_ROW;
use crate::battle::field::Battlefield;
use crate::battle::movement::{try_move_unit, try_relocate, MoveError};
use crate::battle::terrain::CellType;
use crate::core::types::{Direction, GridPos, HeroId, UnitRef};
use crate::stats::{reborrow_sink, StatsSink};
use crate::units::{Combatant, Hero, Item, ItemKind};

/// What a command did to the hero's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnResult {
    Consumed,
    NotConsumed,
    Aborted,
}

/// A shop the hero can browse from its own nexus row
pub trait Market {
    fn open_for(&mut self, hero: &mut Hero);
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error("hero is not on the board")]
    HeroNotPlaced,

    #[error("no enemy in range")]
    NoTargetInRange,

    #[error("no enemy #{} in range", .0 + 1)]
    NoSuchTarget(usize),

    #[error("no {kind:?} #{} in inventory", .index + 1)]
    NoSuchItem { kind: ItemKind, index: usize },

    #[error("requires level {required}")]
    LevelTooLow { required: u32 },

    #[error("no hero #{} in the party", .0 + 1)]
    NoSuchHero(usize),

    #[error("cannot teleport to yourself")]
    SelfTeleport,

    #[error("that hero is down or off the board")]
    AllyUnavailable,

    #[error("teleport targets must be in another lane")]
    SameLane,

    #[error("cannot teleport ahead of the ally")]
    AheadOfAlly,

    #[error("no free cell beside that hero")]
    NoTeleportCell,

    #[error("no free cell on your home nexus")]
    NexusFull,

    #[error("{0} is not an obstacle")]
    NotAnObstacle(GridPos),

    #[error("the market only opens on your nexus row")]
    NotOnNexus,

    #[error("no market is available")]
    MarketUnavailable,
}

/// What happened, for the combat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionReport {
    Moved { to: GridPos },
    Attacked { target: UnitRef, outcome: AttackOutcome },
    CastSpell { spell: String, target: UnitRef, outcome: AttackOutcome },
    UsedPotion { potion: String },
    Equipped { item: String },
    Teleported { to: GridPos },
    Recalled { to: GridPos },
    ClearedObstacle { at: GridPos },
    BrowsedMarket,
    Waited,
    Quit,
}

impl ActionReport {
    pub fn turn_result(&self) -> TurnResult {
        match self {
            ActionReport::BrowsedMarket => TurnResult::NotConsumed,
            ActionReport::Quit => TurnResult::Aborted,
            _ => TurnResult::Consumed,
        }
    }
}

/// Collaborators an action may need besides the battlefield
pub struct ActionContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub stats: Option<&'a mut dyn StatsSink>,
    pub market: Option<&'a mut dyn Market>,
}

fn hero_pos(field: &Battlefield, hero: HeroId) -> Result<GridPos, ActionError> {
    field
        .position_of(UnitRef::Hero(hero))
        .ok_or(ActionError::HeroNotPlaced)
}

fn pick_target(field: &Battlefield, hero: HeroId, choice: Option<usize>) -> Result<UnitRef, ActionError> {
    let in_range = attack_range_of(field, UnitRef::Hero(hero));
    if in_range.is_empty() {
        return Err(ActionError::NoTargetInRange);
    }
    let index = choice.unwrap_or(0);
    in_range
        .get(index)
        .copied()
        .ok_or(ActionError::NoSuchTarget(index))
}

fn hero_ref(field: &Battlefield, hero: HeroId) -> Result<&Hero, ActionError> {
    field.roster.hero(hero).ok_or(ActionError::HeroNotPlaced)
}

fn hero_mut(field: &mut Battlefield, hero: HeroId) -> Result<&mut Hero, ActionError> {
    field.roster.hero_mut(hero).ok_or(ActionError::HeroNotPlaced)
}

/// Execute `command` for `hero`
pub fn execute(
    field: &mut Battlefield,
    hero: HeroId,
    command: HeroCommand,
    ctx: &mut ActionContext<'_>,
) -> Result<ActionReport, ActionError> {
    let unit = UnitRef::Hero(hero);
    match command {
        HeroCommand::Quit => Ok(ActionReport::Quit),
        HeroCommand::Wait => {
            hero_pos(field, hero)?;
            Ok(ActionReport::Waited)
        }
        HeroCommand::Move(dir) => {
            let to = try_move_unit(field, unit, dir)?;
            Ok(ActionReport::Moved { to })
        }
        HeroCommand::Attack { target } => {
            let target = pick_target(field, hero, target)?;
            let outcome = basic_attack(field, unit, target, &mut *ctx.rng, reborrow_sink(&mut ctx.stats))?;
            Ok(ActionReport::Attacked { target, outcome })
        }
        HeroCommand::CastSpell { spell, target } => cast(field, hero, spell, target, ctx),
        HeroCommand::UsePotion(index) => use_potion(field, hero, index),
        HeroCommand::Equip { slot, index } => equip(field, hero, slot, index),
        HeroCommand::Teleport { ally, side } => teleport(field, hero, ally, side),
        HeroCommand::Recall => recall(field, hero),
        HeroCommand::RemoveObstacle(dir) => remove_obstacle(field, hero, dir),
        HeroCommand::OpenMarket => open_market(field, hero, ctx),
    }
}

fn cast(
    field: &mut Battlefield,
    hero: HeroId,
    spell_index: usize,
    target: Option<usize>,
    ctx: &mut ActionContext<'_>,
) -> Result<ActionReport, ActionError> {
    hero_pos(field, hero)?;
    let caster = hero_ref(field, hero)?;
    let spell = caster
        .spells()
        .get(spell_index)
        .map(|s| (*s).clone())
        .ok_or(ActionError::NoSuchItem {
            kind: ItemKind::Spell,
            index: spell_index,
        })?;
    if spell.required_level > caster.level() {
        return Err(ActionError::LevelTooLow {
            required: spell.required_level,
        });
    }
    let target = pick_target(field, hero, target)?;
    let UnitRef::Monster(monster) = target else {
        return Err(CombatError::SameSide.into());
    };
    let outcome = spell_cast(field, hero, &spell, monster, &mut *ctx.rng, reborrow_sink(&mut ctx.stats))?;
    Ok(ActionReport::CastSpell {
        spell: spell.name,
        target,
        outcome,
    })
}

fn use_potion(field: &mut Battlefield, hero: HeroId, index: usize) -> Result<ActionReport, ActionError> {
    hero_pos(field, hero)?;
    let h = hero_mut(field, hero)?;
    let item = h.take_item(ItemKind::Potion, index).ok_or(ActionError::NoSuchItem {
        kind: ItemKind::Potion,
        index,
    })?;
    let Item::Potion(potion) = item else {
        return Err(ActionError::NoSuchItem {
            kind: ItemKind::Potion,
            index,
        });
    };
    h.use_potion(&potion);
    Ok(ActionReport::UsedPotion { potion: potion.name })
}

fn equip(field: &mut Battlefield, hero: HeroId, slot: EquipSlot, index: usize) -> Result<ActionReport, ActionError> {
    hero_pos(field, hero)?;
    let kind = match slot {
        EquipSlot::Weapon => ItemKind::Weapon,
        EquipSlot::Armor => ItemKind::Armor,
    };
    let h = hero_mut(field, hero)?;
    let missing = ActionError::NoSuchItem { kind, index };
    let required = match h.items_of(kind).nth(index) {
        Some(Item::Weapon(w)) => w.required_level,
        Some(Item::Armor(a)) => a.required_level,
        _ => return Err(missing),
    };
    if required > h.level() {
        return Err(ActionError::LevelTooLow { required });
    }
    let item = h.take_item(kind, index).ok_or(missing)?;
    let name = item.name().to_string();
    match item {
        Item::Weapon(w) => h.equip_weapon(w),
        Item::Armor(a) => h.equip_armor(a),
        other => h.add_item(other),
    }
    Ok(ActionReport::Equipped { item: name })
}

fn teleport(
    field: &mut Battlefield,
    hero: HeroId,
    ally_index: usize,
    side: Option<Direction>,
) -> Result<ActionReport, ActionError> {
    let from = hero_pos(field, hero)?;
    let ally = HeroId(ally_index);
    if ally == hero {
        return Err(ActionError::SelfTeleport);
    }
    if field.roster.hero(ally).is_none() {
        return Err(ActionError::NoSuchHero(ally_index));
    }
    let ally_unit = UnitRef::Hero(ally);
    let ally_pos = match field.position_of(ally_unit) {
        Some(pos) if field.is_alive(ally_unit) => pos,
        _ => return Err(ActionError::AllyUnavailable),
    };
    if Board::lane_of(from.col) == Board::lane_of(ally_pos.col) {
        return Err(ActionError::SameLane);
    }

    let unit = UnitRef::Hero(hero);
    match side {
        Some(Direction::North) => Err(ActionError::AheadOfAlly),
        Some(dir) => {
            let to = ally_pos.step(dir);
            try_relocate(field, unit, to)?;
            Ok(ActionReport::Teleported { to })
        }
        None => {
            let to = [Direction::South, Direction::West, Direction::East]
                .into_iter()
                .map(|dir| ally_pos.step(dir))
                .filter(|pos| Board::lane_of(pos.col).is_some())
                .find(|pos| try_relocate(field, unit, *pos).is_ok())
                .ok_or(ActionError::NoTeleportCell)?;
            Ok(ActionReport::Teleported { to })
        }
    }
}

fn recall(field: &mut Battlefield, hero: HeroId) -> Result<ActionReport, ActionError> {
    hero_pos(field, hero)?;
    let lane = field.home_lane(hero);
    let unit = UnitRef::Hero(hero);
    let to = Board::home_spawn_cells(lane)
        .into_iter()
        .find(|pos| try_relocate(field, unit, *pos).is_ok())
        .ok_or(ActionError::NexusFull)?;
    Ok(ActionReport::Recalled { to })
}

fn remove_obstacle(field: &mut Battlefield, hero: HeroId, dir: Direction) -> Result<ActionReport, ActionError> {
    let at = hero_pos(field, hero)?.step(dir);
    match field.board.get(at) {
        Some(tile) if tile.cell_type() == CellType::Obstacle => {
            field.board.set_cell_type(at, CellType::Plain);
            Ok(ActionReport::ClearedObstacle { at })
        }
        _ => Err(ActionError::NotAnObstacle(at)),
    }
}

fn open_market(
    field: &mut Battlefield,
    hero: HeroId,
    ctx: &mut ActionContext<'_>,
) -> Result<ActionReport, ActionError> {
    if hero_pos(field, hero)?.row != HERO_NEXUS_ROW {
        return Err(ActionError::NotOnNexus);
    }
    let market = ctx.market.as_deref_mut().ok_or(ActionError::MarketUnavailable)?;
    market.open_for(hero_mut(field, hero)?);
    Ok(ActionReport::BrowsedMarket)
}
