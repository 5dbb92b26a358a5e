//! Battlefield: the board together with the units standing on it
//!
//! All placement and removal goes through here so that terrain hooks
//! fire exactly once per entry and once per exit.

use ahash::AHashMap;

use crate::battle::board::Board;
use crate::battle::constants::{HERO_NEXUS_ROW, MONSTER_NEXUS_ROW};
use crate::core::types::{Faction, GridPos, HeroId, Lane, UnitRef};
use crate::units::{Combatant, Roster};

#[derive(Debug, Clone)]
pub struct Battlefield {
    pub board: Board,
    pub roster: Roster,
    home_lanes: AHashMap<HeroId, Lane>,
}

impl Battlefield {
    pub fn new(board: Board, roster: Roster) -> Self {
        Self {
            board,
            roster,
            home_lanes: AHashMap::new(),
        }
    }

    pub fn position_of(&self, unit: UnitRef) -> Option<GridPos> {
        self.board.position_of(unit)
    }

    pub fn is_alive(&self, unit: UnitRef) -> bool {
        self.roster.is_alive(unit)
    }

    pub fn unit(&self, unit: UnitRef) -> Option<&dyn Combatant> {
        self.roster.unit(unit)
    }

    /// Record a hero's home lane. Only the first assignment sticks.
    pub fn assign_home_lane(&mut self, hero: HeroId, lane: Lane) {
        self.home_lanes.entry(hero).or_insert(lane);
    }

    /// The hero's home lane; heroes never assigned one fall back to mid
    pub fn home_lane(&self, hero: HeroId) -> Lane {
        self.home_lanes.get(&hero).copied().unwrap_or(Lane::Mid)
    }

    /// Place an off-board unit and apply the destination tile's terrain
    pub fn place_unit(&mut self, unit: UnitRef, pos: GridPos) -> bool {
        if !self.board.occupy(unit, pos) {
            return false;
        }
        if let (Some(terrain), Some(combatant)) =
            (self.board.tile(pos).terrain(), self.roster.unit_mut(unit))
        {
            terrain.on_enter(combatant);
        }
        true
    }

    /// Take a unit off the board, reverting its terrain bonus first
    pub fn remove_unit(&mut self, unit: UnitRef) -> Option<GridPos> {
        let pos = self.board.position_of(unit)?;
        if let (Some(terrain), Some(combatant)) =
            (self.board.tile(pos).terrain(), self.roster.unit_mut(unit))
        {
            terrain.on_exit(combatant);
        }
        self.board.vacate(unit)
    }

    /// Move a placed unit to `to` with exit and enter hooks. Legality is
    /// the caller's job; this only fails if the slot cannot be taken, in
    /// which case the unit stays where it was.
    pub(crate) fn transfer(&mut self, unit: UnitRef, to: GridPos) -> bool {
        let Some(from) = self.board.position_of(unit) else {
            return false;
        };
        if !self.board.tile(to).is_open_for(unit.faction()) {
            return false;
        }
        self.remove_unit(unit);
        if self.place_unit(unit, to) {
            return true;
        }
        self.place_unit(unit, from);
        false
    }

    /// Live placed units of `faction`, in board order
    pub fn live_units(&self, faction: Faction) -> Vec<(UnitRef, GridPos)> {
        self.board
            .occupants()
            .into_iter()
            .filter(|(unit, _)| unit.faction() == faction && self.is_alive(*unit))
            .collect()
    }

    /// Live placed units of `faction` in `lane`, in board order
    pub fn live_units_in_lane(&self, lane: Lane, faction: Faction) -> Vec<(UnitRef, GridPos)> {
        self.board
            .units_in_lane(lane, faction)
            .into_iter()
            .filter(|(unit, _)| self.is_alive(*unit))
            .collect()
    }

    /// Any live hero on the monsters' nexus row
    pub fn attackers_reached_goal(&self) -> bool {
        self.live_units(Faction::Heroes)
            .iter()
            .any(|(_, pos)| pos.row == MONSTER_NEXUS_ROW)
    }

    /// Any live monster on the heroes' nexus row
    pub fn defenders_reached_goal(&self) -> bool {
        self.live_units(Faction::Monsters)
            .iter()
            .any(|(_, pos)| pos.row == HERO_NEXUS_ROW)
    }
}
