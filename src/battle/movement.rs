//! Movement legality and execution
//!
//! A unit may not end a move past the nearest live enemy in its lane:
//! for a hero at row R the blocker is the live monster with the largest
//! row below R, and the hero may not land on a smaller row than that.
//! Monsters mirror this toward the heroes' nexus. Relocations into a
//! different lane measure against every live enemy in the destination
//! lane.

use thiserror::Error;

use crate::battle::board::Board;
use crate::battle::field::Battlefield;
use crate::core::types::{Direction, Faction, GridPos, Lane, UnitRef};

/// Why a move or relocation was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("unit is not on the board")]
    NotPlaced,

    #[error("{0} is off the board")]
    OffBoard(GridPos),

    #[error("{0} cannot be entered")]
    Blocked(GridPos),

    #[error("{0} already holds an ally")]
    Occupied(GridPos),

    #[error("{0} is not in any lane")]
    NotInLane(GridPos),

    #[error("cannot move past the enemy at row {blocker_row}")]
    Bypass { blocker_row: i32 },
}

/// Row of the nearest live enemy level with or ahead of `from_row` in
/// `lane`, from the point of view of `faction`. With no reference row,
/// every live enemy in the lane counts.
pub fn bypass_limit(
    field: &Battlefield,
    faction: Faction,
    lane: Lane,
    from_row: Option<i32>,
) -> Option<i32> {
    let enemy_rows = field
        .live_units_in_lane(lane, faction.opponent())
        .into_iter()
        .map(|(_, pos)| pos.row);
    match faction {
        Faction::Heroes => enemy_rows
            .filter(|row| from_row.map_or(true, |r| *row <= r))
            .max(),
        Faction::Monsters => enemy_rows
            .filter(|row| from_row.map_or(true, |r| *row >= r))
            .min(),
    }
}

/// Check `dest` against the bypass rule for a unit coming from `from`
/// (`None` when the unit is off the board).
fn check_bypass(
    field: &Battlefield,
    faction: Faction,
    from: Option<GridPos>,
    dest: GridPos,
) -> Result<(), MoveError> {
    let lane = Board::lane_of(dest.col).ok_or(MoveError::NotInLane(dest))?;
    let from_row = from
        .filter(|pos| Board::lane_of(pos.col) == Some(lane))
        .map(|pos| pos.row);
    let Some(blocker_row) = bypass_limit(field, faction, lane, from_row) else {
        return Ok(());
    };
    let passes = match faction {
        Faction::Heroes => dest.row < blocker_row,
        Faction::Monsters => dest.row > blocker_row,
    };
    if passes {
        Err(MoveError::Bypass { blocker_row })
    } else {
        Ok(())
    }
}

/// Bounds, accessibility and same-side occupancy of `dest`
fn check_destination(field: &Battlefield, unit: UnitRef, dest: GridPos) -> Result<(), MoveError> {
    let tile = field.board.get(dest).ok_or(MoveError::OffBoard(dest))?;
    if !tile.is_accessible() {
        return Err(MoveError::Blocked(dest));
    }
    if tile.occupant(unit.faction()).is_some() {
        return Err(MoveError::Occupied(dest));
    }
    Ok(())
}

/// Validate a one-step move and return its destination
pub fn validate_move(field: &Battlefield, unit: UnitRef, dir: Direction) -> Result<GridPos, MoveError> {
    let from = field.position_of(unit).ok_or(MoveError::NotPlaced)?;
    let dest = from.step(dir);
    check_destination(field, unit, dest)?;
    check_bypass(field, unit.faction(), Some(from), dest)?;
    Ok(dest)
}

/// Move one step, returning the new position or the reason for refusal.
/// A refused move changes nothing.
pub fn try_move_unit(field: &mut Battlefield, unit: UnitRef, dir: Direction) -> Result<GridPos, MoveError> {
    let dest = validate_move(field, unit, dir)?;
    if !field.transfer(unit, dest) {
        return Err(MoveError::Occupied(dest));
    }
    tracing::trace!(?unit, %dest, "unit moved {}", dir);
    Ok(dest)
}

/// Move one step. Returns false, with no state change, if illegal.
pub fn move_unit(field: &mut Battlefield, unit: UnitRef, dir: Direction) -> bool {
    match try_move_unit(field, unit, dir) {
        Ok(_) => true,
        Err(reason) => {
            tracing::debug!(?unit, %reason, "move {} rejected", dir);
            false
        }
    }
}

/// Validate a non-adjacent relocation (teleport, recall, respawn)
pub fn validate_relocation(field: &Battlefield, unit: UnitRef, dest: GridPos) -> Result<(), MoveError> {
    let from = field.position_of(unit);
    if from == Some(dest) {
        return Ok(());
    }
    check_destination(field, unit, dest)?;
    check_bypass(field, unit.faction(), from, dest)
}

pub fn can_relocate_to(field: &Battlefield, unit: UnitRef, dest: GridPos) -> bool {
    validate_relocation(field, unit, dest).is_ok()
}

/// Relocate a unit, placing it if it is currently off the board
pub fn try_relocate(field: &mut Battlefield, unit: UnitRef, dest: GridPos) -> Result<(), MoveError> {
    validate_relocation(field, unit, dest)?;
    let moved = match field.position_of(unit) {
        Some(from) if from == dest => true,
        Some(_) => field.transfer(unit, dest),
        None => field.place_unit(unit, dest),
    };
    if moved {
        Ok(())
    } else {
        Err(MoveError::Occupied(dest))
    }
}

pub fn relocate_to(field: &mut Battlefield, unit: UnitRef, dest: GridPos) -> bool {
    try_relocate(field, unit, dest).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::terrain::CellType;
    use crate::core::types::{HeroId, MonsterId};
    use crate::units::{Attributes, Combatant, Hero, Monster, Roster};

    fn field() -> Battlefield {
        let mut roster = Roster::new();
        roster.add_hero(Hero::new("A", 1, Attributes::new(100.0, 100.0, 100.0)));
        roster.add_hero(Hero::new("B", 1, Attributes::new(100.0, 100.0, 100.0)));
        roster.add_monster(Monster::new("X", 1, 10.0, 0.0, 0.0));
        roster.add_monster(Monster::new("Y", 1, 10.0, 0.0, 0.0));
        Battlefield::new(Board::plain(), roster)
    }

    const H0: UnitRef = UnitRef::Hero(HeroId(0));
    const H1: UnitRef = UnitRef::Hero(HeroId(1));
    const M0: UnitRef = UnitRef::Monster(MonsterId(0));
    const M1: UnitRef = UnitRef::Monster(MonsterId(1));

    #[test]
    fn test_simple_moves() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(6, 0));
        assert!(move_unit(&mut f, H0, Direction::North));
        assert!(move_unit(&mut f, H0, Direction::East));
        assert_eq!(f.position_of(H0), Some(GridPos::new(5, 1)));
    }

    #[test]
    fn test_walls_edges_and_obstacles() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(7, 1));
        assert_eq!(
            try_move_unit(&mut f, H0, Direction::East),
            Err(MoveError::Blocked(GridPos::new(7, 2)))
        );
        assert_eq!(
            try_move_unit(&mut f, H0, Direction::South),
            Err(MoveError::OffBoard(GridPos::new(8, 1)))
        );
        f.board.set_cell_type(GridPos::new(6, 1), CellType::Obstacle);
        assert!(!move_unit(&mut f, H0, Direction::North));
        assert_eq!(f.position_of(H0), Some(GridPos::new(7, 1)));
    }

    #[test]
    fn test_ally_blocks_but_enemy_shares() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(5, 3));
        f.place_unit(H1, GridPos::new(4, 3));
        assert_eq!(
            try_move_unit(&mut f, H0, Direction::North),
            Err(MoveError::Occupied(GridPos::new(4, 3)))
        );
        f.place_unit(M0, GridPos::new(5, 4));
        assert!(move_unit(&mut f, H0, Direction::East));
        assert_eq!(f.board.tile(GridPos::new(5, 4)).hero(), Some(HeroId(0)));
        assert_eq!(f.board.tile(GridPos::new(5, 4)).monster(), Some(MonsterId(0)));
    }

    #[test]
    fn test_hero_cannot_bypass_monster() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(6, 0));
        f.place_unit(M0, GridPos::new(2, 1));
        for _ in 0..3 {
            assert!(move_unit(&mut f, H0, Direction::North));
        }
        assert_eq!(f.position_of(H0), Some(GridPos::new(3, 0)));
        assert_eq!(
            validate_relocation(&f, H0, GridPos::new(1, 0)),
            Err(MoveError::Bypass { blocker_row: 2 })
        );
        // Stepping level with the blocker is allowed, passing it is not
        assert!(move_unit(&mut f, H0, Direction::North));
        assert_eq!(
            try_move_unit(&mut f, H0, Direction::North),
            Err(MoveError::Bypass { blocker_row: 2 })
        );
    }

    #[test]
    fn test_dead_blocker_does_not_hold() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(3, 0));
        f.place_unit(M0, GridPos::new(2, 0));
        assert!(!can_relocate_to(&f, H0, GridPos::new(1, 0)));
        f.roster.monster_mut(MonsterId(0)).unwrap().apply_damage(1000);
        assert!(can_relocate_to(&f, H0, GridPos::new(1, 1)));
    }

    #[test]
    fn test_monster_cannot_bypass_hero() {
        let mut f = field();
        f.place_unit(M0, GridPos::new(1, 4));
        f.place_unit(H0, GridPos::new(3, 3));
        assert!(move_unit(&mut f, M0, Direction::South));
        assert_eq!(
            validate_relocation(&f, M0, GridPos::new(4, 4)),
            Err(MoveError::Bypass { blocker_row: 3 })
        );
        assert!(move_unit(&mut f, M0, Direction::South));
        assert_eq!(f.position_of(M0), Some(GridPos::new(3, 4)));
        assert!(!move_unit(&mut f, M0, Direction::South));
    }

    #[test]
    fn test_other_lanes_do_not_block() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(3, 0));
        f.place_unit(M0, GridPos::new(4, 3));
        assert!(move_unit(&mut f, H0, Direction::North));
    }

    #[test]
    fn test_cross_lane_relocation_checks_destination_lane() {
        let mut f = field();
        f.place_unit(H0, GridPos::new(6, 0));
        f.place_unit(M0, GridPos::new(4, 6));
        assert_eq!(
            validate_relocation(&f, H0, GridPos::new(3, 6)),
            Err(MoveError::Bypass { blocker_row: 4 })
        );
        assert!(relocate_to(&mut f, H0, GridPos::new(5, 7)));
        assert_eq!(f.position_of(H0), Some(GridPos::new(5, 7)));
        assert!(f.board.tile(GridPos::new(6, 0)).hero().is_none());
    }

    #[test]
    fn test_relocate_places_off_board_unit() {
        let mut f = field();
        f.place_unit(M1, GridPos::new(0, 1));
        assert!(relocate_to(&mut f, H1, GridPos::new(7, 0)));
        assert_eq!(f.position_of(H1), Some(GridPos::new(7, 0)));
    }

    #[test]
    fn test_move_transfers_terrain_bonus() {
        let mut f = field();
        f.board.set_cell_type(GridPos::new(5, 0), CellType::Koulou);
        f.place_unit(H0, GridPos::new(6, 0));
        assert!(move_unit(&mut f, H0, Direction::North));
        let hero = f.roster.hero(HeroId(0)).unwrap();
        assert!((hero.strength() - 110.0).abs() < 1e-9);
        assert!(move_unit(&mut f, H0, Direction::North));
        let hero = f.roster.hero(HeroId(0)).unwrap();
        assert!((hero.strength() - 100.0).abs() < 1e-9);
    }
}
