//! Core type definitions used throughout the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a hero in the match roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(pub usize);

/// Index of a monster in the match roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub usize);

/// Which side of the match a unit fights for
///
/// Heroes attack toward row 0, monsters defend it and push toward the
/// last row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Heroes,
    Monsters,
}

impl Faction {
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Heroes => Faction::Monsters,
            Faction::Monsters => Faction::Heroes,
        }
    }
}

/// A handle to any unit on the battlefield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitRef {
    Hero(HeroId),
    Monster(MonsterId),
}

impl UnitRef {
    pub fn faction(&self) -> Faction {
        match self {
            UnitRef::Hero(_) => Faction::Heroes,
            UnitRef::Monster(_) => Faction::Monsters,
        }
    }
}

impl From<HeroId> for UnitRef {
    fn from(id: HeroId) -> Self {
        UnitRef::Hero(id)
    }
}

impl From<MonsterId> for UnitRef {
    fn from(id: MonsterId) -> Self {
        UnitRef::Monster(id)
    }
}

/// A cell coordinate. Signed so that stepping off the edge stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct GridPos {
    pub row: i32,
    pub col: i32,
}

impl GridPos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `dir` (may be off the board)
    pub fn step(&self, dir: Direction) -> GridPos {
        let (dr, dc) = dir.offset();
        GridPos::new(self.row + dr, self.col + dc)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orthogonal step direction. North is toward row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// (row delta, column delta)
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
        }
    }

    /// Parse a compass direction name or its initial (N/S/W/E)
    pub fn from_compass(s: &str) -> Option<Direction> {
        match s.to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Some(Direction::North),
            "S" | "SOUTH" => Some(Direction::South),
            "W" | "WEST" => Some(Direction::West),
            "E" | "EAST" => Some(Direction::East),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        };
        f.write_str(name)
    }
}

/// One of the three two-column corridors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    Top,
    Mid,
    Bot,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Top, Lane::Mid, Lane::Bot];

    pub fn index(&self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Mid => 1,
            Lane::Bot => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Lane> {
        Lane::ALL.get(index).copied()
    }

    /// Parse "top", "mid" or "bot", ignoring case
    pub fn from_name(name: &str) -> Option<Lane> {
        Lane::ALL
            .into_iter()
            .find(|lane| lane.to_string().eq_ignore_ascii_case(name.trim()))
    }

    /// The two board columns belonging to this lane, left to right
    pub fn columns(&self) -> [i32; 2] {
        match self {
            Lane::Top => [0, 1],
            Lane::Mid => [3, 4],
            Lane::Bot => [6, 7],
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lane::Top => "top",
            Lane::Mid => "mid",
            Lane::Bot => "bot",
        };
        f.write_str(name)
    }
}
