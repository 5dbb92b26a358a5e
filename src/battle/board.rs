//! The 8x8 lane board: tile types, occupancy and a unit position index
//!
//! Each tile holds at most one hero and at most one monster. The
//! position index is updated by the same calls that touch tile slots,
//! so the two never disagree.

use ahash::AHashMap;
use rand::Rng;

use crate::battle::constants::{
    COLS, HERO_NEXUS_ROW, LANE_CELL_WEIGHTS, MONSTER_NEXUS_ROW, ROWS, WALL_COLUMNS,
};
use crate::battle::terrain::{CellType, Terrain};
use crate::core::config::TerrainLayout;
use crate::core::error::{Result, ValorError};
use crate::core::types::{Faction, GridPos, HeroId, Lane, MonsterId, UnitRef};

/// One board cell
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    cell: CellType,
    terrain: Option<Terrain>,
    hero: Option<HeroId>,
    monster: Option<MonsterId>,
}

impl Tile {
    pub fn new(cell: CellType) -> Self {
        Self {
            cell,
            terrain: Terrain::for_cell(cell),
            hero: None,
            monster: None,
        }
    }

    pub fn cell_type(&self) -> CellType {
        self.cell
    }

    /// Change the cell type; the terrain behavior follows the new type
    pub fn set_cell_type(&mut self, cell: CellType) {
        self.cell = cell;
        self.terrain = Terrain::for_cell(cell);
    }

    pub fn terrain(&self) -> Option<Terrain> {
        self.terrain
    }

    pub fn hero(&self) -> Option<HeroId> {
        self.hero
    }

    pub fn monster(&self) -> Option<MonsterId> {
        self.monster
    }

    pub fn is_accessible(&self) -> bool {
        self.cell.is_accessible()
    }

    /// The unit in `faction`'s slot
    pub fn occupant(&self, faction: Faction) -> Option<UnitRef> {
        match faction {
            Faction::Heroes => self.hero.map(UnitRef::Hero),
            Faction::Monsters => self.monster.map(UnitRef::Monster),
        }
    }

    /// Accessible and `faction`'s slot is free
    pub fn is_open_for(&self, faction: Faction) -> bool {
        self.is_accessible() && self.occupant(faction).is_none()
    }
}

/// Draw a lane cell from the weighted plain/bush/cave/koulou/obstacle mix
fn random_lane_cell<R: Rng + ?Sized>(rng: &mut R) -> CellType {
    const KINDS: [CellType; 5] = [
        CellType::Plain,
        CellType::Bush,
        CellType::Cave,
        CellType::Koulou,
        CellType::Obstacle,
    ];
    let total: u32 = LANE_CELL_WEIGHTS.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (kind, weight) in KINDS.iter().zip(LANE_CELL_WEIGHTS) {
        if roll < weight {
            return *kind;
        }
        roll -= weight;
    }
    CellType::Plain
}

#[derive(Debug, Clone)]
pub struct Board {
    tiles: Vec<Tile>,
    positions: AHashMap<UnitRef, GridPos>,
}

impl Board {
    fn from_cells(mut cell_at: impl FnMut(GridPos) -> CellType) -> Self {
        let mut tiles = Vec::with_capacity((ROWS * COLS) as usize);
        for row in 0..ROWS {
            for col in 0..COLS {
                let pos = GridPos::new(row, col);
                let cell = if WALL_COLUMNS.contains(&col) {
                    CellType::Inaccessible
                } else if row == MONSTER_NEXUS_ROW || row == HERO_NEXUS_ROW {
                    CellType::Nexus
                } else {
                    cell_at(pos)
                };
                tiles.push(Tile::new(cell));
            }
        }
        Self {
            tiles,
            positions: AHashMap::new(),
        }
    }

    /// A board with walls and nexus rows in place and every lane cell plain
    pub fn plain() -> Self {
        Self::from_cells(|_| CellType::Plain)
    }

    /// Generate a board. Random layouts draw each lane cell from the
    /// weighted plain/bush/cave/koulou/obstacle mix.
    pub fn generate<R: Rng + ?Sized>(layout: TerrainLayout, rng: &mut R) -> Self {
        match layout {
            TerrainLayout::Plain => Self::plain(),
            TerrainLayout::Random => Self::from_cells(|_| random_lane_cell(rng)),
        }
    }

    /// Parse a layout of ROWS lines of COLS cell symbols (see
    /// [`CellType::symbol`]). Wall columns must be `X`.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        if rows.len() != ROWS as usize {
            return Err(ValorError::InvalidLayout(format!(
                "expected {} rows, got {}",
                ROWS,
                rows.len()
            )));
        }
        let mut tiles = Vec::with_capacity((ROWS * COLS) as usize);
        for (r, line) in rows.iter().enumerate() {
            let symbols: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != COLS as usize {
                return Err(ValorError::InvalidLayout(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    symbols.len(),
                    COLS
                )));
            }
            for (c, symbol) in symbols.into_iter().enumerate() {
                let cell = CellType::from_symbol(symbol).ok_or_else(|| {
                    ValorError::InvalidLayout(format!("unknown cell '{}' at ({}, {})", symbol, r, c))
                })?;
                if WALL_COLUMNS.contains(&(c as i32)) && cell != CellType::Inaccessible {
                    return Err(ValorError::InvalidLayout(format!(
                        "wall column {} must be inaccessible at row {}",
                        c, r
                    )));
                }
                tiles.push(Tile::new(cell));
            }
        }
        Ok(Self {
            tiles,
            positions: AHashMap::new(),
        })
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        (0..ROWS).contains(&pos.row) && (0..COLS).contains(&pos.col)
    }

    fn index(pos: GridPos) -> usize {
        (pos.row * COLS + pos.col) as usize
    }

    /// Tile at `pos`.
    ///
    /// # Panics
    /// If `pos` is off the board; check [`Board::in_bounds`] first.
    pub fn tile(&self, pos: GridPos) -> &Tile {
        assert!(self.in_bounds(pos), "tile {} is off the board", pos);
        &self.tiles[Self::index(pos)]
    }

    /// Tile at `pos`, or `None` off the board
    pub fn get(&self, pos: GridPos) -> Option<&Tile> {
        self.in_bounds(pos).then(|| &self.tiles[Self::index(pos)])
    }

    /// Change a cell's type. Occupants are untouched.
    pub fn set_cell_type(&mut self, pos: GridPos, cell: CellType) {
        assert!(self.in_bounds(pos), "tile {} is off the board", pos);
        self.tiles[Self::index(pos)].set_cell_type(cell);
    }

    /// Lane containing `col`, or `None` for wall columns and off-board columns
    pub fn lane_of(col: i32) -> Option<Lane> {
        Lane::ALL.into_iter().find(|lane| lane.columns().contains(&col))
    }

    /// Heroes' spawn cells for `lane`: primary first, then the alternate column
    pub fn home_spawn_cells(lane: Lane) -> [GridPos; 2] {
        let [left, right] = lane.columns();
        [
            GridPos::new(HERO_NEXUS_ROW, left),
            GridPos::new(HERO_NEXUS_ROW, right),
        ]
    }

    /// Monsters' spawn cells for `lane`: primary first, then the alternate column
    pub fn enemy_spawn_cells(lane: Lane) -> [GridPos; 2] {
        let [left, right] = lane.columns();
        [
            GridPos::new(MONSTER_NEXUS_ROW, right),
            GridPos::new(MONSTER_NEXUS_ROW, left),
        ]
    }

    pub fn position_of(&self, unit: UnitRef) -> Option<GridPos> {
        self.positions.get(&unit).copied()
    }

    /// Put `unit` into its slot at `pos`.
    ///
    /// Fails without side effects if the cell is off the board or
    /// inaccessible, the slot is taken, or the unit is already placed.
    /// Terrain hooks are not run here; go through `Battlefield` for that.
    pub fn occupy(&mut self, unit: UnitRef, pos: GridPos) -> bool {
        if !self.in_bounds(pos) || self.positions.contains_key(&unit) {
            return false;
        }
        let tile = &mut self.tiles[Self::index(pos)];
        if !tile.is_open_for(unit.faction()) {
            return false;
        }
        match unit {
            UnitRef::Hero(id) => tile.hero = Some(id),
            UnitRef::Monster(id) => tile.monster = Some(id),
        }
        self.positions.insert(unit, pos);
        true
    }

    /// Take `unit` off the board, returning where it stood
    pub fn vacate(&mut self, unit: UnitRef) -> Option<GridPos> {
        let pos = self.positions.remove(&unit)?;
        let tile = &mut self.tiles[Self::index(pos)];
        match unit {
            UnitRef::Hero(_) => tile.hero = None,
            UnitRef::Monster(_) => tile.monster = None,
        }
        Some(pos)
    }

    /// Every placed unit with its position, in row-major board order
    pub fn occupants(&self) -> Vec<(UnitRef, GridPos)> {
        let mut placed: Vec<_> = self.positions.iter().map(|(u, p)| (*u, *p)).collect();
        placed.sort_by_key(|(unit, pos)| (*pos, unit.faction() == Faction::Monsters));
        placed
    }

    /// Placed units of `faction` standing in `lane`
    pub fn units_in_lane(&self, lane: Lane, faction: Faction) -> Vec<(UnitRef, GridPos)> {
        self.occupants()
            .into_iter()
            .filter(|(unit, pos)| unit.faction() == faction && Self::lane_of(pos.col) == Some(lane))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_plain_board_geometry() {
        let board = Board::plain();
        for row in 0..ROWS {
            for col in WALL_COLUMNS {
                assert_eq!(board.tile(GridPos::new(row, col)).cell_type(), CellType::Inaccessible);
            }
        }
        assert_eq!(board.tile(GridPos::new(0, 0)).cell_type(), CellType::Nexus);
        assert_eq!(board.tile(GridPos::new(7, 7)).cell_type(), CellType::Nexus);
        assert_eq!(board.tile(GridPos::new(3, 4)).cell_type(), CellType::Plain);
    }

    #[test]
    fn test_random_board_keeps_walls_and_nexus() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let board = Board::generate(TerrainLayout::Random, &mut rng);
        for col in 0..COLS {
            let top = board.tile(GridPos::new(0, col)).cell_type();
            let bottom = board.tile(GridPos::new(ROWS - 1, col)).cell_type();
            if WALL_COLUMNS.contains(&col) {
                assert_eq!(top, CellType::Inaccessible);
            } else {
                assert_eq!(top, CellType::Nexus);
                assert_eq!(bottom, CellType::Nexus);
            }
        }
    }

    #[test]
    fn test_lane_of() {
        assert_eq!(Board::lane_of(0), Some(Lane::Top));
        assert_eq!(Board::lane_of(1), Some(Lane::Top));
        assert_eq!(Board::lane_of(2), None);
        assert_eq!(Board::lane_of(4), Some(Lane::Mid));
        assert_eq!(Board::lane_of(5), None);
        assert_eq!(Board::lane_of(6), Some(Lane::Bot));
        assert_eq!(Board::lane_of(8), None);
    }

    #[test]
    fn test_spawn_cells() {
        assert_eq!(
            Board::home_spawn_cells(Lane::Mid),
            [GridPos::new(7, 3), GridPos::new(7, 4)]
        );
        assert_eq!(
            Board::enemy_spawn_cells(Lane::Bot),
            [GridPos::new(0, 7), GridPos::new(0, 6)]
        );
    }

    #[test]
    fn test_occupancy_slots() {
        let mut board = Board::plain();
        let pos = GridPos::new(4, 0);
        let hero = UnitRef::Hero(HeroId(0));
        let other = UnitRef::Hero(HeroId(1));
        let monster = UnitRef::Monster(MonsterId(0));

        assert!(board.occupy(hero, pos));
        assert!(!board.occupy(other, pos));
        assert!(board.occupy(monster, pos));
        assert_eq!(board.tile(pos).hero(), Some(HeroId(0)));
        assert_eq!(board.tile(pos).monster(), Some(MonsterId(0)));
        assert_eq!(board.position_of(monster), Some(pos));

        assert_eq!(board.vacate(hero), Some(pos));
        assert!(board.tile(pos).hero().is_none());
        assert!(board.position_of(hero).is_none());
        assert_eq!(board.vacate(hero), None);
    }

    #[test]
    fn test_cannot_occupy_walls_or_obstacles() {
        let mut board = Board::plain();
        let hero = UnitRef::Hero(HeroId(0));
        assert!(!board.occupy(hero, GridPos::new(3, 2)));
        board.set_cell_type(GridPos::new(3, 1), CellType::Obstacle);
        assert!(!board.occupy(hero, GridPos::new(3, 1)));
        assert!(!board.occupy(hero, GridPos::new(-1, 0)));
        assert!(board.position_of(hero).is_none());
    }

    #[test]
    fn test_set_cell_type_refreshes_terrain() {
        let mut board = Board::plain();
        let pos = GridPos::new(2, 3);
        board.set_cell_type(pos, CellType::Koulou);
        assert_eq!(board.tile(pos).terrain(), Some(Terrain::Koulou));
        board.set_cell_type(pos, CellType::Plain);
        assert_eq!(board.tile(pos).terrain(), None);
    }

    #[test]
    fn test_from_rows() {
        let board = Board::from_rows(&[
            "NNXNNXNN", "BCX..XKO", "..X..X..", "..X..X..", "..X..X..", "..X..X..", "..X..X..",
            "NNXNNXNN",
        ])
        .unwrap();
        assert_eq!(board.tile(GridPos::new(1, 0)).cell_type(), CellType::Bush);
        assert_eq!(board.tile(GridPos::new(1, 7)).cell_type(), CellType::Obstacle);
    }

    #[test]
    fn test_from_rows_rejects_open_wall() {
        let err = Board::from_rows(&[
            "NNNNNXNN", "..X..X..", "..X..X..", "..X..X..", "..X..X..", "..X..X..", "..X..X..",
            "NNXNNXNN",
        ])
        .unwrap_err();
        assert!(matches!(err, ValorError::InvalidLayout(_)));
    }

    #[test]
    #[should_panic]
    fn test_tile_out_of_range_panics() {
        Board::plain().tile(GridPos::new(8, 0));
    }
}
