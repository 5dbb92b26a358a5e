//! Cell types and the stat bonuses of terrain tiles
//!
//! Three cell types boost one hero stat while occupied. The bonus is an
//! additive layer kept on the unit, so leaving a tile removes exactly
//! what entering added.

use serde::{Deserialize, Serialize};

use crate::battle::constants::TERRAIN_BONUS;
use crate::units::{Combatant, Stat};

/// What a board cell is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CellType {
    /// Spawn row of either side
    Nexus,
    /// Lane-separating wall
    Inaccessible,
    /// Blocks movement until removed, then becomes plain
    Obstacle,
    #[default]
    Plain,
    /// Boosts dexterity
    Bush,
    /// Boosts agility
    Cave,
    /// Boosts strength
    Koulou,
}

impl CellType {
    pub fn is_accessible(&self) -> bool {
        !matches!(self, CellType::Inaccessible | CellType::Obstacle)
    }

    /// Single-character map symbol
    pub fn symbol(&self) -> char {
        match self {
            CellType::Nexus => 'N',
            CellType::Inaccessible => 'X',
            CellType::Obstacle => 'O',
            CellType::Plain => '.',
            CellType::Bush => 'B',
            CellType::Cave => 'C',
            CellType::Koulou => 'K',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellType> {
        match symbol.to_ascii_uppercase() {
            'N' => Some(CellType::Nexus),
            'X' => Some(CellType::Inaccessible),
            'O' => Some(CellType::Obstacle),
            '.' | 'P' => Some(CellType::Plain),
            'B' => Some(CellType::Bush),
            'C' => Some(CellType::Cave),
            'K' => Some(CellType::Koulou),
            _ => None,
        }
    }
}

/// A stat-bonus behavior attached to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Bush,
    Cave,
    Koulou,
}

impl Terrain {
    /// The terrain behavior of a cell type, if it has one
    pub fn for_cell(cell: CellType) -> Option<Terrain> {
        match cell {
            CellType::Bush => Some(Terrain::Bush),
            CellType::Cave => Some(Terrain::Cave),
            CellType::Koulou => Some(Terrain::Koulou),
            _ => None,
        }
    }

    pub fn boosted_stat(&self) -> Stat {
        match self {
            Terrain::Bush => Stat::Dexterity,
            Terrain::Cave => Stat::Agility,
            Terrain::Koulou => Stat::Strength,
        }
    }

    pub fn on_enter(&self, unit: &mut dyn Combatant) {
        unit.enter_terrain(self.boosted_stat(), TERRAIN_BONUS);
    }

    pub fn on_exit(&self, unit: &mut dyn Combatant) {
        unit.leave_terrain();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Attributes, Hero};

    fn scout() -> Hero {
        Hero::new("Scout", 1, Attributes::new(300.0, 400.0, 500.0))
    }

    #[test]
    fn test_only_three_cells_carry_terrain() {
        assert_eq!(Terrain::for_cell(CellType::Bush), Some(Terrain::Bush));
        assert_eq!(Terrain::for_cell(CellType::Cave), Some(Terrain::Cave));
        assert_eq!(Terrain::for_cell(CellType::Koulou), Some(Terrain::Koulou));
        for cell in [
            CellType::Nexus,
            CellType::Inaccessible,
            CellType::Obstacle,
            CellType::Plain,
        ] {
            assert!(Terrain::for_cell(cell).is_none());
        }
    }

    #[test]
    fn test_enter_multiplies_stat() {
        let mut hero = scout();
        Terrain::Cave.on_enter(&mut hero);
        assert!((hero.agility() - 550.0).abs() < 1e-9);
        assert_eq!(hero.dexterity(), 400.0);
    }

    #[test]
    fn test_enter_exit_roundtrip() {
        let mut hero = scout();
        for terrain in [Terrain::Bush, Terrain::Cave, Terrain::Koulou] {
            let stat = terrain.boosted_stat();
            let before = hero.stat(stat);
            terrain.on_enter(&mut hero);
            terrain.on_exit(&mut hero);
            assert!((hero.stat(stat) - before).abs() < 1e-9);
        }
    }

    #[test]
    fn test_accessibility() {
        assert!(CellType::Nexus.is_accessible());
        assert!(CellType::Koulou.is_accessible());
        assert!(!CellType::Obstacle.is_accessible());
        assert!(!CellType::Inaccessible.is_accessible());
    }

    #[test]
    fn test_symbols_roundtrip() {
        for cell in [
            CellType::Nexus,
            CellType::Inaccessible,
            CellType::Obstacle,
            CellType::Plain,
            CellType::Bush,
            CellType::Cave,
            CellType::Koulou,
        ] {
            assert_eq!(CellType::from_symbol(cell.symbol()), Some(cell));
        }
    }
}
