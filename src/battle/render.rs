//! Text rendering of the board
//!
//! The library only decides what each cell shows; coloring is up to the
//! front end.

use crate::battle::board::Tile;
use crate::battle::constants::{COLS, ROWS};
use crate::battle::field::Battlefield;
use crate::battle::terrain::CellType;
use crate::core::types::{GridPos, HeroId, MonsterId};

/// What a cell shows, by priority: both factions, hero, monster, terrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellGlyph {
    Contested { hero: HeroId, monster: MonsterId },
    Hero(HeroId),
    Monster(MonsterId),
    Terrain(CellType),
}

impl CellGlyph {
    pub fn symbol(&self) -> char {
        match self {
            CellGlyph::Contested { .. } => '*',
            CellGlyph::Hero(_) => 'H',
            CellGlyph::Monster(_) => 'M',
            CellGlyph::Terrain(cell) => cell.symbol(),
        }
    }
}

pub fn cell_glyph(tile: &Tile) -> CellGlyph {
    match (tile.hero(), tile.monster()) {
        (Some(hero), Some(monster)) => CellGlyph::Contested { hero, monster },
        (Some(hero), None) => CellGlyph::Hero(hero),
        (None, Some(monster)) => CellGlyph::Monster(monster),
        (None, None) => CellGlyph::Terrain(tile.cell_type()),
    }
}

/// Glyph rows, north first
pub fn glyph_rows(field: &Battlefield) -> Vec<Vec<CellGlyph>> {
    (0..ROWS)
        .map(|row| {
            (0..COLS)
                .map(|col| cell_glyph(field.board.tile(GridPos::new(row, col))))
                .collect()
        })
        .collect()
}

/// Plain-text board with row and column headers
pub fn render_board(field: &Battlefield) -> String {
    let mut out = String::from("   ");
    for col in 0..COLS {
        out.push_str(&format!(" {}", col));
    }
    out.push('\n');
    for (row, glyphs) in glyph_rows(field).iter().enumerate() {
        out.push_str(&format!("{:>2} ", row));
        for glyph in glyphs {
            out.push(' ');
            out.push(glyph.symbol());
        }
        out.push('\n');
    }
    out
}

/// One line per live unit: name, position and HP
pub fn unit_listing(field: &Battlefield) -> Vec<String> {
    field
        .board
        .occupants()
        .into_iter()
        .filter_map(|(unit, pos)| {
            let c = field.unit(unit)?;
            Some(format!("{} {} HP {} at {}", c.name(), c.level(), c.hp(), pos))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::board::Board;
    use crate::core::types::UnitRef;
    use crate::units::{Attributes, Hero, Monster, Roster};

    fn field() -> Battlefield {
        let mut roster = Roster::new();
        roster.add_hero(Hero::new("Gaerdal", 1, Attributes::default()));
        roster.add_monster(Monster::new("Imp", 1, 10.0, 0.0, 0.0));
        roster.add_monster(Monster::new("Ogre", 1, 10.0, 0.0, 0.0));
        Battlefield::new(Board::plain(), roster)
    }

    #[test]
    fn test_glyph_priority() {
        let mut f = field();
        f.place_unit(UnitRef::Hero(HeroId(0)), GridPos::new(4, 0));
        f.place_unit(UnitRef::Monster(MonsterId(0)), GridPos::new(4, 0));
        f.place_unit(UnitRef::Monster(MonsterId(1)), GridPos::new(3, 1));

        let rows = glyph_rows(&f);
        assert_eq!(rows[4][0].symbol(), '*');
        assert_eq!(rows[3][1], CellGlyph::Monster(MonsterId(1)));
        assert_eq!(rows[0][0], CellGlyph::Terrain(CellType::Nexus));
        assert_eq!(rows[2][2].symbol(), 'X');
    }

    #[test]
    fn test_render_board_layout() {
        let mut f = field();
        f.place_unit(UnitRef::Hero(HeroId(0)), GridPos::new(7, 0));
        let text = render_board(&f);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS as usize + 1);
        assert_eq!(lines[8], " 7  H N X N N X N N");
        assert_eq!(lines[3], " 2  . . X . . X . .");
        assert_eq!(unit_listing(&f), vec!["Gaerdal 1 HP 100 at (7, 0)".to_string()]);
    }
}
