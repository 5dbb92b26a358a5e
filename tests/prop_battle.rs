//! Property-based tests for movement, terrain and scoring.

use proptest::prelude::*;

use legends_valor::battle::{move_unit, parse_command, Battlefield, Board, CellType, MatchOutcome};
use legends_valor::core::types::{Direction, GridPos, HeroId, Lane, MonsterId, UnitRef};
use legends_valor::stats::{MatchStats, StatsSink};
use legends_valor::units::{Attributes, Hero, Monster, Roster};

const H0: UnitRef = UnitRef::Hero(HeroId(0));
const M0: UnitRef = UnitRef::Monster(MonsterId(0));

fn duel_field(base: Attributes) -> Battlefield {
    let mut roster = Roster::new();
    roster.add_hero(Hero::new("Hero", 1, base));
    roster.add_monster(Monster::new("Monster", 1, 10.0, 0.0, 0.0));
    Battlefield::new(Board::plain(), roster)
}

fn lane_strategy() -> impl Strategy<Value = Lane> {
    prop_oneof![Just(Lane::Top), Just(Lane::Mid), Just(Lane::Bot)]
}

fn lane_cell_strategy() -> impl Strategy<Value = CellType> {
    prop_oneof![
        Just(CellType::Plain),
        Just(CellType::Bush),
        Just(CellType::Cave),
        Just(CellType::Koulou),
    ]
}

proptest! {
    /// A hero marching north stops level with the nearest monster in its
    /// lane and never gets past it.
    #[test]
    fn prop_hero_never_passes_monster(
        lane in lane_strategy(),
        hero_side in 0usize..2,
        monster_side in 0usize..2,
        monster_row in 1i32..7,
        gap in 1i32..7,
    ) {
        let hero_row = (monster_row + gap).min(7);
        prop_assume!(hero_row > monster_row);
        let cols = lane.columns();

        let mut f = duel_field(Attributes::default());
        prop_assert!(f.place_unit(H0, GridPos::new(hero_row, cols[hero_side])));
        prop_assert!(f.place_unit(M0, GridPos::new(monster_row, cols[monster_side])));

        for _ in 0..8 {
            move_unit(&mut f, H0, Direction::North);
        }
        let pos = f.position_of(H0).unwrap();
        prop_assert_eq!(pos.row, monster_row);
        prop_assert!(!move_unit(&mut f, H0, Direction::North));
    }

    /// Mirror image: a monster marching south stops level with the hero.
    #[test]
    fn prop_monster_never_passes_hero(
        lane in lane_strategy(),
        hero_side in 0usize..2,
        monster_side in 0usize..2,
        hero_row in 1i32..7,
        gap in 1i32..7,
    ) {
        let monster_row = (hero_row - gap).max(0);
        prop_assume!(monster_row < hero_row);
        let cols = lane.columns();

        let mut f = duel_field(Attributes::default());
        prop_assert!(f.place_unit(H0, GridPos::new(hero_row, cols[hero_side])));
        prop_assert!(f.place_unit(M0, GridPos::new(monster_row, cols[monster_side])));

        for _ in 0..8 {
            move_unit(&mut f, M0, Direction::South);
        }
        prop_assert_eq!(f.position_of(M0).unwrap().row, hero_row);
        prop_assert!(!move_unit(&mut f, M0, Direction::South));
    }

    /// Walking through any mix of terrain leaves the hero's stats exactly
    /// at base once it steps onto an unboosted cell.
    #[test]
    fn prop_terrain_bonus_round_trips(
        cells in proptest::collection::vec(lane_cell_strategy(), 6),
        strength in 1.0f64..1000.0,
        dexterity in 1.0f64..1000.0,
        agility in 1.0f64..1000.0,
    ) {
        let base = Attributes::new(strength, dexterity, agility);
        let mut f = duel_field(base);
        for (i, cell) in cells.iter().enumerate() {
            f.board.set_cell_type(GridPos::new(i as i32 + 1, 0), *cell);
        }
        prop_assert!(f.place_unit(H0, GridPos::new(7, 0)));

        for row in (0..7).rev() {
            prop_assert!(move_unit(&mut f, H0, Direction::North));
            let hero = f.roster.hero(HeroId(0)).unwrap();
            let cell = f.board.tile(GridPos::new(row, 0)).cell_type();
            let boost = |boosted: CellType| if cell == boosted { 1.1 } else { 1.0 };
            prop_assert!((hero.strength() - strength * boost(CellType::Koulou)).abs() < 1e-9);
            prop_assert!((hero.dexterity() - dexterity * boost(CellType::Bush)).abs() < 1e-9);
            prop_assert!((hero.agility() - agility * boost(CellType::Cave)).abs() < 1e-9);
        }

        let hero = f.roster.hero(HeroId(0)).unwrap();
        prop_assert_eq!(hero.strength(), strength);
        prop_assert_eq!(hero.dexterity(), dexterity);
        prop_assert_eq!(hero.agility(), agility);
    }

    /// The party score is never negative.
    #[test]
    fn prop_score_is_non_negative(
        kills in 0u32..20,
        faints in 0u32..20,
        dealt in 0i32..5000,
        taken in 0i32..5000,
        rounds in 0u32..500,
    ) {
        let mut stats = MatchStats::new(["Hero"]);
        for _ in 0..kills {
            stats.record_kill(HeroId(0));
        }
        for _ in 0..faints {
            stats.record_faint(HeroId(0));
        }
        stats.record_damage_dealt(HeroId(0), dealt);
        stats.record_damage_taken(HeroId(0), taken);
        stats.set_rounds(rounds);

        for outcome in [MatchOutcome::AttackerWin, MatchOutcome::DefenderWin, MatchOutcome::Aborted] {
            prop_assert!(stats.compute_score(outcome) >= 0);
        }
    }

    /// Command parsing never panics on arbitrary input.
    #[test]
    fn prop_parse_command_no_panic(input in ".{0,24}") {
        let _ = parse_command(&input);
    }
}
