//! Initial hero placement and periodic monster reinforcement

use rand::RngCore;

use crate::battle::board::Board;
use crate::battle::field::Battlefield;
use crate::core::types::{Faction, HeroId, Lane, MonsterId, UnitRef};
use crate::units::MonsterFactory;

/// Place every hero on its lane's home spawn cell.
///
/// `lanes` gives each hero's lane explicitly; when it is `None` (or too
/// short) heroes fill lanes in party order. A hero whose primary and
/// alternate spawn cells are both taken is skipped with a warning.
/// Returns the heroes that were placed.
pub fn place_heroes(field: &mut Battlefield, lanes: Option<&[Lane]>) -> Vec<HeroId> {
    let heroes: Vec<HeroId> = field.roster.hero_ids().collect();
    let mut placed = Vec::with_capacity(heroes.len());

    for (i, hero) in heroes.into_iter().enumerate() {
        let lane = lanes
            .and_then(|l| l.get(i).copied())
            .or_else(|| Lane::from_index(i % Lane::ALL.len()))
            .unwrap_or(Lane::Mid);
        field.assign_home_lane(hero, lane);

        let spot = Board::home_spawn_cells(lane)
            .into_iter()
            .find(|pos| field.place_unit(UnitRef::Hero(hero), *pos));
        match spot {
            Some(pos) => {
                tracing::info!(?hero, %lane, %pos, "hero placed");
                placed.push(hero);
            }
            None => tracing::warn!(?hero, %lane, "no free spawn cell, hero not placed"),
        }
    }
    placed
}

/// Spawn up to one monster per lane on the lane's enemy spawn cell.
///
/// Lanes whose spawn cell already holds a monster are skipped for this
/// wave. New monsters are generated at `level`. Returns the spawned
/// monsters.
pub fn spawn_wave(
    field: &mut Battlefield,
    factory: &mut dyn MonsterFactory,
    level: u32,
    rng: &mut dyn RngCore,
) -> Vec<MonsterId> {
    let mut spawned = Vec::new();
    for lane in Lane::ALL {
        let [cell, _] = Board::enemy_spawn_cells(lane);
        if !field.board.tile(cell).is_open_for(Faction::Monsters) {
            tracing::debug!(%lane, "enemy spawn cell occupied, skipping lane");
            continue;
        }
        let Some(monster) = factory.generate(level, rng) else {
            tracing::warn!(%lane, level, "monster factory produced nothing");
            continue;
        };
        let name = monster.name.clone();
        let id = field.roster.add_monster(monster);
        if field.place_unit(UnitRef::Monster(id), cell) {
            tracing::info!(monster = %name, %lane, "monster spawned");
            spawned.push(id);
        }
    }
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;
    use crate::units::{Attributes, Hero, Monster, Roster};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Fixed;

    impl MonsterFactory for Fixed {
        fn generate(&mut self, level: u32, _rng: &mut dyn RngCore) -> Option<Monster> {
            Some(Monster::new("Grunt", level, 100.0, 0.0, 0.0))
        }
    }

    fn party(n: usize) -> Battlefield {
        let mut roster = Roster::new();
        for i in 0..n {
            roster.add_hero(Hero::new(format!("H{}", i), 1, Attributes::default()));
        }
        Battlefield::new(Board::plain(), roster)
    }

    #[test]
    fn test_index_order_placement() {
        let mut f = party(3);
        let placed = place_heroes(&mut f, None);
        assert_eq!(placed.len(), 3);
        assert_eq!(f.position_of(UnitRef::Hero(HeroId(0))), Some(GridPos::new(7, 0)));
        assert_eq!(f.position_of(UnitRef::Hero(HeroId(1))), Some(GridPos::new(7, 3)));
        assert_eq!(f.position_of(UnitRef::Hero(HeroId(2))), Some(GridPos::new(7, 6)));
        assert_eq!(f.home_lane(HeroId(2)), Lane::Bot);
    }

    #[test]
    fn test_explicit_lanes_fall_back_to_alternate() {
        let mut f = party(3);
        let placed = place_heroes(&mut f, Some(&[Lane::Bot, Lane::Bot, Lane::Bot]));
        assert_eq!(placed, vec![HeroId(0), HeroId(1)]);
        assert_eq!(f.position_of(UnitRef::Hero(HeroId(1))), Some(GridPos::new(7, 7)));
        assert!(f.position_of(UnitRef::Hero(HeroId(2))).is_none());
        assert_eq!(f.home_lane(HeroId(2)), Lane::Bot);
    }

    #[test]
    fn test_wave_skips_occupied_lanes() {
        let mut f = party(0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let first = spawn_wave(&mut f, &mut Fixed, 2, &mut rng);
        assert_eq!(first.len(), 3);
        assert_eq!(f.position_of(UnitRef::Monster(first[0])), Some(GridPos::new(0, 1)));

        // Mid lane's monster walks off its spawn cell
        f.remove_unit(UnitRef::Monster(first[1]));
        f.place_unit(UnitRef::Monster(first[1]), GridPos::new(1, 4));
        let second = spawn_wave(&mut f, &mut Fixed, 2, &mut rng);
        assert_eq!(second.len(), 1);
        assert_eq!(f.position_of(UnitRef::Monster(second[0])), Some(GridPos::new(0, 4)));
        assert_eq!(f.roster.monster_count(), 4);
    }
}
