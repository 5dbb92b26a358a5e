//! Round orchestration
//!
//! A round is: every hero acts once in party order (asked again until an
//! action is consumed), then every live monster acts once, then the
//! end-of-round bookkeeping runs. The attacker win check follows each
//! hero action; the defender check follows the monster phase.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::actions::{execute, ActionContext, ActionReport, Market, TurnResult};
use crate::battle::ai::{take_monster_turn, MonsterAction};
use crate::battle::board::Board;
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::field::Battlefield;
use crate::battle::input::{CommandSource, TurnPrompt};
use crate::battle::movement::{can_relocate_to, try_relocate};
use crate::battle::spawner::{place_heroes, spawn_wave};
use crate::core::config::MatchConfig;
use crate::core::error::{Result, ValorError};
use crate::core::types::{HeroId, Lane, MonsterId, UnitRef};
use crate::stats::{MatchStats, MatchSummary};
use crate::units::{Hero, MonsterFactory, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// A hero reached the monsters' nexus
    AttackerWin,
    /// A monster reached the heroes' nexus
    DefenderWin,
    /// Quit, or the round limit ran out
    Aborted,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::AttackerWin => write!(f, "heroes win"),
            MatchOutcome::DefenderWin => write!(f, "monsters win"),
            MatchOutcome::Aborted => write!(f, "match aborted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoundPhase {
    #[default]
    Setup,
    Heroes,
    Monsters,
    EndOfRound,
    Finished,
}

fn market_ref(market: &mut Option<Box<dyn Market>>) -> Option<&mut dyn Market> {
    market.as_mut().map(|m| &mut **m as &mut dyn Market)
}

pub struct TurnManager {
    field: Battlefield,
    config: MatchConfig,
    factory: Box<dyn MonsterFactory>,
    market: Option<Box<dyn Market>>,
    rng: ChaCha8Rng,
    seed: u64,
    stats: MatchStats,
    log: BattleEventLog,
    round: u32,
    phase: RoundPhase,
    outcome: Option<MatchOutcome>,
}

/// Build a ready-to-play match: generate the board, place the party and
/// spawn the opening wave.
///
/// `lanes`, when given, assigns each hero its home lane and must name a
/// distinct lane per hero.
pub fn new_match(
    config: MatchConfig,
    party: Vec<Hero>,
    lanes: Option<&[Lane]>,
    factory: Box<dyn MonsterFactory>,
) -> Result<TurnManager> {
    config.validate().map_err(ValorError::InvalidConfig)?;
    if party.is_empty() {
        return Err(ValorError::InvalidParty("party is empty".into()));
    }
    if party.len() > config.max_party_size {
        return Err(ValorError::InvalidParty(format!(
            "{} heroes, at most {} allowed",
            party.len(),
            config.max_party_size
        )));
    }
    if let Some(lanes) = lanes {
        if lanes.len() != party.len() {
            return Err(ValorError::InvalidParty(format!(
                "{} lanes given for {} heroes",
                lanes.len(),
                party.len()
            )));
        }
        if lanes.iter().enumerate().any(|(i, l)| lanes[..i].contains(l)) {
            return Err(ValorError::InvalidParty("lanes must be distinct".into()));
        }
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let board = Board::generate(config.terrain, &mut rng);
    let mut roster = Roster::new();
    for hero in party {
        roster.add_hero(hero);
    }

    let mut manager = TurnManager::assemble(Battlefield::new(board, roster), config, factory, rng, seed);
    manager.setup(lanes);
    Ok(manager)
}

impl TurnManager {
    /// Wrap an already prepared battlefield. Units stay where they are;
    /// call [`TurnManager::setup`] to place the party and spawn a wave.
    pub fn new(field: Battlefield, config: MatchConfig, factory: Box<dyn MonsterFactory>) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        Self::assemble(field, config, factory, rng, seed)
    }

    fn assemble(
        field: Battlefield,
        config: MatchConfig,
        factory: Box<dyn MonsterFactory>,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Self {
        let stats = MatchStats::new(field.roster.heroes().iter().map(|h| h.name.clone()));
        Self {
            field,
            config,
            factory,
            market: None,
            rng,
            seed,
            stats,
            log: BattleEventLog::new(),
            round: 0,
            phase: RoundPhase::Setup,
            outcome: None,
        }
    }

    pub fn set_market(&mut self, market: Box<dyn Market>) {
        self.market = Some(market);
    }

    /// Place heroes on their home spawn cells and spawn the opening wave
    pub fn setup(&mut self, lanes: Option<&[Lane]>) {
        let placed = place_heroes(&mut self.field, lanes);
        let spawned = self.spawn_reinforcements();
        tracing::info!(heroes = placed.len(), monsters = spawned, seed = self.seed, "match started");
        self.log.push(
            BattleEventType::MatchStarted,
            format!("{} heroes take the field against {} monsters", placed.len(), spawned),
            0,
        );
        self.phase = RoundPhase::Heroes;
    }

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut Battlefield {
        &mut self.field
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn log(&self) -> &BattleEventLog {
        &self.log
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Play rounds until the match ends
    pub fn run(&mut self, input: &mut dyn CommandSource) -> MatchOutcome {
        loop {
            if let Some(outcome) = self.play_round(input) {
                return outcome;
            }
        }
    }

    /// Play one full round. Returns the outcome once the match is over.
    pub fn play_round(&mut self, input: &mut dyn CommandSource) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.round += 1;
        self.stats.set_rounds(self.round);
        tracing::debug!(round = self.round, "round begins");

        self.phase = RoundPhase::Heroes;
        let heroes: Vec<HeroId> = self.field.roster.hero_ids().collect();
        for hero in heroes {
            let unit = UnitRef::Hero(hero);
            if !self.field.is_alive(unit) || self.field.position_of(unit).is_none() {
                continue;
            }
            if self.hero_turn(hero, input) == TurnResult::Aborted {
                return Some(self.finish(MatchOutcome::Aborted));
            }
            if self.field.attackers_reached_goal() {
                return Some(self.finish(MatchOutcome::AttackerWin));
            }
        }

        self.phase = RoundPhase::Monsters;
        self.monster_phase();
        if self.field.defenders_reached_goal() {
            return Some(self.finish(MatchOutcome::DefenderWin));
        }

        self.phase = RoundPhase::EndOfRound;
        self.end_of_round();
        if self.config.max_rounds.is_some_and(|max| self.round >= max) {
            return Some(self.finish(MatchOutcome::Aborted));
        }
        None
    }

    pub fn summary(&self) -> MatchSummary {
        self.stats
            .summary(self.outcome.unwrap_or(MatchOutcome::Aborted), self.seed)
    }

    fn hero_turn(&mut self, hero: HeroId, input: &mut dyn CommandSource) -> TurnResult {
        loop {
            let command = input.next_command(&TurnPrompt {
                round: self.round,
                hero,
                field: &self.field,
            });
            let mut ctx = ActionContext {
                rng: &mut self.rng,
                stats: Some(&mut self.stats),
                market: market_ref(&mut self.market),
            };
            match execute(&mut self.field, hero, command, &mut ctx) {
                Ok(report) => {
                    self.record_report(hero, &report);
                    match report.turn_result() {
                        TurnResult::NotConsumed => continue,
                        result => return result,
                    }
                }
                Err(reason) => {
                    tracing::debug!(?hero, %command, %reason, "action rejected");
                    self.log.push(
                        BattleEventType::ActionRejected { hero },
                        format!("{}: {}", command, reason),
                        self.round,
                    );
                    input.rejected(hero, &reason);
                }
            }
        }
    }

    fn hero_name(&self, hero: HeroId) -> String {
        self.field
            .roster
            .hero(hero)
            .map(|h| h.name.clone())
            .unwrap_or_default()
    }

    fn monster_name(&self, monster: MonsterId) -> String {
        self.field
            .roster
            .monster(monster)
            .map(|m| m.name.clone())
            .unwrap_or_default()
    }

    fn unit_name(&self, unit: UnitRef) -> String {
        match unit {
            UnitRef::Hero(id) => self.hero_name(id),
            UnitRef::Monster(id) => self.monster_name(id),
        }
    }

    fn record_report(&mut self, hero: HeroId, report: &ActionReport) {
        let name = self.hero_name(hero);
        let description = match report {
            ActionReport::Moved { to } => format!("{} moves to {}", name, to),
            ActionReport::Attacked { target, outcome } => {
                format!("{} attacks {}: {:?}", name, self.unit_name(*target), outcome)
            }
            ActionReport::CastSpell { spell, target, outcome } => format!(
                "{} casts {} on {}: {:?}",
                name,
                spell,
                self.unit_name(*target),
                outcome
            ),
            ActionReport::UsedPotion { potion } => format!("{} drinks {}", name, potion),
            ActionReport::Equipped { item } => format!("{} equips {}", name, item),
            ActionReport::Teleported { to } => format!("{} teleports to {}", name, to),
            ActionReport::Recalled { to } => format!("{} recalls to {}", name, to),
            ActionReport::ClearedObstacle { at } => format!("{} clears the obstacle at {}", name, at),
            ActionReport::BrowsedMarket => format!("{} visits the market", name),
            ActionReport::Waited => format!("{} waits", name),
            ActionReport::Quit => format!("{} quits the match", name),
        };
        self.log
            .push(BattleEventType::HeroActed { hero }, description, self.round);

        if let ActionReport::Attacked { target, outcome } | ActionReport::CastSpell { target, outcome, .. } =
            report
        {
            if outcome.killed() {
                let slain = format!("{} slays {}", name, self.unit_name(*target));
                self.log
                    .push(BattleEventType::UnitSlain { unit: *target }, slain, self.round);
            }
        }
    }

    fn monster_phase(&mut self) {
        let monsters: Vec<MonsterId> = self.field.roster.monster_ids().collect();
        for monster in monsters {
            let unit = UnitRef::Monster(monster);
            if !self.field.is_alive(unit) || self.field.position_of(unit).is_none() {
                continue;
            }
            let action = take_monster_turn(&mut self.field, monster, &mut self.rng, Some(&mut self.stats));
            let name = self.monster_name(monster);
            match action {
                MonsterAction::Attacked { hero, outcome } => {
                    let target = self.hero_name(hero);
                    self.log.push(
                        BattleEventType::MonsterActed { monster },
                        format!("{} attacks {}: {:?}", name, target, outcome),
                        self.round,
                    );
                    if outcome.killed() {
                        self.log.push(
                            BattleEventType::UnitSlain {
                                unit: UnitRef::Hero(hero),
                            },
                            format!("{} faints to {}", target, name),
                            self.round,
                        );
                    }
                }
                MonsterAction::Moved(dir) => self.log.push(
                    BattleEventType::MonsterActed { monster },
                    format!("{} moves {}", name, dir),
                    self.round,
                ),
                MonsterAction::Held => {}
            }
        }
    }

    fn end_of_round(&mut self) {
        let heroes: Vec<HeroId> = self.field.roster.hero_ids().collect();
        for hero in heroes {
            if self.field.is_alive(UnitRef::Hero(hero)) {
                if let Some(h) = self.field.roster.hero_mut(hero) {
                    h.regenerate(self.config.regen_fraction);
                }
            } else {
                self.respawn(hero);
            }
        }

        if self.config.spawn_cadence > 0 && self.round % self.config.spawn_cadence == 0 {
            self.spawn_reinforcements();
        }
    }

    /// Bring a fainted hero back on its home nexus. When both home spawn
    /// cells are taken the hero stays down and is retried next round.
    fn respawn(&mut self, hero: HeroId) {
        let unit = UnitRef::Hero(hero);
        let lane = self.field.home_lane(hero);
        let Some(cell) = Board::home_spawn_cells(lane)
            .into_iter()
            .find(|pos| can_relocate_to(&self.field, unit, *pos))
        else {
            tracing::warn!(?hero, %lane, "home nexus blocked, respawn deferred");
            return;
        };

        if let Some(h) = self.field.roster.hero_mut(hero) {
            h.restore_full();
        }
        match try_relocate(&mut self.field, unit, cell) {
            Ok(()) => {
                let name = self.hero_name(hero);
                tracing::info!(hero = %name, %cell, "hero respawned");
                self.log.push(
                    BattleEventType::HeroRespawned { hero },
                    format!("{} returns at {}", name, cell),
                    self.round,
                );
            }
            Err(reason) => tracing::warn!(?hero, %reason, "respawn failed"),
        }
    }

    fn spawn_reinforcements(&mut self) -> usize {
        let level = self.field.roster.max_hero_level();
        let spawned = spawn_wave(&mut self.field, &mut *self.factory, level, &mut self.rng);
        if !spawned.is_empty() {
            self.log.push(
                BattleEventType::MonstersSpawned {
                    count: spawned.len(),
                },
                format!("{} level {} monsters arrive", spawned.len(), level),
                self.round,
            );
        }
        spawned.len()
    }

    fn finish(&mut self, outcome: MatchOutcome) -> MatchOutcome {
        self.phase = RoundPhase::Finished;
        self.outcome = Some(outcome);
        tracing::info!(round = self.round, %outcome, "match over");
        self.log.push(
            BattleEventType::MatchEnded { outcome },
            outcome.to_string(),
            self.round,
        );
        outcome
    }
}
