//! Per-hero tallies and the end-of-match score

use serde::{Deserialize, Serialize};

use crate::battle::turn::MatchOutcome;
use crate::core::types::HeroId;
use crate::stats::StatsSink;

const WIN_BONUS: f64 = 1000.0;
const LOSS_PENALTY: f64 = 200.0;
const KILL_POINTS: f64 = 200.0;
const DEALT_WEIGHT: f64 = 0.5;
const FAINT_PENALTY: f64 = 150.0;
const TAKEN_WEIGHT: f64 = 0.2;
const ROUND_PENALTY: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    pub name: String,
    pub kills: u32,
    pub faints: u32,
    pub damage_dealt: i64,
    pub damage_taken: i64,
}

/// Running tallies for one match
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    heroes: Vec<HeroStats>,
    rounds: u32,
}

impl MatchStats {
    /// One entry per hero, indexed by `HeroId`
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            heroes: names
                .into_iter()
                .map(|name| HeroStats {
                    name: name.into(),
                    ..HeroStats::default()
                })
                .collect(),
            rounds: 0,
        }
    }

    pub fn hero(&self, hero: HeroId) -> Option<&HeroStats> {
        self.heroes.get(hero.0)
    }

    pub fn heroes(&self) -> &[HeroStats] {
        &self.heroes
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn set_rounds(&mut self, rounds: u32) {
        self.rounds = rounds;
    }

    pub fn total_kills(&self) -> u32 {
        self.heroes.iter().map(|h| h.kills).sum()
    }

    /// Party score for the finished match. Never negative.
    pub fn compute_score(&self, outcome: MatchOutcome) -> i64 {
        let mut score = match outcome {
            MatchOutcome::AttackerWin => WIN_BONUS,
            MatchOutcome::DefenderWin => -LOSS_PENALTY,
            MatchOutcome::Aborted => 0.0,
        };
        for h in &self.heroes {
            score += KILL_POINTS * h.kills as f64;
            score += DEALT_WEIGHT * h.damage_dealt as f64;
            score -= FAINT_PENALTY * h.faints as f64;
            score -= TAKEN_WEIGHT * h.damage_taken as f64;
        }
        score -= ROUND_PENALTY * self.rounds as f64;
        score.round().max(0.0) as i64
    }

    pub fn summary(&self, outcome: MatchOutcome, seed: u64) -> MatchSummary {
        MatchSummary {
            outcome,
            rounds: self.rounds,
            score: self.compute_score(outcome),
            seed,
            heroes: self.heroes.clone(),
        }
    }

    fn entry(&mut self, hero: HeroId) -> Option<&mut HeroStats> {
        let entry = self.heroes.get_mut(hero.0);
        if entry.is_none() {
            tracing::warn!(?hero, "stats for unknown hero dropped");
        }
        entry
    }
}

impl StatsSink for MatchStats {
    fn record_damage_dealt(&mut self, hero: HeroId, amount: i32) {
        if let Some(h) = self.entry(hero) {
            h.damage_dealt += i64::from(amount);
        }
    }

    fn record_damage_taken(&mut self, hero: HeroId, amount: i32) {
        if let Some(h) = self.entry(hero) {
            h.damage_taken += i64::from(amount);
        }
    }

    fn record_kill(&mut self, hero: HeroId) {
        if let Some(h) = self.entry(hero) {
            h.kills += 1;
        }
    }

    fn record_faint(&mut self, hero: HeroId) {
        if let Some(h) = self.entry(hero) {
            h.faints += 1;
        }
    }
}

/// Serializable end-of-match report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub outcome: MatchOutcome,
    pub rounds: u32,
    pub score: i64,
    pub seed: u64,
    pub heroes: Vec<HeroStats>,
}
