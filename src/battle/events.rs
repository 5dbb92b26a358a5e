//! Structured combat log

use serde::{Deserialize, Serialize};

use crate::battle::turn::MatchOutcome;
use crate::core::types::{HeroId, MonsterId, UnitRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub round: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    MatchStarted,
    HeroActed { hero: HeroId },
    ActionRejected { hero: HeroId },
    MonsterActed { monster: MonsterId },
    UnitSlain { unit: UnitRef },
    HeroRespawned { hero: HeroId },
    MonstersSpawned { count: usize },
    MatchEnded { outcome: MatchOutcome },
}

/// Append-only log of everything that happened in a match
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, round: u32) {
        self.events.push(BattleEvent {
            round,
            event_type,
            description,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events logged during `round`
    pub fn for_round(&self, round: u32) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }
}
