//! Match statistics: the recording interface the battle core reports
//! through, and the per-hero tallies behind the end-of-match summary.

pub mod record;

pub use record::{HeroStats, MatchStats, MatchSummary};

use crate::core::types::HeroId;

/// Receiver for combat statistics. The core tolerates its absence.
pub trait StatsSink {
    fn record_damage_dealt(&mut self, hero: HeroId, amount: i32);

    fn record_damage_taken(&mut self, hero: HeroId, amount: i32);

    fn record_kill(&mut self, hero: HeroId);

    fn record_faint(&mut self, hero: HeroId);
}

/// Reborrow an optional sink for one call, leaving the option usable
/// afterwards.
pub fn reborrow_sink<'s>(sink: &'s mut Option<&mut dyn StatsSink>) -> Option<&'s mut dyn StatsSink> {
    sink.as_mut().map(|s| &mut **s as &mut dyn StatsSink)
}
