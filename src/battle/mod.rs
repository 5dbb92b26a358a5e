//! Battle system - three-lane board, turn order and combat
//!
//! Heroes push north up their lanes toward the monsters' nexus while
//! monsters march south toward theirs. Nothing may slip past a live enemy
//! in its lane.
//!
//! Key pieces:
//! - `board` / `field`: cells, occupancy and terrain hooks
//! - `movement` / `combat`: legality rules and damage resolution
//! - `actions` / `ai`: what heroes and monsters do with a turn
//! - `turn`: the round state machine tying it together

pub mod actions;
pub mod ai;
pub mod board;
pub mod combat;
pub mod command;
pub mod constants;
pub mod events;
pub mod field;
pub mod input;
pub mod movement;
pub mod render;
pub mod spawner;
pub mod terrain;
pub mod turn;

// Re-exports for convenient access
pub use actions::{execute, ActionContext, ActionError, ActionReport, Market, TurnResult};
pub use ai::{take_monster_turn, MonsterAction};
pub use board::{Board, Tile};
pub use combat::{attack_range_of, basic_attack, in_range, spell_cast, AttackOutcome, CombatError};
pub use command::{parse_command, CommandParseError, EquipSlot, HeroCommand};
pub use constants::*;
pub use events::{BattleEvent, BattleEventLog, BattleEventType};
pub use field::Battlefield;
pub use input::{Autopilot, CommandSource, ScriptedCommands, TurnPrompt};
pub use movement::{
    bypass_limit, can_relocate_to, move_unit, relocate_to, try_move_unit, try_relocate,
    validate_move, MoveError,
};
pub use render::{cell_glyph, render_board, CellGlyph};
pub use spawner::{place_heroes, spawn_wave};
pub use terrain::{CellType, Terrain};
pub use turn::{new_match, MatchOutcome, RoundPhase, TurnManager};
