//! Core types, configuration and errors shared by the whole engine

pub mod config;
pub mod error;
pub mod types;

pub use config::{MatchConfig, TerrainLayout};
pub use error::{Result, ValorError};
pub use types::{Direction, Faction, GridPos, HeroId, Lane, MonsterId, UnitRef};
