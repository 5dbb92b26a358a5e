//! Legends of Valor - three-lane turn-based battle engine

pub mod battle;
pub mod core;
pub mod stats;
pub mod units;
