//! Match configuration
//!
//! Tunable knobs for a single match. Fixed rules of the game (board
//! geometry, damage formulas) live in `battle::constants` instead.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, ValorError};

/// How lane cells are filled when the board is generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerrainLayout {
    /// Weighted random mix of plain, bush, cave, koulou and obstacle cells
    #[default]
    Random,
    /// Every lane cell is plain
    Plain,
}

/// Configuration for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for board generation, dodge rolls and monster AI.
    ///
    /// `None` draws a fresh seed from the OS at match setup.
    pub seed: Option<u64>,

    /// Rounds between monster reinforcement waves
    ///
    /// A wave spawns at the end of every round whose number is a
    /// multiple of this value.
    pub spawn_cadence: u32,

    /// Fraction of level-derived max HP/MP restored to living heroes at
    /// the end of each round
    pub regen_fraction: f64,

    /// How the board's lane cells are generated
    pub terrain: TerrainLayout,

    /// Maximum heroes in a party (one per lane)
    pub max_party_size: usize,

    /// Stop the match as aborted after this many rounds. Headless runs
    /// set this so two stalled sides cannot loop forever.
    pub max_rounds: Option<u32>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            spawn_cadence: 4,
            regen_fraction: 0.10,
            terrain: TerrainLayout::Random,
            max_party_size: 3,
            max_rounds: None,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(text)?;
        config.validate().map_err(ValorError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded match config");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.spawn_cadence == 0 {
            return Err("spawn_cadence must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.regen_fraction) {
            return Err(format!(
                "regen_fraction must be within [0, 1], got {}",
                self.regen_fraction
            ));
        }
        if self.max_party_size == 0 || self.max_party_size > 3 {
            return Err(format!(
                "max_party_size must be between 1 and 3, got {}",
                self.max_party_size
            ));
        }
        if self.max_rounds == Some(0) {
            return Err("max_rounds must be positive when set".into());
        }
        Ok(())
    }
}
