//! Fixed rules of the game
//!
//! Tunable per-match knobs (spawn cadence, regeneration) live in
//! `MatchConfig`; everything here is part of the ruleset itself.

// =============================================================================
// BOARD GEOMETRY
// =============================================================================

/// Board height in cells
pub const ROWS: i32 = 8;

/// Board width in cells
pub const COLS: i32 = 8;

/// Columns that are walls in every row
pub const WALL_COLUMNS: [i32; 2] = [2, 5];

/// Monsters' home row; a hero standing here wins the match
pub const MONSTER_NEXUS_ROW: i32 = 0;

/// Heroes' home row; a monster standing here wins the match
pub const HERO_NEXUS_ROW: i32 = ROWS - 1;

// =============================================================================
// TERRAIN
// =============================================================================

/// Fraction added to the boosted stat while on a bonus tile (x1.10)
pub const TERRAIN_BONUS: f64 = 0.10;

/// Relative weights for generated lane cells: plain, bush, cave, koulou, obstacle
pub const LANE_CELL_WEIGHTS: [u32; 5] = [8, 4, 4, 3, 1];

// =============================================================================
// UNIT STATS
// =============================================================================

/// Highest level any hero or monster can have
pub const MAX_UNIT_LEVEL: u32 = 100;

/// Max HP per level, for heroes and monsters alike
pub const HP_PER_LEVEL: i32 = 100;

/// Hero max MP per level
pub const MP_PER_LEVEL: i32 = 50;

/// Hero attack power = (strength + weapon damage) * this
pub const HERO_ATTACK_SCALE: f64 = 0.05;

/// Hero dodge chance per point of agility
pub const HERO_DODGE_PER_AGILITY: f64 = 0.0002;

/// No unit evades more often than this through agility alone
pub const MAX_DODGE_CHANCE: f64 = 0.5;

/// Armor reduction and monster defense are scaled by this into flat HP
pub const MITIGATION_SCALE: f64 = 0.02;

// =============================================================================
// COMBAT
// =============================================================================

/// Monster attack damage = round(base damage * this)
pub const MONSTER_DAMAGE_SCALE: f64 = 0.3;

/// Spell damage = round(base + dexterity / this * base)
pub const SPELL_DEXTERITY_DIVISOR: f64 = 10_000.0;

/// Fraction removed from the target stat by a landed spell
pub const SPELL_DEBUFF: f64 = 0.10;
