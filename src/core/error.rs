//! Error types for setup-time failures
//!
//! In-match rejections (illegal moves, bad commands) have their own
//! types next to the code that produces them; these are for loading
//! configuration and content before a match starts.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid board layout: {0}")]
    InvalidLayout(String),

    #[error("Unknown hero template: {0}")]
    UnknownHero(String),

    #[error("Invalid party: {0}")]
    InvalidParty(String),
}

pub type Result<T> = std::result::Result<T, ValorError>;
