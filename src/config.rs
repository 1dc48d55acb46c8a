// src/config.rs
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::ConfigError;
use crate::validate::CastlingAttackRule;

pub const DEFAULT_HISTORY_FILENAME: &str = "chess_moves.json";

/// Settings of the terminal front end. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub unicode: bool,
    pub history_file: String,
    pub clear_screen: bool,
    pub castling_attacks: CastlingAttackRule,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unicode: true,
            history_file: DEFAULT_HISTORY_FILENAME.into(),
            clear_screen: true,
            castling_attacks: CastlingAttackRule::default(),
        }
    }
}

impl Config {
    /// Reads the YAML file at `path`. No path, or a path that does not exist,
    /// gives the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => {
                let content = fs::read_to_string(p)
                    .map_err(|e| ConfigError::Io(p.display().to_string(), e))?;
                Self::from_yaml(&content)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
