//! Category seed configuration loading from config.toml
//!
//! The categories listed in config.toml are used to seed the database on
//! first run. They are a fallback for an empty table only; business logic
//! never reads this file directly.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Category names to seed when the category table is empty
    pub categories: Vec<String>,
}

/// The built-in defaults, used when no config.toml is present.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Higiene",
    "Bebidas",
    "Mercearia",
    "Padaria",
    "Limpeza",
    "Hortifruti",
    "Açougue",
    "Outros",
];

/// Loads category configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads category configuration from the default location (./config.toml),
/// falling back to [`DEFAULT_CATEGORIES`] when the file does not exist.
pub fn load_default_config() -> Result<Config> {
    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(Config {
            categories: DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect(),
        })
    }
}
