//! Configuration file support
//!
//! Loads config from ~/.brief/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for brief-chat
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Backend base URL
    pub api_url: Option<String>,

    /// Default research depth (auto/quick/medium/deep)
    pub depth: Option<String>,
}

impl Config {
    /// Load config from ~/.brief/config.toml
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Load config from a specific path; missing or broken files fall
    /// back to defaults with a warning rather than failing startup.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".brief")
        .join("config.toml")
}
