//! gitqq configuration.
//!
//! Loaded once per invocation from `~/.gitqq/config.json` and passed down
//! as a value. A missing or unreadable file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assemble::InteractionMode;
use crate::error::{Error, Result};
use crate::messages::Language;

/// Settings that persist across invocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: Language,
    pub interaction: InteractionMode,
}

impl Config {
    /// Load the user's config, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            warn!("could not determine home directory; using default configuration");
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Read and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid config at {}: {e}", path.display())))
    }

    /// The config file path: `~/.gitqq/config.json`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gitqq").join("config.json"))
    }
}
