// Chunk: docs/chunks/session_config - Session configuration file
//!
//! Session configuration.
//!
//! The demo runner reads a small JSON file at startup:
//! - the text replica A is seeded with
//! - whether the link starts online
//! - whether debug logging is on
//!
//! ## File Location
//!
//! `<config dir>/twin-edit/config.json`, resolved with `dirs::config_dir`
//! (`~/.config/twin-edit/config.json` on Linux).
//!
//! ## Schema Version
//!
//! The file carries a schema version. A file written by a different version,
//! a missing file, or a file that fails to parse all degrade to defaults.
//! `TWIN_EDIT_DEBUG=1` in the environment forces debug logging on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current schema version for the config file.
///
/// Increment this when making breaking changes to the file format.
pub const SCHEMA_VERSION: u32 = 1;

/// Application name used for the config directory.
const APP_NAME: &str = "twin-edit";

/// Config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Environment variable that forces debug logging.
pub const DEBUG_ENV: &str = "TWIN_EDIT_DEBUG";

/// Text replica A starts with.
pub const DEFAULT_SEED_TEXT: &str = "Offline mode lets you keep editing. Toggle the link to sync and merge.\nSelect text and hit a mark button to decorate it.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config schema version mismatch (expected {expected}, found {found})")]
    SchemaMismatch { expected: u32, found: u32 },
    #[error("no config directory on this platform")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Initial content of replica A, synced to B at startup.
    pub seed_text: String,
    /// Link state at startup.
    pub start_online: bool,
    /// Raise the log filter to `debug`.
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            seed_text: DEFAULT_SEED_TEXT.to_string(),
            start_online: true,
            debug: false,
        }
    }
}

/// Returns the default config file path, or `None` if the platform has no
/// config directory.
pub fn default_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME))
}

impl SessionConfig {
    /// Reads and validates a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: SessionConfig = serde_json::from_str(&contents)?;
        if config.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::SchemaMismatch {
                expected: SCHEMA_VERSION,
                found: config.schema_version,
            });
        }
        Ok(config)
    }

    /// Writes the config, creating parent directories as needed.
    ///
    /// Uses atomic write (write to temp file, then rename).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Loads `path`, falling back to defaults on any failure. A missing file
    /// is silent; anything else is logged.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!("config: {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Loads from the default location, or defaults if there is none.
    pub fn load() -> Self {
        match default_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Saves to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Applies environment overrides.
    pub fn apply_env(mut self) -> Self {
        if let Ok(value) = std::env::var(DEBUG_ENV) {
            self.debug = env_flag(&value);
        }
        self
    }

    /// Default log filter for the demo's logger.
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}

fn env_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}
