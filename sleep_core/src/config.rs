//! Configuration file support for sleepq.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/sleepq/config.toml`.
//! Scoring never reads configuration directly; callers resolve the sleep goal
//! here and pass it in.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Shortest selectable sleep goal (hours)
pub const MIN_SLEEP_GOAL_HOURS: f64 = 4.0;
/// Longest selectable sleep goal (hours)
pub const MAX_SLEEP_GOAL_HOURS: f64 = 12.0;
/// Goal granularity (hours)
pub const SLEEP_GOAL_STEP_HOURS: f64 = 0.5;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub data: DataConfig,
}

/// User profile preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_sleep_goal_hours")]
    pub sleep_goal_hours: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            sleep_goal_hours: default_sleep_goal_hours(),
        }
    }
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    /// Path of the scored-night history file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history.csv")
    }
}

// Default value functions
fn default_sleep_goal_hours() -> f64 {
    8.0
}

fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("sleepq")
}

/// Check a sleep goal against the selectable range and step
pub fn validate_sleep_goal(hours: f64) -> Result<()> {
    if !(MIN_SLEEP_GOAL_HOURS..=MAX_SLEEP_GOAL_HOURS).contains(&hours) {
        return Err(Error::Config(format!(
            "sleep goal {} is outside {}-{} hours",
            hours, MIN_SLEEP_GOAL_HOURS, MAX_SLEEP_GOAL_HOURS
        )));
    }

    let steps = hours / SLEEP_GOAL_STEP_HOURS;
    if (steps - steps.round()).abs() > 1e-9 {
        return Err(Error::Config(format!(
            "sleep goal {} is not a multiple of {} hours",
            hours, SLEEP_GOAL_STEP_HOURS
        )));
    }

    Ok(())
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Self::parse_from(path)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn parse_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load a config that is about to be overwritten.
    ///
    /// Skips validation, and falls back to defaults when the file does not
    /// parse, so a broken config can still be replaced through `save_to`.
    pub fn load_for_update(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::parse_from(&path) {
            Ok(config) => Ok(config),
            Err(Error::Toml(e)) => {
                tracing::warn!("Ignoring unreadable config at {:?}: {}", path, e);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Load from `path` when given, otherwise from the standard location.
    ///
    /// An explicit path that does not exist yields defaults, so a fresh
    /// `--config` target can be written to with `save_to`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => Self::load_from(p),
            Some(p) => {
                tracing::info!("No config file found at {:?}, using defaults", p);
                Ok(Self::default())
            }
            None => Self::load(),
        }
    }

    /// Check all values are usable
    pub fn validate(&self) -> Result<()> {
        validate_sleep_goal(self.profile.sleep_goal_hours)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("sleepq").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        // Ensure parent directory exists
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        // Write a sibling temp file and rename it over the config
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
