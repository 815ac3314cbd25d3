//! Runtime configuration.
//!
//! Values come from an optional `config.toml`, then environment overrides.
//! Every field has a default so an absent file is not an error.

use crate::error::{TaskGridError, TaskGridResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Fixed name of the persisted document inside the data directory.
pub const DATA_FILE: &str = "tasks.json";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "TASKGRID_DATA_DIR";

/// Environment variable overriding the save debounce window, in milliseconds.
pub const ENV_DEBOUNCE_MS: &str = "TASKGRID_DEBOUNCE_MS";

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_FOCUS_MINUTES: u32 = 25;
const DEFAULT_REMINDER_LEAD_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `tasks.json`. `None` means the platform data dir.
    pub data_dir: Option<PathBuf>,
    /// Quiet window before a mutation is written to disk.
    pub save_debounce_ms: u64,
    /// Initial focus session length.
    pub focus_minutes: u32,
    /// How long before a due date reminders fire.
    pub reminder_lead_minutes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            save_debounce_ms: DEFAULT_DEBOUNCE_MS,
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            reminder_lead_minutes: DEFAULT_REMINDER_LEAD_MINUTES,
        }
    }
}

impl Config {
    /// Default location of the config file: `<config dir>/taskgrid/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("taskgrid").join("config.toml"))
    }

    /// Parse a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> TaskGridResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(TaskGridError::config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Self::from_toml(&text)
            .map_err(|e| TaskGridError::config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load the file (if any) and apply process environment overrides.
    pub fn resolve(path: Option<&Path>) -> TaskGridResult<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => Self::load(&p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> TaskGridResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(ms) = lookup(ENV_DEBOUNCE_MS) {
            self.save_debounce_ms = ms.trim().parse().map_err(|_| {
                TaskGridError::config(format!("{} must be an integer, got '{}'", ENV_DEBOUNCE_MS, ms))
            })?;
        }
        Ok(())
    }

    /// Directory holding the data file.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("taskgrid"))
                .unwrap_or_else(|| PathBuf::from(".taskgrid"))
        })
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_dir().join(DATA_FILE)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }
}
