//! Configuration for Roster.
//!
//! Read from `~/.roster/config.toml`:
//!
//! ```toml
//! [app]
//! prompt = "(roster) "
//! log_dir = "~/.roster/logs"
//!
//! [store]
//! path = "file.json"
//! ```
//!
//! String values may reference environment variables as `${VAR}`.
//! `ROSTER_STORE` and `ROSTER_PROMPT` override the file.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = "(roster) ";
pub const DEFAULT_STORE_PATH: &str = "file.json";

const STORE_ENV: &str = "ROSTER_STORE";
const PROMPT_ENV: &str = "ROSTER_PROMPT";

#[derive(Debug, Default, Deserialize)]
pub struct RosterConfig {
    pub app: Option<AppConfig>,
    pub store: Option<StoreConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Shown before each line when stdin is a terminal.
    pub prompt: Option<String>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    /// Snapshot file. Relative paths resolve against the working directory.
    pub path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl RosterConfig {
    /// Load the user config. `Ok(None)` when there is no home directory or no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Snapshot path: `ROSTER_STORE`, then `[store] path`, then `file.json`.
    #[must_use]
    pub fn store_path(config: Option<&Self>) -> PathBuf {
        if let Ok(value) = env::var(STORE_ENV)
            && !value.trim().is_empty()
        {
            return PathBuf::from(value);
        }
        config
            .and_then(|cfg| cfg.store.as_ref())
            .and_then(|store| store.path.as_deref())
            .map(expand_env_vars)
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from)
    }

    /// Prompt: `ROSTER_PROMPT`, then `[app] prompt`, then `(roster) `.
    #[must_use]
    pub fn prompt(config: Option<&Self>) -> String {
        if let Ok(value) = env::var(PROMPT_ENV) {
            return value;
        }
        config
            .and_then(|cfg| cfg.app.as_ref())
            .and_then(|app| app.prompt.as_deref())
            .map_or_else(|| DEFAULT_PROMPT.to_string(), expand_env_vars)
    }

    /// Log directory from `[app] log_dir`, if configured.
    #[must_use]
    pub fn log_dir(config: Option<&Self>) -> Option<PathBuf> {
        config
            .and_then(|cfg| cfg.app.as_ref())
            .and_then(|app| app.log_dir.as_deref())
            .map(expand_env_vars)
            .filter(|dir| !dir.trim().is_empty())
            .map(|dir| expand_home(&dir))
    }
}

pub fn config_path() -> Option<PathBuf> {
    roster_home().map(|home| home.join("config.toml"))
}

/// `~/.roster`, the directory holding config and logs.
pub fn roster_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".roster"))
}

/// Replace `${VAR}` references with their environment values (empty if unset).
pub(crate) fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let var = &after[..end];
                if !var.is_empty() {
                    out.push_str(&env::var(var).unwrap_or_default());
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(stripped) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(raw)
}
