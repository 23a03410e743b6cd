//! Application configuration for the `litedoc` tool.
//!
//! Precedence: command-line flags > environment > config file > defaults. The config
//! file is the one named on the command line, else `LITEDOC_CONFIG`, else
//! `litedoc.toml` in the working directory when it exists.

use crate::errors::DbError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "litedoc.toml";
pub const DEFAULT_COLLECTION: &str = "docs";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
    pub retention: Option<usize>,
    pub dev_trace: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// NDJSON file loaded into the working collection.
    pub data: Option<PathBuf>,
    pub collection: Option<String>,
    /// Fields indexed right after loading.
    pub indexes: Vec<String>,
    pub log: LogConfig,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub collection: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// # Errors
    /// Returns `Config` for malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, DbError> {
        Ok(toml::from_str(s)?)
    }

    /// # Errors
    /// Returns `Io` when the file cannot be read, `Config` when it does not parse.
    pub fn from_file(path: &Path) -> Result<Self, DbError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| DbError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&s)
    }

    #[must_use]
    pub fn collection_name(&self) -> &str {
        self.collection.as_deref().unwrap_or(DEFAULT_COLLECTION)
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("LITEDOC_DATA") {
            self.data = Some(PathBuf::from(v));
        }
        if let Some(v) = env("LITEDOC_COLLECTION") {
            self.collection = Some(v);
        }
        if let Some(v) = env("LITEDOC_LOG_LEVEL") {
            self.log.level = Some(v);
        }
        if let Some(v) = env("LITEDOC_LOG_DIR") {
            self.log.dir = Some(PathBuf::from(v));
        }
        if let Some(v) = env("LITEDOC_LOG_RETENTION") {
            match v.trim().parse::<usize>() {
                Ok(n) => self.log.retention = Some(n),
                Err(_) => log::warn!("ignoring LITEDOC_LOG_RETENTION={v}: not a count"),
            }
        }
        if let Some(v) = env("LITEDOC_DEV_TRACE") {
            self.log.dev_trace = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    fn apply_overrides(&mut self, cli: &ConfigOverrides) {
        if let Some(v) = &cli.data {
            self.data = Some(v.clone());
        }
        if let Some(v) = &cli.collection {
            self.collection = Some(v.clone());
        }
        if let Some(v) = &cli.log_level {
            self.log.level = Some(v.clone());
        }
    }
}

/// Loads the configuration using the process environment and working directory.
///
/// # Errors
/// Fails when an explicitly named config file is missing or any config file is invalid.
pub fn load_config(cli: &ConfigOverrides) -> Result<AppConfig, DbError> {
    let cwd = std::env::current_dir()?;
    load_config_with(cli, |k| std::env::var(k).ok(), &cwd)
}

/// [`load_config`] with an injectable environment and working directory.
///
/// # Errors
/// Fails when an explicitly named config file is missing or any config file is invalid.
pub fn load_config_with(
    cli: &ConfigOverrides,
    env: impl Fn(&str) -> Option<String>,
    cwd: &Path,
) -> Result<AppConfig, DbError> {
    let explicit = cli.config.clone().or_else(|| env("LITEDOC_CONFIG").map(PathBuf::from));
    let mut cfg = match explicit {
        Some(path) => AppConfig::from_file(&path)?,
        None => {
            let local = cwd.join(DEFAULT_CONFIG_FILE);
            if local.exists() { AppConfig::from_file(&local)? } else { AppConfig::default() }
        }
    };
    cfg.apply_env(&env);
    cfg.apply_overrides(cli);
    log::debug!("effective config: {cfg:?}");
    Ok(cfg)
}
