//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{AselError, Result};

/// Full asset-selector configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
#[derive(Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub selection: SelectionConfig,
    pub paths: PathsConfig,
}

/// Metrics/benchmark store location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Blob store settings for the media materializer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Local root that blob buckets resolve under (`<media_root>/<bucket>/<key>`).
    pub media_root: PathBuf,
    /// URI scheme accepted for `path_bucket` references.
    pub scheme: String,
}

/// Ranking knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SelectionConfig {
    /// Number of assets surfaced per request.
    pub top_n: usize,
    /// Time bucket consumed by the ranking core.
    pub time_bucket: String,
}

/// Filesystem paths used by the selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathsConfig {
    pub config_file: PathBuf,
    pub jsonl_log: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: data_dir().join("assets.sqlite3"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_root: data_dir().join("media"),
            scheme: "gs".to_string(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            time_bucket: "total".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let cfg = home_dir().join(".config").join("asel").join("config.toml");
        Self {
            config_file: cfg,
            jsonl_log: data_dir().join("activity.jsonl"),
        }
    }
}

fn home_dir() -> PathBuf {
    env::var_os("HOME").map_or_else(
        || {
            eprintln!("[ASEL-CONFIG] WARNING: HOME not set, falling back to /tmp for data paths");
            PathBuf::from("/tmp")
        },
        PathBuf::from,
    )
}

fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("asel")
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathsConfig::default().config_file
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from the default path;
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw = fs::read_to_string(&path_buf).map_err(|source| AselError::Io {
                path: path_buf.clone(),
                source,
            })?;
            let parsed: Self = toml::from_str(&raw)?;
            parsed
        } else if is_explicit_path {
            return Err(AselError::MissingConfig { path: path_buf });
        } else {
            Self::default()
        };

        cfg.paths.config_file = path_buf;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(value) = env::var_os("ASEL_DB_PATH") {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = env::var_os("ASEL_MEDIA_ROOT") {
            self.storage.media_root = PathBuf::from(value);
        }
        if let Ok(value) = env::var("ASEL_TOP_N")
            && let Ok(parsed) = value.parse::<usize>()
        {
            self.selection.top_n = parsed;
        }
    }

    /// Reject configurations the ranking core cannot operate under.
    pub fn validate(&self) -> Result<()> {
        if self.selection.top_n == 0 {
            return Err(AselError::InvalidConfig {
                details: "selection.top_n must be at least 1".to_string(),
            });
        }
        if self.selection.time_bucket.is_empty() {
            return Err(AselError::InvalidConfig {
                details: "selection.time_bucket must not be empty".to_string(),
            });
        }
        if self.storage.scheme.is_empty() {
            return Err(AselError::InvalidConfig {
                details: "storage.scheme must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
