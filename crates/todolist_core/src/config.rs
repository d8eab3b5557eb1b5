//! Runtime configuration resolution.
//!
//! # Responsibility
//! - Decide where the tasks file, score file and logs live.
//! - Decide the log level.
//!
//! # Invariants
//! - Resolution order: explicit override, then environment, then defaults.
//! - Every resolved path is absolute.

use crate::logging::{LogLevel, LoggingError};
use crate::store::JsonTaskStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DATA_DIR_ENV: &str = "TODOLIST_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "TODOLIST_LOG_LEVEL";

const APP_NAME: &str = "todolist";
const TASKS_FILE_NAME: &str = "tasks.json";
const SCORE_FILE_NAME: &str = "score.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("data dir must be an absolute path, got `{}`", .0.display())]
    RelativeDataDir(PathBuf),
    #[error(transparent)]
    LogLevel(#[from] LoggingError),
}

/// Caller-supplied values that win over environment and defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub tasks_file: PathBuf,
    pub score_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Resolves configuration from overrides and the process environment.
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::resolve`] with an injectable environment lookup.
    pub fn resolve_with_env(
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = match overrides.data_dir.clone() {
            Some(dir) => dir,
            None => non_blank(env(DATA_DIR_ENV))
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        };
        if !data_dir.is_absolute() {
            return Err(ConfigError::RelativeDataDir(data_dir));
        }

        let raw_level =
            non_blank(overrides.log_level.clone()).or_else(|| non_blank(env(LOG_LEVEL_ENV)));
        let log_level = match raw_level {
            Some(raw) => raw.parse::<LogLevel>()?,
            None => LogLevel::build_default(),
        };

        Ok(Self::for_data_dir(data_dir, log_level))
    }

    /// Lays out files under `data_dir`.
    pub fn for_data_dir(data_dir: impl AsRef<Path>, log_level: LogLevel) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            tasks_file: data_dir.join(TASKS_FILE_NAME),
            score_file: data_dir.join(SCORE_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            log_level,
        }
    }

    /// Builds the file store for the configured paths.
    pub fn store(&self) -> JsonTaskStore {
        JsonTaskStore::new(&self.tasks_file, &self.score_file)
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}
