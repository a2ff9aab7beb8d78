//! Runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, log settings and flow tunables.
//! - Apply `GLASSDAY_*` environment overrides on top of defaults.
//!
//! # Invariants
//! - `log_dir` is always absolute.
//! - `log_level` is one of `trace|debug|info|warn|error`.

use crate::service::capacity::DEFAULT_GLASS_WARNING_THRESHOLD;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "GLASSDAY_DB";
pub const ENV_LOG_DIR: &str = "GLASSDAY_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "GLASSDAY_LOG_LEVEL";
pub const ENV_GLASS_WARNING: &str = "GLASSDAY_GLASS_WARNING";

const DEFAULT_DB_FILE_NAME: &str = "glassday.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "glassday-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(PathBuf),
    InvalidNumber { key: &'static str, value: String },
    CurrentDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be a non-negative integer, got `{value}`")
            }
            Self::CurrentDir(message) => write!(f, "cannot resolve working directory: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Supported log verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// `debug` for debug builds, `info` for release builds.
    pub fn build_default() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
    pub glass_warning_threshold: usize,
}

impl AppConfig {
    /// Defaults rooted at `base_dir` for the database and the temp dir for logs.
    pub fn defaults_in(base_dir: &Path) -> Self {
        Self {
            db_path: base_dir.join(DEFAULT_DB_FILE_NAME),
            log_dir: std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
            log_level: LogLevel::build_default(),
            glass_warning_threshold: DEFAULT_GLASS_WARNING_THRESHOLD,
        }
    }

    /// Defaults in the working directory, overridden by the process env.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd =
            std::env::current_dir().map_err(|err| ConfigError::CurrentDir(err.to_string()))?;
        Self::defaults_in(&cwd).with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies `GLASSDAY_*` overrides read through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = PathBuf::from(path.trim());
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = PathBuf::from(dir.trim());
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::parse(&level)?;
        }
        if let Some(raw) = lookup(ENV_GLASS_WARNING) {
            self.glass_warning_threshold =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: ENV_GLASS_WARNING,
                        value: raw.clone(),
                    })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.log_dir.is_absolute() {
            return Err(ConfigError::RelativeLogDir(self.log_dir.clone()));
        }
        Ok(())
    }
}
