//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve storage, logging, history and assistant settings once.
//! - Keep lookups injectable so tests never touch the real environment.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Malformed numbers are errors, never silently defaulted.
//! - The API key is never printed by `Debug`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DB_PATH: &str = "AVECMA_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "AVECMA_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "AVECMA_LOG_DIR";
pub const ENV_HISTORY_LIMIT: &str = "AVECMA_HISTORY_LIMIT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "AVECMA_REQUEST_TIMEOUT_SECS";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "GEMINI_MODEL";
pub const ENV_GEMINI_API_BASE: &str = "GEMINI_API_BASE";

const DB_FILE_NAME: &str = "avecma.sqlite3";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable could not be parsed.
    InvalidNumber { key: &'static str, value: String },
    /// A variable parsed but its value is not allowed.
    InvalidValue { key: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer, got `{value}`")
            }
            Self::InvalidValue { key, reason } => write!(f, "{key} is invalid: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings for the generative-language API.
#[derive(Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
}

impl Debug for AssistantConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// `None` keeps unlimited undo history.
    pub history_limit: Option<usize>,
    pub assistant: AssistantConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            history_limit: None,
            assistant: AssistantConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        let log_level = read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        let history_limit = parse_u64(ENV_HISTORY_LIMIT, read(ENV_HISTORY_LIMIT))?
            .filter(|limit| *limit > 0)
            .map(|limit| {
                usize::try_from(limit).map_err(|_| ConfigError::InvalidValue {
                    key: ENV_HISTORY_LIMIT,
                    reason: "value does not fit this platform".to_string(),
                })
            })
            .transpose()?;

        let timeout_secs = parse_u64(ENV_REQUEST_TIMEOUT_SECS, read(ENV_REQUEST_TIMEOUT_SECS))?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: ENV_REQUEST_TIMEOUT_SECS,
                reason: "timeout must be at least one second".to_string(),
            });
        }

        let api_base = read(ENV_GEMINI_API_BASE)
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self {
            db_path,
            log_level,
            log_dir,
            history_limit,
            assistant: AssistantConfig {
                api_key: read(ENV_GEMINI_API_KEY),
                model: read(ENV_GEMINI_MODEL).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_base,
                request_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Database file used when `AVECMA_DB_PATH` is not set.
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn parse_u64(key: &'static str, raw: Option<String>) -> Result<Option<u64>, ConfigError> {
    raw.map(|value| {
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value })
    })
    .transpose()
}
