//! Process configuration, read from `STOCKBOOK_*` environment variables.

use std::str::FromStr;

use thiserror::Error;

use stockbook_core::OwnerId;
use stockbook_observability::LogFormat;

pub const OWNER_ID_VAR: &str = "STOCKBOOK_OWNER_ID";
pub const LOG_FORMAT_VAR: &str = "STOCKBOOK_LOG_FORMAT";
pub const CLEAR_TRANSFERS_VAR: &str = "STOCKBOOK_CLEAR_TRANSFERS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid owner id: {value}")]
    InvalidOwnerId { var: &'static str, value: String },

    #[error("{var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Owner scope of the ledger session.
    pub owner_id: OwnerId,
    pub log_format: LogFormat,
    /// Whether `clear_all` also deletes transfers.
    pub clear_includes_transfers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let owner_id = match lookup(OWNER_ID_VAR) {
            Some(value) => OwnerId::from_str(value.trim()).map_err(|_| ConfigError::InvalidOwnerId {
                var: OWNER_ID_VAR,
                value,
            })?,
            None => {
                let owner_id = OwnerId::new();
                tracing::warn!(%owner_id, "{OWNER_ID_VAR} not set, using a fresh owner id");
                owner_id
            }
        };

        let log_format = log_format_from_lookup(&lookup)?;

        let clear_includes_transfers = match lookup(CLEAR_TRANSFERS_VAR) {
            Some(value) => parse_bool(CLEAR_TRANSFERS_VAR, &value)?,
            None => true,
        };

        Ok(Self {
            owner_id,
            log_format,
            clear_includes_transfers,
        })
    }
}

/// Just the log format, so logging can be installed before the rest of the
/// configuration is read (and its fallback warnings emitted).
pub fn log_format_from_env() -> Result<LogFormat, ConfigError> {
    log_format_from_lookup(|var| std::env::var(var).ok())
}

pub fn log_format_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LogFormat, ConfigError> {
    match lookup(LOG_FORMAT_VAR) {
        Some(value) => value
            .parse::<LogFormat>()
            .map_err(|err| ConfigError::InvalidValue {
                var: LOG_FORMAT_VAR,
                reason: err.to_string(),
            }),
        None => Ok(LogFormat::default()),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            var,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
