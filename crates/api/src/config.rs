//! Start-up configuration read from the environment.

use std::net::SocketAddr;

use pharmacy_observability::LogFormat;

pub const BIND_ADDR_VAR: &str = "PHARMACY_BIND_ADDR";
pub const SEED_VAR: &str = "PHARMACY_SEED";
pub const LOG_FORMAT_VAR: &str = "PHARMACY_LOG_FORMAT";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the demo catalogue into the empty store.
    pub seed: bool,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            seed: true,
            log_format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or blank
    /// variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = get(BIND_ADDR_VAR) {
            config.bind_addr = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid(BIND_ADDR_VAR, &raw, e))?;
        }
        if let Some(raw) = get(SEED_VAR) {
            config.seed = parse_flag(&raw).ok_or_else(|| {
                ConfigError::invalid(SEED_VAR, &raw, "expected true/false, 1/0 or yes/no")
            })?;
        }
        if let Some(raw) = get(LOG_FORMAT_VAR) {
            config.log_format = raw
                .parse()
                .map_err(|e| ConfigError::invalid(LOG_FORMAT_VAR, &raw, e))?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
