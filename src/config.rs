// src/config.rs

use lazy_static::lazy_static;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    pub static ref ENV_PREFIX: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref TIMEOUT_ENV: String = format!("{}_TIMEOUT_SECS", ENV_PREFIX.as_str());
    pub static ref FOLLOW_REDIRECTS_ENV: String = format!("{}_FOLLOW_REDIRECTS", ENV_PREFIX.as_str());
    pub static ref USER_AGENT_ENV: String = format!("{}_USER_AGENT", ENV_PREFIX.as_str());
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidNumber { var: String, value: String },

    #[error("timeout must be between 1 and 60 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("{var} must be true or false, got '{value}'")]
    InvalidFlag { var: String, value: String },

    #[error("user agent must not be empty")]
    EmptyUserAgent,
}

/// Settings shared by every outbound lookup of a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Upper bound for one fetch or one DNS query.
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            follow_redirects: true,
            user_agent: format!("VanguardPosture/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScanConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(TIMEOUT_ENV.as_str()) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: TIMEOUT_ENV.clone(),
                    value: raw.clone(),
                })?;
            config = config.with_timeout_secs(secs)?;
        }

        if let Some(raw) = lookup(FOLLOW_REDIRECTS_ENV.as_str()) {
            config.follow_redirects = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidFlag {
                var: FOLLOW_REDIRECTS_ENV.clone(),
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup(USER_AGENT_ENV.as_str()) {
            let agent = raw.trim();
            if agent.is_empty() {
                return Err(ConfigError::EmptyUserAgent);
            }
            config.user_agent = agent.to_string();
        }

        debug!(?config, "Scan configuration loaded.");
        Ok(config)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(ConfigError::TimeoutOutOfRange(secs));
        }
        self.timeout = Duration::from_secs(secs);
        Ok(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
