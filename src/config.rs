//! Runtime settings from the environment.
//!
//! Every setting has a default that is logged when the variable is unset. A
//! set-but-unparsable value is a startup error.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Request queue capacity of the session actor.
    pub session_buffer: usize,
    /// Idle seconds before a session draft is dropped; 0 keeps drafts forever.
    pub session_ttl_secs: u64,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary source, e.g. a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load(&lookup, "TACO_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "TACO_PORT", "8080")?,
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://taco-cloud.db?mode=rwc")?,
            session_buffer: try_load(&lookup, "TACO_SESSION_BUFFER", "64")?,
            session_ttl_secs: try_load(&lookup, "TACO_SESSION_TTL_SECS", "1800")?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs))
    }
}

fn try_load<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    value.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }
    })
}
