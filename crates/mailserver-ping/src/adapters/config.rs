//! # Configuration Loading
//!
//! `TomlConfigLoader` reads the `[ping]` table of a TOML file, then applies
//! environment overrides, then validates.
//!
//! ```toml
//! [ping]
//! default_timeout_ms = 500
//! max_concurrency = 64
//! dns_timeout_ms = 1000
//! bind_address = "0.0.0.0"
//! ```

use std::fs;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::PingConfig;

pub const ENV_TIMEOUT_MS: &str = "MAILSERVER_PING_TIMEOUT_MS";
pub const ENV_MAX_CONCURRENCY: &str = "MAILSERVER_PING_MAX_CONCURRENCY";
pub const ENV_DNS_TIMEOUT_MS: &str = "MAILSERVER_PING_DNS_TIMEOUT_MS";
pub const ENV_BIND_ADDRESS: &str = "MAILSERVER_PING_BIND_ADDRESS";

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    ping: PingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PingSection {
    default_timeout_ms: Option<u64>,
    max_concurrency: Option<usize>,
    dns_timeout_ms: Option<u64>,
    bind_address: Option<IpAddr>,
}

/// TOML file + environment configuration loader.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// Load from a TOML file, then the environment.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PingConfig, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_sources(&content, |key| std::env::var(key).ok())
    }

    /// Defaults plus the environment, for runs without a config file.
    pub fn from_env() -> Result<PingConfig, ConfigError> {
        Self::from_sources("", |key| std::env::var(key).ok())
    }

    /// Parse `content` and apply overrides looked up through `env`.
    pub fn from_sources<F>(content: &str, env: F) -> Result<PingConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = PingConfig::default();
        let section = file.ping;
        let mut config = PingConfig {
            default_timeout_ms: section
                .default_timeout_ms
                .unwrap_or(defaults.default_timeout_ms),
            max_concurrency: section.max_concurrency.unwrap_or(defaults.max_concurrency),
            dns_timeout_ms: section.dns_timeout_ms.unwrap_or(defaults.dns_timeout_ms),
            bind_address: section.bind_address.or(defaults.bind_address),
        };

        if let Some(value) = env_value(&env, ENV_TIMEOUT_MS) {
            config.default_timeout_ms = value;
        }
        if let Some(value) = env_value(&env, ENV_MAX_CONCURRENCY) {
            config.max_concurrency = value;
        }
        if let Some(value) = env_value(&env, ENV_DNS_TIMEOUT_MS) {
            config.dns_timeout_ms = value;
        }
        if let Some(value) = env_value(&env, ENV_BIND_ADDRESS) {
            config.bind_address = Some(value);
        }

        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

fn env_value<F, T>(env: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}
