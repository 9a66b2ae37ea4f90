//! Ping configuration with validation.

use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::PingError;

/// Upper bound for a single DNS4 lookup.
pub const MAX_DNS_TIMEOUT_MS: u64 = 1_000;

/// Tunables for the prober.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PingConfig {
    /// Timeout used when the caller supplies none (500ms)
    pub default_timeout_ms: u64,
    /// Maximum probe units running at once (64)
    pub max_concurrency: usize,
    /// Budget for one CNAME lookup, at most 1s (1000ms)
    pub dns_timeout_ms: u64,
    /// Local source address for TCP probes
    pub bind_address: Option<IpAddr>,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 500,
            max_concurrency: 64,
            dns_timeout_ms: MAX_DNS_TIMEOUT_MS,
            bind_address: None,
        }
    }
}

impl PingConfig {
    /// Testing config with small budgets
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_testing() -> Self {
        Self {
            default_timeout_ms: 100,
            max_concurrency: 4,
            dns_timeout_ms: 50,
            bind_address: None,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PingError> {
        if self.default_timeout_ms == 0 {
            return Err(PingError::InvalidConfig(
                "default_timeout_ms cannot be 0".into(),
            ));
        }

        if self.max_concurrency == 0 {
            return Err(PingError::InvalidConfig(
                "max_concurrency cannot be 0".into(),
            ));
        }

        if self.dns_timeout_ms == 0 || self.dns_timeout_ms > MAX_DNS_TIMEOUT_MS {
            return Err(PingError::InvalidConfig(format!(
                "dns_timeout_ms must be in 1..={}, got {}",
                MAX_DNS_TIMEOUT_MS, self.dns_timeout_ms
            )));
        }

        Ok(())
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }
}
