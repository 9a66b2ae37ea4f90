//! Centralized Testing Utilities
//!
//! Mocks for both driven ports plus descriptor fixtures.
//! Available with the `test-utils` feature flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use k256::ecdsa::SigningKey;

use crate::domain::CanonicalTarget;
use crate::error::{ProbeFailure, ResolveError};
use crate::ports::{NameResolver, RttProbe};

// =============================================================================
// MOCK RTT PROBE
// =============================================================================

/// Scripted measurement primitive.
///
/// Targets without a scripted result use the default RTT if one is set,
/// otherwise they fail as unreachable. Delays run on the tokio clock, so
/// paused-time tests stay instant.
#[derive(Debug, Default)]
pub struct MockRttProbe {
    results: HashMap<CanonicalTarget, Result<u64, ProbeFailure>>,
    delays: HashMap<CanonicalTarget, Duration>,
    default_rtt: Option<u64>,
    default_delay: Duration,
    calls: AtomicUsize,
}

impl MockRttProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rtt(mut self, target: &CanonicalTarget, rtt_ms: u64) -> Self {
        self.results.insert(target.clone(), Ok(rtt_ms));
        self
    }

    pub fn with_failure(mut self, target: &CanonicalTarget, reason: &str) -> Self {
        self.results.insert(
            target.clone(),
            Err(ProbeFailure::Unreachable(reason.to_string())),
        );
        self
    }

    pub fn with_misconfiguration(mut self, target: &CanonicalTarget, reason: &str) -> Self {
        self.results.insert(
            target.clone(),
            Err(ProbeFailure::Misconfigured(reason.to_string())),
        );
        self
    }

    pub fn with_delay(mut self, target: &CanonicalTarget, delay: Duration) -> Self {
        self.delays.insert(target.clone(), delay);
        self
    }

    pub fn with_default_rtt(mut self, rtt_ms: u64) -> Self {
        self.default_rtt = Some(rtt_ms);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    /// Number of `measure` calls started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RttProbe for MockRttProbe {
    async fn measure(&self, target: &CanonicalTarget) -> Result<u64, ProbeFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = self
            .delays
            .get(target)
            .copied()
            .unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match self.results.get(target) {
            Some(result) => result.clone(),
            None => self
                .default_rtt
                .ok_or_else(|| ProbeFailure::Unreachable("connection refused".to_string())),
        }
    }
}

// =============================================================================
// STATIC NAME RESOLVER
// =============================================================================

/// In-memory CNAME table. Unknown names are `NotFound`.
///
/// Clones share the lookup counter.
#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    records: HashMap<String, Result<String, ResolveError>>,
    delay: Duration,
    lookups: Arc<AtomicUsize>,
}

impl StaticNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cname(mut self, host: &str, canonical: &str) -> Self {
        self.records
            .insert(host.to_string(), Ok(canonical.to_string()));
        self
    }

    pub fn with_error(mut self, host: &str, error: ResolveError) -> Self {
        self.records.insert(host.to_string(), Err(error));
        self
    }

    /// Delay every lookup, to exercise the lookup timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn lookup_cname(&self, host: &str) -> Result<String, ResolveError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.records
            .get(host)
            .cloned()
            .unwrap_or(Err(ResolveError::NotFound))
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

/// Hex public key derived from a fixed secret scalar, so fixtures are stable.
pub fn fixture_pubkey_hex(seed: u8) -> String {
    let mut secret = [0u8; 32];
    secret[31] = seed.max(1);
    let key = SigningKey::from_slice(&secret).expect("small non-zero scalar is a valid key");
    let point = key.verifying_key().to_encoded_point(false);
    hex::encode(&point.as_bytes()[1..])
}

/// `enode://<key>@<host>:<port>` with a valid key.
pub fn enode_url(seed: u8, host: &str, port: u16) -> String {
    format!("enode://{}@{}:{}", fixture_pubkey_hex(seed), host, port)
}
