//! # Address Normalizer
//!
//! Turns descriptors into canonical `host:port` targets.
//!
//! Runs sequentially: parsing is cheap and the only I/O, the DNS4 CNAME
//! lookup, is bounded by `dns_timeout` and abandoned when the call is
//! cancelled. Each failure stays attached to its own descriptor.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{enode_to_target, CanonicalTarget, MultiaddrEndpoint, PeerDescriptor, Scheme};
use crate::error::{PeerError, ResolveError};
use crate::ports::NameResolver;

/// Normalizes descriptors of either scheme.
pub struct Normalizer<R: NameResolver> {
    resolver: Arc<R>,
    dns_timeout: Duration,
}

impl<R: NameResolver> Normalizer<R> {
    pub fn new(resolver: Arc<R>, dns_timeout: Duration) -> Self {
        Self {
            resolver,
            dns_timeout,
        }
    }

    /// Normalize one descriptor.
    ///
    /// Once `cancel` fires, descriptors that still need a lookup fail with
    /// `Cancelled`; parsing still runs.
    pub async fn normalize(
        &self,
        descriptor: &PeerDescriptor,
        scheme: Scheme,
        cancel: &CancellationToken,
    ) -> Result<CanonicalTarget, PeerError> {
        match scheme {
            Scheme::Enode => Ok(enode_to_target(descriptor.as_str())?),
            Scheme::Multiaddr => self.normalize_multiaddr(descriptor.as_str(), cancel).await,
        }
    }

    /// Normalize a whole batch, keeping every descriptor paired with its outcome.
    pub async fn normalize_all(
        &self,
        descriptors: Vec<PeerDescriptor>,
        scheme: Scheme,
        cancel: &CancellationToken,
    ) -> Vec<(PeerDescriptor, Result<CanonicalTarget, PeerError>)> {
        let mut normalized = Vec::with_capacity(descriptors.len());
        let mut cancelled = 0usize;
        for descriptor in descriptors {
            let outcome = self.normalize(&descriptor, scheme, cancel).await;
            match &outcome {
                Err(error) if error.is_normalization_failure() => {
                    debug!(descriptor = %descriptor, %scheme, %error, "Normalization failed");
                }
                Err(_) => cancelled += 1,
                Ok(_) => {}
            }
            normalized.push((descriptor, outcome));
        }
        if cancelled > 0 {
            debug!(%scheme, cancelled, "Lookups skipped after cancellation");
        }
        normalized
    }

    async fn normalize_multiaddr(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<CanonicalTarget, PeerError> {
        let endpoint = MultiaddrEndpoint::parse(raw)?;
        if let Some(target) = endpoint.literal_target() {
            return Ok(target);
        }

        let name = endpoint.dns_name().unwrap_or_default();
        let canonical = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PeerError::Cancelled),
            resolved = self.resolve(name) => resolved?,
        };
        Ok(endpoint.target_with_host(canonical))
    }

    async fn resolve(&self, name: &str) -> Result<String, PeerError> {
        let lookup = tokio::time::timeout(self.dns_timeout, self.resolver.lookup_cname(name));
        let canonical = match lookup.await {
            Ok(Ok(canonical)) => canonical,
            Ok(Err(error)) => return Err(resolution_error(name, error)),
            Err(_) => return Err(resolution_error(name, ResolveError::Timeout)),
        };

        let canonical = canonical.trim_end_matches('.');
        if canonical.is_empty() {
            return Err(resolution_error(name, ResolveError::NotFound));
        }
        Ok(canonical.to_string())
    }
}

fn resolution_error(host: &str, error: ResolveError) -> PeerError {
    PeerError::Resolution {
        host: host.to_string(),
        reason: error.to_string(),
    }
}
