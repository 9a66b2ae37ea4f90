//! # Ping Service
//!
//! Orchestrates one call: normalize, build the correlation table, probe the
//! dispatch list, reassemble.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::{reassemble, CorrelationTable, PeerDescriptor, PingConfig, PingResult, Scheme};
use crate::error::PingError;
use crate::ports::{NameResolver, PingApi, PingQuery, RttProbe};
use crate::service::{ConcurrentProber, Normalizer};

/// Reachability prober service.
///
/// Holds no per-call state: every call builds and discards its own table.
pub struct PingService<P: RttProbe + 'static, R: NameResolver> {
    normalizer: Normalizer<R>,
    prober: ConcurrentProber<P>,
    config: PingConfig,
}

impl<P: RttProbe + 'static, R: NameResolver> PingService<P, R> {
    /// Create a service over the given measurement primitive and resolver.
    pub fn new(probe: Arc<P>, resolver: Arc<R>, config: PingConfig) -> Result<Self, PingError> {
        config.validate()?;

        Ok(Self {
            normalizer: Normalizer::new(resolver, config.dns_timeout()),
            prober: ConcurrentProber::new(probe, config.max_concurrency),
            config,
        })
    }

    fn effective_timeout(&self, query: &PingQuery) -> Duration {
        query
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.default_timeout())
    }
}

#[async_trait]
impl<P: RttProbe + 'static, R: NameResolver> PingApi for PingService<P, R> {
    async fn ping_scheme(
        &self,
        query: PingQuery,
        scheme: Scheme,
        cancel: CancellationToken,
    ) -> Result<Vec<PingResult>, PingError> {
        let started = Instant::now();
        let timeout = self.effective_timeout(&query);
        let descriptors: Vec<PeerDescriptor> =
            query.addresses.into_iter().map(PeerDescriptor::new).collect();
        let inputs = descriptors.len();

        let normalized = self
            .normalizer
            .normalize_all(descriptors, scheme, &cancel)
            .await;
        let table = CorrelationTable::build(normalized);
        let parse_failures = table.failed_count();
        let dispatched = table.dispatch_list().len();

        let batch = self
            .prober
            .probe_all(table.dispatch_list(), timeout, &cancel)
            .await;

        if let Some(reason) = batch.misconfigured {
            warn!(%scheme, inputs, %reason, "Ping call failed");
            return Err(PingError::ProbeUnavailable(reason));
        }
        if batch.lost_units > 0 {
            warn!(lost = batch.lost_units, "Some probe units produced no report");
        }

        let results = reassemble(table, batch.reports);
        let reachable = results.iter().filter(|r| r.is_reachable()).count();

        info!(
            %scheme,
            inputs,
            dispatched,
            parse_failures,
            reachable,
            unreachable = results.len() - reachable,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ping batch complete"
        );

        Ok(results)
    }
}
