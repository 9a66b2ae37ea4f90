//! # Driving Ports (Inbound API)
//!
//! The calls this subsystem exposes to hosts (RPC layer, CLI, messenger).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::{PingResult, Scheme};
use crate::error::PingError;

/// A batch of descriptors to probe under one shared timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingQuery {
    /// Descriptors, all in the same scheme
    pub addresses: Vec<String>,
    /// Shared deadline for the whole batch; falls back to the configured default
    #[serde(rename = "timeoutMs", default)]
    pub timeout_ms: Option<u64>,
}

impl PingQuery {
    pub fn new(addresses: Vec<String>, timeout_ms: u64) -> Self {
        Self {
            addresses,
            timeout_ms: Some(timeout_ms),
        }
    }
}

/// Primary API for reachability probing.
///
/// Every call returns exactly one result per input address, unless the
/// measurement primitive itself is unusable.
#[async_trait]
pub trait PingApi: Send + Sync {
    /// Probe a batch written in `scheme`, abandoning outstanding probes when
    /// `cancel` fires.
    async fn ping_scheme(
        &self,
        query: PingQuery,
        scheme: Scheme,
        cancel: CancellationToken,
    ) -> Result<Vec<PingResult>, PingError>;

    /// Probe a batch of enode URLs.
    async fn ping(&self, query: PingQuery) -> Result<Vec<PingResult>, PingError> {
        self.ping_scheme(query, Scheme::Enode, CancellationToken::new())
            .await
    }

    /// Probe a batch of multiaddrs.
    async fn multiaddress_ping(&self, query: PingQuery) -> Result<Vec<PingResult>, PingError> {
        self.ping_scheme(query, Scheme::Multiaddr, CancellationToken::new())
            .await
    }
}
