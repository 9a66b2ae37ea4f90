//! Probe outcomes and the per-address result handed back to callers.

use serde::{Deserialize, Serialize};

use crate::domain::{CanonicalTarget, PeerDescriptor};
use crate::error::PeerError;

/// Result of one reachability probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable { rtt_ms: u64 },
    Unreachable { reason: PeerError },
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Reachable { .. })
    }
}

/// Outcome reported by the prober for one dispatched target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub target: CanonicalTarget,
    pub outcome: ProbeOutcome,
}

/// Mutable slot owned by exactly one input descriptor.
///
/// Created before probing, written at most once afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSlot {
    pub descriptor: PeerDescriptor,
    pub outcome: Option<ProbeOutcome>,
}

impl ResultSlot {
    pub fn pending(descriptor: PeerDescriptor) -> Self {
        Self {
            descriptor,
            outcome: None,
        }
    }

    pub fn failed(descriptor: PeerDescriptor, reason: PeerError) -> Self {
        Self {
            descriptor,
            outcome: Some(ProbeOutcome::Unreachable { reason }),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Flatten into the wire result. An unresolved slot becomes `NotProbed`.
    pub fn into_result(self) -> PingResult {
        let outcome = self.outcome.unwrap_or(ProbeOutcome::Unreachable {
            reason: PeerError::NotProbed,
        });
        PingResult::from_outcome(self.descriptor.into_string(), outcome)
    }
}

/// Per-address result: exactly one of `rtt_ms` / `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResult {
    /// Original descriptor, byte for byte
    pub address: String,
    /// Round-trip time in milliseconds
    #[serde(rename = "rttMs")]
    pub rtt_ms: Option<u64>,
    /// Failure description
    pub error: Option<String>,
}

impl PingResult {
    pub fn from_outcome(address: String, outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::Reachable { rtt_ms } => Self {
                address,
                rtt_ms: Some(rtt_ms),
                error: None,
            },
            ProbeOutcome::Unreachable { reason } => Self {
                address,
                rtt_ms: None,
                error: Some(reason.to_string()),
            },
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.rtt_ms.is_some()
    }
}
