//! # Driven Ports (Outbound SPI)
//!
//! Interfaces this subsystem requires the host to provide.

use async_trait::async_trait;

use crate::domain::CanonicalTarget;
use crate::error::{ProbeFailure, ResolveError};

/// Black-box measurement primitive: one round-trip measurement per call.
///
/// Implementations must be `Send + Sync`; the prober runs many calls
/// concurrently against one shared instance. The prober enforces the shared
/// deadline and cancellation, so implementations need not time out
/// themselves, but must be cancel-safe (dropping the future aborts the probe).
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct IcmpProbe;
///
/// #[async_trait]
/// impl RttProbe for IcmpProbe {
///     async fn measure(&self, target: &CanonicalTarget) -> Result<u64, ProbeFailure> {
///         // Send an echo request to target.host() and time the reply
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait RttProbe: Send + Sync {
    /// Measure the round-trip time to `target`, in milliseconds.
    ///
    /// - `Err(ProbeFailure::Unreachable)` fails this target only.
    /// - `Err(ProbeFailure::Misconfigured)` fails the whole call.
    async fn measure(&self, target: &CanonicalTarget) -> Result<u64, ProbeFailure>;
}

/// Canonical-name lookup used for DNS4 multiaddr segments.
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Return the canonical name of `host`.
    ///
    /// A name without a CNAME record that still resolves is its own canonical
    /// name.
    async fn lookup_cname(&self, host: &str) -> Result<String, ResolveError>;
}
