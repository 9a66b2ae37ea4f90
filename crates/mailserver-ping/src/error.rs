//! Error types for the mailserver ping subsystem
//!
//! Two layers:
//! - Per-address errors (`ParseError`, `PeerError`) never abort a batch. Their
//!   `Display` output is what callers see in a result's `error` field.
//! - Call-level errors (`PingError`) fail the whole call.

use thiserror::Error;

/// A descriptor does not conform to its scheme's grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid URL: {0}")]
    MalformedUrl(String),

    #[error("invalid URL scheme, want \"enode\", got {0:?}")]
    InvalidScheme(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid host: {0}")]
    InvalidHost(String),

    #[error("invalid port: {0}")]
    InvalidPort(String),

    #[error("invalid discport in query: {0}")]
    InvalidDiscoveryPort(String),

    /// A required entry is absent from the enode record.
    #[error("missing ENR key {0:?}")]
    MissingRecordKey(&'static str),

    #[error("invalid multiaddr: {0}")]
    MalformedMultiaddr(String),

    #[error("protocol not found in multiaddr: {0}")]
    MissingProtocol(&'static str),
}

/// Per-address failure, surfaced as the `error` string of a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    /// Descriptor failed to parse; nothing was dispatched for it.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// DNS4 name lookup failed or timed out; nothing was dispatched for it.
    #[error("failed to resolve {host}: {reason}")]
    Resolution { host: String, reason: String },

    /// Probe completed with a transport error.
    #[error("unreachable: {reason}")]
    Unreachable { reason: String },

    /// Probe did not finish before the shared deadline.
    #[error("i/o timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The call was cancelled before this probe completed.
    #[error("probe cancelled")]
    Cancelled,

    /// A dispatched target came back without any probe report.
    #[error("no probe result recorded")]
    NotProbed,
}

impl PeerError {
    /// True for errors raised before any probe was dispatched.
    pub fn is_normalization_failure(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Resolution { .. })
    }
}

/// What a measurement primitive reports when it cannot produce an RTT.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeFailure {
    /// The target did not answer or the transport failed. Local to one target.
    #[error("{0}")]
    Unreachable(String),

    /// The primitive itself cannot be used at all. Fails the whole call.
    #[error("probe misconfigured: {0}")]
    Misconfigured(String),
}

/// Call-level failure. No per-address results are produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PingError {
    #[error("measurement primitive unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("invalid ping configuration: {0}")]
    InvalidConfig(String),
}

/// Errors from the name resolver port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no such host")]
    NotFound,

    #[error("lookup timed out")]
    Timeout,

    #[error("no resolver available: {0}")]
    NoResolver(String),

    #[error("lookup failed: {0}")]
    Lookup(String),
}
