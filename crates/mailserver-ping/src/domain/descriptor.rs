//! Peer descriptors, address schemes and canonical targets.

use std::fmt;

/// Mailserver protocol version whose addresses are multiaddrs.
pub const MULTIADDR_MAILSERVER_VERSION: u32 = 2;

/// The grammar a batch of descriptors is written in.
///
/// Fixed per call: the caller always states which grammar it is feeding in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `enode://<pubkey>@<ip>:<port>` peer URLs.
    Enode,
    /// Self-describing `/proto/value/...` multiaddrs.
    Multiaddr,
}

impl Scheme {
    /// Pick the scheme a mailserver of the given protocol version advertises.
    pub fn for_mailserver_version(version: u32) -> Self {
        if version == MULTIADDR_MAILSERVER_VERSION {
            Self::Multiaddr
        } else {
            Self::Enode
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enode => write!(f, "enode"),
            Self::Multiaddr => write!(f, "multiaddr"),
        }
    }
}

/// Caller-supplied peer identifier. Immutable input, only ever read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerDescriptor(String);

impl PeerDescriptor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for PeerDescriptor {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for PeerDescriptor {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PeerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized `host:port` form used to actually dial a peer.
///
/// Many descriptors may share one target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalTarget {
    host: String,
    port: u16,
}

impl CanonicalTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for CanonicalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
