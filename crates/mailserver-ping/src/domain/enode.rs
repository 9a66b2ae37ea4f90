//! # Enode Peer URLs (Scheme A)
//!
//! Parses `enode://<pubkey>@<ip>:<tcp>[?discport=<udp>]` into a node record
//! and extracts the dialable endpoint from it.
//!
//! ## Record Entries
//!
//! The record mirrors the key/value layout of an Ethereum Node Record:
//! - `ip`   - present only when the URL host is IPv4 (or IPv4-mapped IPv6)
//! - `ip6`  - present only for a genuine IPv6 host
//! - `tcp`  - present only for a non-zero TCP port
//! - `udp`  - from `discport`, defaulting to the TCP port
//!
//! An identity-only URL (`enode://<pubkey>`) parses to a record with no
//! network entries at all.
//!
//! Reference: EIP-778 (Ethereum Node Records)

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use url::{Host, Url};

use crate::domain::CanonicalTarget;
use crate::error::ParseError;

/// URL scheme of Scheme A descriptors.
pub const ENODE_SCHEME: &str = "enode";

/// Uncompressed secp256k1 key length without the 0x04 prefix.
pub const PUBKEY_LEN: usize = 64;

// =============================================================================
// PUBLIC KEY
// =============================================================================

/// Node public key (64 bytes, uncompressed secp256k1 without prefix).
#[derive(Clone, PartialEq, Eq)]
pub struct NodePublicKey([u8; PUBKEY_LEN]);

impl NodePublicKey {
    /// Decode and validate a hex-encoded key.
    ///
    /// The key must lie on the secp256k1 curve.
    pub fn from_hex(encoded: &str) -> Result<Self, ParseError> {
        let bytes =
            hex::decode(encoded).map_err(|e| ParseError::InvalidPublicKey(e.to_string()))?;
        if bytes.len() != PUBKEY_LEN {
            return Err(ParseError::InvalidPublicKey(format!(
                "wrong length, want {} hex chars, got {}",
                PUBKEY_LEN * 2,
                encoded.len()
            )));
        }

        let mut sec1 = [0u8; PUBKEY_LEN + 1];
        sec1[0] = 0x04;
        sec1[1..].copy_from_slice(&bytes);
        k256::PublicKey::from_sec1_bytes(&sec1).map_err(|_| {
            ParseError::InvalidPublicKey("not a point on the secp256k1 curve".to_string())
        })?;

        let mut key = [0u8; PUBKEY_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for NodePublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short form, full keys make logs unreadable
        write!(f, "NodePublicKey({}..)", &self.to_hex()[..8])
    }
}

// =============================================================================
// NODE RECORD
// =============================================================================

/// Node record decoded from an enode URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnodeRecord {
    /// Node's public key
    pub pubkey: NodePublicKey,
    /// `ip` entry
    pub ip4: Option<Ipv4Addr>,
    /// `ip6` entry
    pub ip6: Option<Ipv6Addr>,
    /// `tcp` entry
    pub tcp: Option<u16>,
    /// `udp` entry
    pub udp: Option<u16>,
}

impl EnodeRecord {
    /// Parse an enode URL.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let url = Url::parse(raw).map_err(|e| ParseError::MalformedUrl(e.to_string()))?;
        if url.scheme() != ENODE_SCHEME {
            return Err(ParseError::InvalidScheme(url.scheme().to_string()));
        }

        // Identity-only form: the authority is the key itself
        if url.username().is_empty() {
            let encoded = url
                .host_str()
                .ok_or_else(|| ParseError::InvalidPublicKey("missing".to_string()))?;
            return Ok(Self {
                pubkey: NodePublicKey::from_hex(encoded)?,
                ip4: None,
                ip6: None,
                tcp: None,
                udp: None,
            });
        }

        let pubkey = NodePublicKey::from_hex(url.username())?;
        let ip = host_ip(&url)?;
        let tcp = url
            .port()
            .ok_or_else(|| ParseError::InvalidPort("missing".to_string()))?;
        let udp = match url.query_pairs().find(|(key, _)| key == "discport") {
            Some((_, value)) if !value.is_empty() => value
                .parse::<u16>()
                .map_err(|_| ParseError::InvalidDiscoveryPort(value.to_string()))?,
            _ => tcp,
        };

        let (ip4, ip6) = match ip {
            IpAddr::V4(v4) => (Some(v4), None),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => (Some(v4), None),
                None => (None, Some(v6)),
            },
        };

        Ok(Self {
            pubkey,
            ip4,
            ip6,
            tcp: (tcp != 0).then_some(tcp),
            udp: (udp != 0).then_some(udp),
        })
    }

    /// Load the `ip` entry.
    pub fn load_ip4(&self) -> Result<Ipv4Addr, ParseError> {
        self.ip4.ok_or(ParseError::MissingRecordKey("ip"))
    }

    /// Load the `tcp` entry.
    pub fn load_tcp(&self) -> Result<u16, ParseError> {
        self.tcp.ok_or(ParseError::MissingRecordKey("tcp"))
    }

    /// `<ipv4>:<tcp>` endpoint of this record.
    pub fn canonical_target(&self) -> Result<CanonicalTarget, ParseError> {
        let ip = self.load_ip4()?;
        let tcp = self.load_tcp()?;
        Ok(CanonicalTarget::new(ip.to_string(), tcp))
    }
}

fn host_ip(url: &Url) -> Result<IpAddr, ParseError> {
    match url.host() {
        Some(Host::Ipv4(v4)) => Ok(IpAddr::V4(v4)),
        Some(Host::Ipv6(v6)) => Ok(IpAddr::V6(v6)),
        Some(Host::Domain(name)) => name
            .parse::<IpAddr>()
            .map_err(|_| ParseError::InvalidHost(name.to_string())),
        None => Err(ParseError::InvalidHost("missing".to_string())),
    }
}

/// Normalize an enode URL to its `<ipv4>:<tcp>` canonical target.
pub fn enode_to_target(raw: &str) -> Result<CanonicalTarget, ParseError> {
    EnodeRecord::parse(raw)?.canonical_target()
}
