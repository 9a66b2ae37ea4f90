//! # Multiaddr Endpoints (Scheme B)
//!
//! Extracts the segments needed to dial a peer from a multiaddr such as
//! `/dns4/node.example.org/tcp/30303/p2p/16Uiu2...`.
//!
//! Only the first `dns4`, `ip4` and `tcp` segments matter. A `dns4` host wins
//! over an `ip4` host and still needs a CNAME lookup before it can be dialed.

use std::net::Ipv4Addr;

use multiaddr::{Multiaddr, Protocol};

use crate::domain::CanonicalTarget;
use crate::error::ParseError;

/// Host component of a multiaddr endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointHost {
    /// Hostname that must be resolved first.
    Dns4(String),
    /// Literal address, dialable as is.
    Ip4(Ipv4Addr),
}

/// Host and TCP port pulled out of a multiaddr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiaddrEndpoint {
    pub host: EndpointHost,
    pub tcp: u16,
}

impl MultiaddrEndpoint {
    /// Parse a multiaddr and extract its endpoint segments.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let addr: Multiaddr = raw
            .parse()
            .map_err(|e: multiaddr::Error| ParseError::MalformedMultiaddr(e.to_string()))?;

        let mut dns4 = None;
        let mut ip4 = None;
        let mut tcp = None;
        for protocol in addr.iter() {
            match protocol {
                Protocol::Dns4(name) if dns4.is_none() => dns4 = Some(name.into_owned()),
                Protocol::Ip4(ip) if ip4.is_none() => ip4 = Some(ip),
                Protocol::Tcp(port) if tcp.is_none() => tcp = Some(port),
                _ => {}
            }
        }

        let tcp = tcp.ok_or(ParseError::MissingProtocol("tcp"))?;
        let host = match (dns4, ip4) {
            (Some(name), _) => EndpointHost::Dns4(name),
            (None, Some(ip)) => EndpointHost::Ip4(ip),
            (None, None) => return Err(ParseError::MissingProtocol("ip4")),
        };

        Ok(Self { host, tcp })
    }

    /// Hostname still waiting for resolution, if any.
    pub fn dns_name(&self) -> Option<&str> {
        match &self.host {
            EndpointHost::Dns4(name) => Some(name),
            EndpointHost::Ip4(_) => None,
        }
    }

    /// Canonical target once the host is known.
    pub fn target_with_host(&self, host: impl Into<String>) -> CanonicalTarget {
        CanonicalTarget::new(host, self.tcp)
    }

    /// Canonical target for literal `ip4` endpoints, `None` when a lookup is needed.
    pub fn literal_target(&self) -> Option<CanonicalTarget> {
        match &self.host {
            EndpointHost::Ip4(ip) => Some(self.target_with_host(ip.to_string())),
            EndpointHost::Dns4(_) => None,
        }
    }
}
