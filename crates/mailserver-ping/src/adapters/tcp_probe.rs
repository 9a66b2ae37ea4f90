//! # TCP RTT Probe
//!
//! Production measurement primitive: one TCP connect per call, timed.
//!
//! The connect handshake is one round trip, so its duration is the RTT.
//! No bytes are exchanged and the connection is dropped immediately.

use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::net::TcpSocket;
use tokio::time::Instant;

use crate::domain::CanonicalTarget;
use crate::error::ProbeFailure;
use crate::ports::RttProbe;

/// Times a TCP connect to the target, optionally from a fixed local address.
#[derive(Debug, Clone, Default)]
pub struct TcpRttProbe {
    bind_address: Option<IpAddr>,
}

impl TcpRttProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect from `address` instead of letting the OS pick.
    pub fn with_bind_address(mut self, address: Option<IpAddr>) -> Self {
        self.bind_address = address;
        self
    }

    async fn resolve(&self, target: &CanonicalTarget) -> Result<SocketAddr, ProbeFailure> {
        let mut candidates = tokio::net::lookup_host((target.host(), target.port()))
            .await
            .map_err(|e| ProbeFailure::Unreachable(format!("lookup {}: {}", target.host(), e)))?;

        // With a bind address only same-family peers are dialable.
        let wanted_v4 = self.bind_address.map(|ip| ip.is_ipv4());
        candidates
            .find(|addr| wanted_v4.map_or(true, |v4| addr.is_ipv4() == v4))
            .ok_or_else(|| {
                ProbeFailure::Unreachable(format!("no usable address for {}", target.host()))
            })
    }

    fn socket_for(&self, remote: &SocketAddr) -> Result<TcpSocket, ProbeFailure> {
        let socket = if remote.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(|e| ProbeFailure::Misconfigured(format!("cannot create socket: {e}")))?;

        if let Some(ip) = self.bind_address {
            socket
                .bind(SocketAddr::new(ip, 0))
                .map_err(|e| ProbeFailure::Misconfigured(format!("cannot bind {ip}: {e}")))?;
        }
        Ok(socket)
    }
}

#[async_trait]
impl RttProbe for TcpRttProbe {
    async fn measure(&self, target: &CanonicalTarget) -> Result<u64, ProbeFailure> {
        let remote = self.resolve(target).await?;
        let socket = self.socket_for(&remote)?;

        let started = Instant::now();
        let stream = socket
            .connect(remote)
            .await
            .map_err(|e| ProbeFailure::Unreachable(format!("dial tcp {remote}: {e}")))?;
        let rtt_ms = started.elapsed().as_millis() as u64;
        drop(stream);

        Ok(rtt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_measures_loopback_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let rtt = TcpRttProbe::new()
            .measure(&CanonicalTarget::new("127.0.0.1", port))
            .await
            .unwrap();

        assert!(rtt < 1_000);
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = TcpRttProbe::new()
            .measure(&CanonicalTarget::new("127.0.0.1", port))
            .await;

        assert!(matches!(result, Err(ProbeFailure::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_unbindable_source_is_misconfigured() {
        // 192.0.2.0/24 is reserved for documentation and never local.
        let probe = TcpRttProbe::new().with_bind_address(Some("192.0.2.1".parse().unwrap()));

        let result = probe.measure(&CanonicalTarget::new("127.0.0.1", 9)).await;

        assert!(matches!(result, Err(ProbeFailure::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_loopback_bind_address() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let probe = TcpRttProbe::new().with_bind_address(Some("127.0.0.1".parse().unwrap()));

        assert!(probe
            .measure(&CanonicalTarget::new("127.0.0.1", port))
            .await
            .is_ok());
    }
}
