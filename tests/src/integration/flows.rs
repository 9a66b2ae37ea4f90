//! # Integration Test Flows
//!
//! Full `PingService` calls over real sockets:
//!
//! 1. **Enode batch**: live listener, closed port and malformed input side by side
//! 2. **Multiaddr batch**: literal `ip4`, resolved `dns4` and a failed lookup
//! 3. **Deadline and cancellation**: the call returns on time with every slot filled
//! 4. **Bounded fan-out**: no more than `max_concurrency` probes in flight

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use tokio::net::TcpListener;

    use mailserver_ping::testing::{enode_url, MockRttProbe, StaticNameResolver};
    use mailserver_ping::{
        CancellationToken, CanonicalTarget, PingApi, PingConfig, PingError, PingQuery,
        PingResult, PingService, ProbeFailure, RttProbe, Scheme, TcpRttProbe,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Bind a loopback listener and return it with its port.
    async fn live_listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    /// A loopback port with nothing listening on it.
    async fn closed_port() -> u16 {
        let (listener, port) = live_listener().await;
        drop(listener);
        port
    }

    fn tcp_service(
        resolver: StaticNameResolver,
    ) -> PingService<TcpRttProbe, StaticNameResolver> {
        PingService::new(
            Arc::new(TcpRttProbe::new()),
            Arc::new(resolver),
            PingConfig::default(),
        )
        .unwrap()
    }

    fn find<'a>(results: &'a [PingResult], address: &str) -> &'a PingResult {
        results.iter().find(|r| r.address == address).unwrap()
    }

    /// Probe that records how many measurements overlap.
    #[derive(Default)]
    struct OverlapProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl RttProbe for OverlapProbe {
        async fn measure(&self, _target: &CanonicalTarget) -> Result<u64, ProbeFailure> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(20)
        }
    }

    // =============================================================================
    // FLOW 1: ENODE BATCH
    // =============================================================================

    #[tokio::test]
    async fn test_enode_batch_against_loopback() {
        let (_listener, live) = live_listener().await;
        let closed = closed_port().await;

        let reachable = enode_url(1, "127.0.0.1", live);
        let refused = enode_url(2, "127.0.0.1", closed);
        let malformed = "enode://nothex@127.0.0.1:30303".to_string();

        let service = tcp_service(StaticNameResolver::new());
        let results = service
            .ping(PingQuery::new(
                vec![reachable.clone(), refused.clone(), malformed.clone()],
                2_000,
            ))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(find(&results, &reachable).rtt_ms.is_some());

        let refused = find(&results, &refused);
        assert!(refused.rtt_ms.is_none());
        assert!(refused.error.as_deref().unwrap().starts_with("unreachable"));

        let malformed = find(&results, &malformed);
        assert!(malformed
            .error
            .as_deref()
            .unwrap()
            .starts_with("invalid public key"));
    }

    // =============================================================================
    // FLOW 2: MULTIADDR BATCH
    // =============================================================================

    #[tokio::test]
    async fn test_multiaddr_batch_with_dns4() {
        let (_listener, live) = live_listener().await;
        let resolver = StaticNameResolver::new().with_cname("mail.example.test", "127.0.0.1.");

        let literal = format!("/ip4/127.0.0.1/tcp/{live}");
        let resolved = format!("/dns4/mail.example.test/tcp/{live}/wss");
        let unresolved = format!("/dns4/missing.example.test/tcp/{live}");

        let service = tcp_service(resolver);
        let results = service
            .multiaddress_ping(PingQuery::new(
                vec![literal.clone(), resolved.clone(), unresolved.clone()],
                2_000,
            ))
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(find(&results, &literal).rtt_ms.is_some());
        assert!(find(&results, &resolved).rtt_ms.is_some());
        assert!(find(&results, &unresolved)
            .error
            .as_deref()
            .unwrap()
            .starts_with("failed to resolve missing.example.test"));
    }

    #[tokio::test]
    async fn test_mailserver_version_selects_grammar() {
        let (_listener, live) = live_listener().await;
        let service = tcp_service(StaticNameResolver::new());
        let address = format!("/ip4/127.0.0.1/tcp/{live}");

        let as_v2 = service
            .ping_scheme(
                PingQuery::new(vec![address.clone()], 2_000),
                Scheme::for_mailserver_version(2),
                CancellationToken::new(),
            )
            .await
            .unwrap();
        let as_v1 = service
            .ping_scheme(
                PingQuery::new(vec![address], 2_000),
                Scheme::for_mailserver_version(1),
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(as_v2[0].is_reachable());
        assert!(!as_v1[0].is_reachable());
    }

    // =============================================================================
    // FLOW 3: DEADLINE AND CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_call_returns_near_deadline() {
        let (_listener, live) = live_listener().await;
        let hung = CanonicalTarget::new("10.1.1.1", 1);
        let probe = MockRttProbe::new()
            .with_rtt(&CanonicalTarget::new("127.0.0.1", live), 1)
            .with_delay(&hung, Duration::from_secs(60));
        let service = PingService::new(
            Arc::new(probe),
            Arc::new(StaticNameResolver::new()),
            PingConfig::default(),
        )
        .unwrap();

        let started = Instant::now();
        let results = service
            .multiaddress_ping(PingQuery::new(
                vec![
                    "/ip4/10.1.1.1/tcp/1".into(),
                    format!("/ip4/127.0.0.1/tcp/{live}"),
                ],
                200,
            ))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(results[0].error.as_deref(), Some("i/o timeout after 200ms"));
        assert_eq!(results[1].rtt_ms, Some(1));
    }

    #[tokio::test]
    async fn test_ctrl_c_style_cancellation() {
        let probe = MockRttProbe::new()
            .with_default_rtt(1)
            .with_default_delay(Duration::from_secs(60));
        let service = PingService::new(
            Arc::new(probe),
            Arc::new(StaticNameResolver::new()),
            PingConfig::default(),
        )
        .unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let results = service
            .ping_scheme(
                PingQuery::new(
                    vec!["/ip4/10.0.0.1/tcp/1".into(), "/ip4/10.0.0.2/tcp/2".into()],
                    30_000,
                ),
                Scheme::Multiaddr,
                cancel,
            )
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|r| r.error.as_deref() == Some("probe cancelled")));
    }

    #[tokio::test]
    async fn test_unbindable_source_fails_call() {
        let (_listener, live) = live_listener().await;
        let probe = TcpRttProbe::new().with_bind_address(Some("192.0.2.1".parse().unwrap()));
        let service = PingService::new(
            Arc::new(probe),
            Arc::new(StaticNameResolver::new()),
            PingConfig::default(),
        )
        .unwrap();

        let err = service
            .multiaddress_ping(PingQuery::new(
                vec![format!("/ip4/127.0.0.1/tcp/{live}"), "garbage".into()],
                2_000,
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, PingError::ProbeUnavailable(_)));
    }

    // =============================================================================
    // FLOW 4: BOUNDED FAN-OUT
    // =============================================================================

    #[tokio::test]
    async fn test_fan_out_respects_max_concurrency() {
        let probe = Arc::new(OverlapProbe::default());
        let config = PingConfig {
            max_concurrency: 3,
            ..PingConfig::default()
        };
        let service = PingService::new(
            Arc::clone(&probe),
            Arc::new(StaticNameResolver::new()),
            config,
        )
        .unwrap();

        let addresses: Vec<String> = (1..=12)
            .map(|i| format!("/ip4/10.0.0.{i}/tcp/30303"))
            .collect();
        let results = service
            .multiaddress_ping(PingQuery::new(addresses, 5_000))
            .await
            .unwrap();

        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|r| r.rtt_ms == Some(20)));
        assert!(probe.peak.load(Ordering::SeqCst) <= 3);
    }
}
