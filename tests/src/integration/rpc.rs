//! # JSON-RPC Flow
//!
//! `mailservers_ping` / `mailservers_multiAddressPing` requests shaped by the
//! gateway handler and answered by a real TCP-probing service.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::net::TcpListener;

    use mailserver_ping::testing::{enode_url, StaticNameResolver};
    use mailserver_ping::{
        handle_api_query, ApiGatewayHandler, PingConfig, PingResult, PingService, TcpRttProbe,
        METHOD_MULTIADDRESS_PING, METHOD_PING,
    };

    type Handler = ApiGatewayHandler<PingService<TcpRttProbe, StaticNameResolver>>;

    fn handler() -> Handler {
        let service = PingService::new(
            Arc::new(TcpRttProbe::new()),
            Arc::new(StaticNameResolver::new().with_cname("mail.example.test", "127.0.0.1")),
            PingConfig::default(),
        )
        .unwrap();
        ApiGatewayHandler::new(service)
    }

    #[tokio::test]
    async fn test_rpc_round_trip_over_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handler = handler();

        let enode = enode_url(9, "127.0.0.1", port);
        let response = handle_api_query(
            &handler,
            METHOD_PING,
            &json!([{"addresses": [enode.clone(), "enode://bad"], "timeoutMs": 2000}]),
        )
        .await
        .unwrap();

        let results: Vec<PingResult> = serde_json::from_value(response).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].address, enode);
        assert!(results[0].rtt_ms.is_some());
        assert!(results[0].error.is_none());
        assert!(results[1].rtt_ms.is_none());
        assert!(results[1].error.is_some());
    }

    #[tokio::test]
    async fn test_multiaddress_rpc_uses_default_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handler = handler();

        let address = format!("/dns4/mail.example.test/tcp/{port}");
        let response = handle_api_query(
            &handler,
            METHOD_MULTIADDRESS_PING,
            &json!({"addresses": [address]}),
        )
        .await
        .unwrap();

        assert!(response[0]["rttMs"].is_u64());
        assert!(response[0]["error"].is_null());
    }
}
