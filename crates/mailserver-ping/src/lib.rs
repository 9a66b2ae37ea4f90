//! # Mailserver Ping
//!
//! Concurrent reachability prober for mailserver peers.
//!
//! Given a batch of peer descriptors in one of two address schemes (enode
//! URLs or multiaddrs), the crate resolves each to a dialable `host:port`,
//! probes every endpoint concurrently under one shared deadline, and returns
//! exactly one result per input, including inputs that failed to parse.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** address grammars, correlation table, reassembly
//! - **Ports Layer:** `PingApi` (inbound), `RttProbe` and `NameResolver` (outbound)
//! - **Service Layer:** `Normalizer`, `ConcurrentProber`, `PingService`
//! - **Adapters Layer:** Concrete implementations (feature-gated)
//!
//! ## Features
//!
//! - `network` - TCP probe, hickory resolver, TOML config (tokio, hickory-resolver, toml)
//! - `rpc` - JSON-RPC request handler (serde_json)
//! - `test-utils` - mocks and fixtures
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mailserver_ping::{
//!     HickoryNameResolver, PingApi, PingConfig, PingQuery, PingService, TcpRttProbe,
//! };
//!
//! let service = PingService::new(
//!     Arc::new(TcpRttProbe::new()),
//!     Arc::new(HickoryNameResolver::from_system_conf()),
//!     PingConfig::default(),
//! )?;
//!
//! let results = service
//!     .multiaddress_ping(PingQuery::new(vec!["/dns4/node.example.org/tcp/443/wss".into()], 500))
//!     .await?;
//! for result in results {
//!     println!("{} {:?} {:?}", result.address, result.rtt_ms, result.error);
//! }
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// =============================================================================
// FEATURE-GATED MODULES
// =============================================================================

/// Adapters for external integrations.
/// Different adapters require different features.
#[cfg(any(feature = "network", feature = "rpc"))]
pub mod adapters;

/// Test utilities (MockRttProbe, StaticNameResolver, fixtures)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    enode_to_target, reassemble, CanonicalTarget, CorrelationTable, EndpointHost, EnodeRecord,
    MultiaddrEndpoint, NodePublicKey, PeerDescriptor, PingConfig, PingResult, ProbeOutcome,
    ProbeReport, ResultSlot, Scheme, MAX_DNS_TIMEOUT_MS, MULTIADDR_MAILSERVER_VERSION,
};

// Errors
pub use error::{ParseError, PeerError, PingError, ProbeFailure, ResolveError};

// Port traits
pub use ports::{NameResolver, PingApi, PingQuery, RttProbe};

// Service
pub use service::{ConcurrentProber, Normalizer, PingService, ProbeBatch};

pub use tokio_util::sync::CancellationToken;

// =============================================================================
// ADAPTER RE-EXPORTS (Feature-Gated)
// =============================================================================

#[cfg(feature = "network")]
pub use adapters::{ConfigError, HickoryNameResolver, TcpRttProbe, TomlConfigLoader};

#[cfg(feature = "rpc")]
pub use adapters::{
    handle_api_query, ApiGatewayHandler, ApiQueryError, METHOD_MULTIADDRESS_PING, METHOD_PING,
};
