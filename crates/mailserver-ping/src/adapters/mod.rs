//! # Adapters
//!
//! Concrete implementations of the driven ports plus host-facing glue.
//! Each adapter is behind the feature that pulls in its dependencies.

/// TOML + environment configuration loading.
/// Requires feature: `network`
#[cfg(feature = "network")]
pub mod config;

/// Hickory-backed CNAME resolver.
/// Requires feature: `network`
#[cfg(feature = "network")]
pub mod dns;

/// TCP connect RTT probe.
/// Requires feature: `network`
#[cfg(feature = "network")]
pub mod tcp_probe;

/// JSON-RPC request shaping.
/// Requires feature: `rpc`
#[cfg(feature = "rpc")]
pub mod api_handler;

#[cfg(feature = "network")]
pub use config::{ConfigError, TomlConfigLoader};
#[cfg(feature = "network")]
pub use dns::HickoryNameResolver;
#[cfg(feature = "network")]
pub use tcp_probe::TcpRttProbe;

#[cfg(feature = "rpc")]
pub use api_handler::{
    handle_api_query, ApiGatewayHandler, ApiQueryError, METHOD_MULTIADDRESS_PING, METHOD_PING,
};
