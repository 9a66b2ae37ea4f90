//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//! - Driven Ports (outbound) - measurement primitive and name resolution

pub mod inbound;
pub mod outbound;

pub use inbound::{PingApi, PingQuery};
pub use outbound::{NameResolver, RttProbe};
