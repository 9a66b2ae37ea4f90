//! # Domain Layer
//!
//! Pure logic, no I/O: address grammars, the correlation table and result
//! reassembly.

pub mod config;
pub mod correlation;
pub mod descriptor;
pub mod enode;
pub mod multiaddress;
pub mod outcome;
pub mod reassembly;

pub use config::{PingConfig, MAX_DNS_TIMEOUT_MS};
pub use correlation::CorrelationTable;
pub use descriptor::{CanonicalTarget, PeerDescriptor, Scheme, MULTIADDR_MAILSERVER_VERSION};
pub use enode::{enode_to_target, EnodeRecord, NodePublicKey};
pub use multiaddress::{EndpointHost, MultiaddrEndpoint};
pub use outcome::{PingResult, ProbeOutcome, ProbeReport, ResultSlot};
pub use reassembly::reassemble;
