//! # Integration Tests
//!
//! Whole-call flows: real `TcpRttProbe` against loopback listeners, scripted
//! resolvers for DNS4, and the JSON-RPC handler on top.

pub mod flows;
pub mod rpc;
