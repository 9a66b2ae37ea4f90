//! # Mailserver Ping Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # End-to-end flows against loopback listeners
//! └── benches/           # Normalization and correlation benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mailserver-ping-tests
//! cargo bench -p mailserver-ping-tests
//! ```

pub mod integration;
