//! # Service Layer
//!
//! `PingService` implements the `PingApi` driving port on top of the
//! normalizer and the concurrent prober.
//!
//! Control flow per call:
//! caller → `Normalizer` (sequential) → `CorrelationTable` → `ConcurrentProber`
//! (bounded, parallel) → `reassemble` → caller

mod normalizer;
mod ping_service;
mod prober;

pub use normalizer::Normalizer;
pub use ping_service::PingService;
pub use prober::{ConcurrentProber, ProbeBatch};
