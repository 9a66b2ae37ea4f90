//! # Concurrent Prober
//!
//! One probe unit per dispatched target, all racing a single shared deadline.
//!
//! ## Scheduling
//!
//! - Units live in a `JoinSet` owned by the call; nothing outlives it.
//! - A semaphore caps how many units measure at once. Waiting for a permit
//!   counts against the shared deadline.
//! - Each unit races: caller cancellation, the deadline, the measurement.
//!   Whichever fires first decides that unit's outcome only.
//!
//! A `Misconfigured` measurement cancels the remaining units and is reported
//! separately so the caller can fail the whole call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{CanonicalTarget, ProbeOutcome, ProbeReport};
use crate::error::{PeerError, ProbeFailure};
use crate::ports::RttProbe;

/// Everything the prober learned during one batch.
#[derive(Debug, Default)]
pub struct ProbeBatch {
    /// One report per unit that ran to an outcome
    pub reports: Vec<ProbeReport>,
    /// Set when the measurement primitive could not be used at all
    pub misconfigured: Option<String>,
    /// Units that died without reporting
    pub lost_units: usize,
}

enum UnitResult {
    Outcome(ProbeOutcome),
    Misconfigured(String),
}

/// Bounded fan-out over a shared [`RttProbe`].
pub struct ConcurrentProber<P: RttProbe + 'static> {
    probe: Arc<P>,
    max_concurrency: usize,
}

impl<P: RttProbe + 'static> ConcurrentProber<P> {
    pub fn new(probe: Arc<P>, max_concurrency: usize) -> Self {
        Self {
            probe,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Probe every target once under one deadline of `timeout` from now.
    ///
    /// Returns after every unit has completed, timed out or been cancelled.
    pub async fn probe_all(
        &self,
        targets: &[CanonicalTarget],
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ProbeBatch {
        let timeout_ms = timeout.as_millis() as u64;

        if timeout.is_zero() {
            return ProbeBatch {
                reports: targets
                    .iter()
                    .map(|target| ProbeReport {
                        target: target.clone(),
                        outcome: ProbeOutcome::Unreachable {
                            reason: PeerError::Timeout { timeout_ms },
                        },
                    })
                    .collect(),
                ..ProbeBatch::default()
            };
        }

        let deadline = Instant::now() + timeout;
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        // Child token: a misconfigured probe stops siblings without touching
        // the caller's token.
        let batch_cancel = cancel.child_token();

        let mut units = JoinSet::new();
        for target in targets {
            let target = target.clone();
            let probe = Arc::clone(&self.probe);
            let semaphore = Arc::clone(&semaphore);
            let cancel = batch_cancel.clone();

            units.spawn(async move {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => UnitResult::Outcome(ProbeOutcome::Unreachable {
                        reason: PeerError::Cancelled,
                    }),
                    measured = tokio::time::timeout_at(deadline, measure(&*probe, &semaphore, &target)) => {
                        match measured {
                            Ok(Ok(rtt_ms)) => UnitResult::Outcome(ProbeOutcome::Reachable { rtt_ms }),
                            Ok(Err(ProbeFailure::Unreachable(reason))) => {
                                UnitResult::Outcome(ProbeOutcome::Unreachable {
                                    reason: PeerError::Unreachable { reason },
                                })
                            }
                            Ok(Err(ProbeFailure::Misconfigured(reason))) => {
                                cancel.cancel();
                                UnitResult::Misconfigured(reason)
                            }
                            Err(_) => UnitResult::Outcome(ProbeOutcome::Unreachable {
                                reason: PeerError::Timeout { timeout_ms },
                            }),
                        }
                    }
                };
                (target, result)
            });
        }

        let mut batch = ProbeBatch {
            reports: Vec::with_capacity(targets.len()),
            ..ProbeBatch::default()
        };

        while let Some(joined) = units.join_next().await {
            match joined {
                Ok((target, UnitResult::Outcome(outcome))) => {
                    match &outcome {
                        ProbeOutcome::Reachable { rtt_ms } => {
                            debug!(endpoint = %target, rtt_ms, "Probe reachable");
                        }
                        ProbeOutcome::Unreachable { reason } => {
                            debug!(endpoint = %target, error = %reason, "Probe unreachable");
                        }
                    }
                    batch.reports.push(ProbeReport { target, outcome });
                }
                Ok((target, UnitResult::Misconfigured(reason))) => {
                    warn!(endpoint = %target, %reason, "Measurement primitive misconfigured");
                    batch.misconfigured.get_or_insert(reason);
                }
                Err(e) => {
                    warn!(error = %e, "Probe unit failed to report");
                    batch.lost_units += 1;
                }
            }
        }

        batch
    }
}

async fn measure<P: RttProbe + ?Sized>(
    probe: &P,
    semaphore: &Semaphore,
    target: &CanonicalTarget,
) -> Result<u64, ProbeFailure> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|_| ProbeFailure::Unreachable("probe pool closed".into()))?;
    probe.measure(target).await
}
