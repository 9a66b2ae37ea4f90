//! # Correlation Table
//!
//! Maps canonical targets back to the descriptors that produced them.
//!
//! Normalization is lossy: several descriptors may collapse to the same
//! `host:port`. The table is a multi-map so every one of them keeps its own
//! slot, while the shared target is dispatched (and probed) exactly once.
//!
//! ## Invariants
//!
//! - One slot per input descriptor, in input order.
//! - Failed normalizations are resolved at build time and never dispatched.
//! - The dispatch list holds each canonical target once, first-seen order.

use std::collections::HashMap;

use crate::domain::{CanonicalTarget, PeerDescriptor, ProbeOutcome, ResultSlot};
use crate::error::PeerError;

/// Per-call table of result slots, keyed by canonical target.
#[derive(Debug, Default)]
pub struct CorrelationTable {
    slots: Vec<ResultSlot>,
    by_target: HashMap<CanonicalTarget, Vec<usize>>,
    dispatch: Vec<CanonicalTarget>,
}

impl CorrelationTable {
    /// Build the table from already-normalized descriptors.
    pub fn build<I>(normalized: I) -> Self
    where
        I: IntoIterator<Item = (PeerDescriptor, Result<CanonicalTarget, PeerError>)>,
    {
        let mut table = Self::default();
        for (descriptor, normalized) in normalized {
            match normalized {
                Ok(target) => table.insert_dispatched(descriptor, target),
                Err(reason) => table.insert_failed(descriptor, reason),
            }
        }
        table
    }

    /// Build the table by running a synchronous normalizer over each descriptor.
    pub fn build_with<F>(descriptors: &[PeerDescriptor], mut normalize: F) -> Self
    where
        F: FnMut(&PeerDescriptor) -> Result<CanonicalTarget, PeerError>,
    {
        Self::build(
            descriptors
                .iter()
                .map(|descriptor| (descriptor.clone(), normalize(descriptor))),
        )
    }

    fn insert_dispatched(&mut self, descriptor: PeerDescriptor, target: CanonicalTarget) {
        let index = self.slots.len();
        self.slots.push(ResultSlot::pending(descriptor));

        let positions = self.by_target.entry(target.clone()).or_default();
        if positions.is_empty() {
            self.dispatch.push(target);
        }
        positions.push(index);
    }

    fn insert_failed(&mut self, descriptor: PeerDescriptor, reason: PeerError) {
        self.slots.push(ResultSlot::failed(descriptor, reason));
    }

    /// Targets to probe, each exactly once.
    pub fn dispatch_list(&self) -> &[CanonicalTarget] {
        &self.dispatch
    }

    /// Number of input descriptors (resolved or not).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Descriptors that failed normalization.
    pub fn failed_count(&self) -> usize {
        self.slots.len() - self.by_target.values().map(Vec::len).sum::<usize>()
    }

    /// Write one outcome into every slot sharing `target`.
    ///
    /// Returns the number of slots written. Unknown targets and slots that
    /// already hold an outcome are left untouched.
    pub fn record(&mut self, target: &CanonicalTarget, outcome: ProbeOutcome) -> usize {
        let Some(positions) = self.by_target.get(target) else {
            return 0;
        };

        let mut written = 0;
        for &index in positions {
            let slot = &mut self.slots[index];
            if slot.outcome.is_none() {
                slot.outcome = Some(outcome.clone());
                written += 1;
            }
        }
        written
    }

    pub fn slots(&self) -> &[ResultSlot] {
        &self.slots
    }

    pub fn into_slots(self) -> Vec<ResultSlot> {
        self.slots
    }
}
