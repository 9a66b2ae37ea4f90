//! Result reassembly: probe reports back into per-descriptor results.

use crate::domain::{CorrelationTable, PingResult, ProbeReport};

/// Write every report into the table and flatten it.
///
/// The output always has one entry per input descriptor, whatever happened
/// during normalization or probing.
pub fn reassemble<I>(mut table: CorrelationTable, reports: I) -> Vec<PingResult>
where
    I: IntoIterator<Item = ProbeReport>,
{
    for report in reports {
        table.record(&report.target, report.outcome);
    }

    table
        .into_slots()
        .into_iter()
        .map(|slot| slot.into_result())
        .collect()
}
