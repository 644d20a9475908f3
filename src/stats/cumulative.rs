//! Effective throughput curve
//!
//! The binned rate series answers "how fast was the system going at second
//! t"; this module answers the question a capacity planner actually asks:
//! "if I had stopped the benchmark at second t, what throughput would I have
//! banked". Each completed task adds its work to a running total, and the
//! total divided by elapsed time since the batch anchor is the sustained
//! rate so far. The curve typically climbs while the fan-out ramps up and
//! sags toward the end as stragglers finish alone.

use super::record::RecordBatch;
use serde::{Deserialize, Serialize};

/// One point of the effective-rate curve, emitted at a task completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Completion time relative to the batch anchor, in seconds
    pub elapsed: f64,
    /// Total work completed by this time
    pub cumulative_work: f64,
    /// `cumulative_work / elapsed`; 0.0 when `elapsed` is zero
    pub effective_rate: f64,
}

/// Compute the effective-rate curve for a batch
///
/// Tasks are visited in order of completion; records without a work
/// measurement advance the clock but add nothing to the cumulative total.
/// The cumulative work values are non-decreasing in time order provided no
/// task reports negative work. An empty batch yields an empty curve.
pub fn cumulative_rate_curve(batch: &RecordBatch) -> Vec<RatePoint> {
    let mut by_end: Vec<_> = batch.records().to_vec();
    by_end.sort_by(|a, b| a.end.total_cmp(&b.end));

    let mut cumulative = 0.0;
    by_end
        .iter()
        .map(|r| {
            cumulative += r.work.unwrap_or(0.0);
            let elapsed = r.end - batch.zero_time();
            let effective_rate = if elapsed > 0.0 {
                cumulative / elapsed
            } else {
                0.0
            };
            RatePoint {
                elapsed,
                cumulative_work: cumulative,
                effective_rate,
            }
        })
        .collect()
}
