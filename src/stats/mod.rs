//! Timing aggregation
//!
//! Turns the flat list of per-task timing records collected by the caller
//! into the numeric series a benchmark report is made of. Everything here is
//! a synchronous, in-memory transform over an immutable [`RecordBatch`];
//! batches are recomputed fresh per run and hold no state across runs.
//!
//! - [`record`]: task records and batch validation
//! - [`interval`]: time-binned concurrency and rate series
//! - [`cumulative`]: rolling effective-throughput curve
//! - [`rate_histogram`]: distribution of per-task rates
//!
//! [`BatchSummary`] bundles all of the derived series for one batch into a
//! single serializable value; persistence and rendering of that value belong
//! to the caller.
//!
//! # Example
//!
//! ```
//! use burstbench::stats::{BatchSummary, RecordBatch, TaskRecord};
//!
//! let batch = RecordBatch::new(vec![
//!     TaskRecord::with_work(0.0, 2.0, 200.0),
//!     TaskRecord::with_work(1.0, 3.0, 150.0),
//! ])?;
//!
//! let summary = BatchSummary::compute(&batch, 1.0);
//! assert_eq!(summary.task_count, 2);
//! assert_eq!(summary.concurrency_series, vec![1.0, 2.0, 1.0]);
//! # Ok::<(), burstbench::stats::RecordError>(())
//! ```

pub mod cumulative;
pub mod interval;
pub mod rate_histogram;
pub mod record;

pub use cumulative::{cumulative_rate_curve, RatePoint};
pub use interval::{IntervalAggregator, TimeBins, DEFAULT_BIN_STEP};
pub use rate_histogram::{RateDistributionSummary, RateHistogram};
pub use record::{RecordBatch, RecordError, TaskRecord};

use serde::{Deserialize, Serialize};

/// All derived series for one benchmark batch
///
/// The fields mirror what a report or plot consumes directly: indices of the
/// two binned series are bin numbers (`elapsed = index * bin_step`), and the
/// curve is one point per task in completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of tasks in the batch
    pub task_count: usize,
    /// Wall-clock anchor: earliest task start in the batch
    pub zero_time: f64,
    /// Elapsed seconds from anchor to the last task completion
    pub max_elapsed: f64,
    /// Total measured work across all tasks
    pub total_work: f64,
    /// Width of the time bins in seconds
    pub bin_step: f64,
    /// Active task count per bin
    pub concurrency_series: Vec<f64>,
    /// Aggregate throughput per bin
    pub rate_series: Vec<f64>,
    /// Effective-rate point per task, in completion order
    pub cumulative_rate_curve: Vec<RatePoint>,
    /// Distribution of per-task average rates
    pub rate_distribution: RateDistributionSummary,
}

impl BatchSummary {
    /// Compute every derived series for `batch` with bins of width `step`
    pub fn compute(batch: &RecordBatch, step: f64) -> Self {
        let aggregator = IntervalAggregator::new(batch, step);

        Self {
            task_count: batch.len(),
            zero_time: batch.zero_time(),
            max_elapsed: batch.max_elapsed(),
            total_work: batch.total_work(),
            bin_step: step,
            concurrency_series: aggregator.concurrency_series(),
            rate_series: aggregator.rate_series(),
            cumulative_rate_curve: cumulative_rate_curve(batch),
            rate_distribution: RateHistogram::from_batch(batch).summary(),
        }
    }

    /// Compute with the default 1-second bins
    pub fn with_default_step(batch: &RecordBatch) -> Self {
        Self::compute(batch, DEFAULT_BIN_STEP)
    }

    /// Peak concurrency observed in any bin
    pub fn peak_concurrency(&self) -> f64 {
        self.concurrency_series.iter().fold(0.0, |a, &b| a.max(b))
    }

    /// Peak binned throughput observed in any bin
    pub fn peak_rate(&self) -> f64 {
        self.rate_series.iter().fold(0.0, |a, &b| a.max(b))
    }

    /// Final effective rate: total work over total elapsed time
    pub fn final_effective_rate(&self) -> f64 {
        self.cumulative_rate_curve
            .last()
            .map_or(0.0, |p| p.effective_rate)
    }
}
