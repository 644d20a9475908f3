//! Interval histogram engine
//!
//! Discretizes overlapping task intervals onto a fixed grid of time bins and
//! column-sums the result. The same occupancy pass, weighted or unweighted,
//! yields the two headline curves of a benchmark run:
//!
//! - **Concurrency**: how many tasks were active during each bin
//! - **Rate**: aggregate throughput during each bin, with each task's work
//!   spread evenly across the bins it occupies
//!
//! Spreading work evenly assumes a constant rate over the task's wall-clock
//! window. That is an approximation, and a deliberate one: per-task progress
//! is not sampled, so the window is all the information there is.

use super::record::RecordBatch;

/// Default bin width in seconds
pub const DEFAULT_BIN_STEP: f64 = 1.0;

/// Evenly spaced time bins covering `[0, max_elapsed)`
///
/// Bin `i` covers `[i * step, (i + 1) * step)`. Only the left edges are
/// stored; lookups binary-search them with a leftmost insertion point, so an
/// interval endpoint sitting exactly on an edge is attributed to the bin
/// *beginning* at that edge, never the one ending there.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBins {
    step: f64,
    edges: Vec<f64>,
}

impl TimeBins {
    /// Build bins of width `step` covering `[0, max_elapsed)`
    ///
    /// # Panics
    ///
    /// Panics if `step` is not strictly positive.
    pub fn with_step(max_elapsed: f64, step: f64) -> Self {
        assert!(step > 0.0, "bin step must be positive");

        let num_bins = if max_elapsed > 0.0 {
            (max_elapsed / step).ceil() as usize
        } else {
            0
        };
        let edges = (0..num_bins).map(|i| i as f64 * step).collect();

        Self { step, edges }
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Bin width in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Left edges of the bins
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Leftmost insertion point of `value` in the edge array
    #[inline]
    fn search(&self, value: f64) -> usize {
        self.edges.partition_point(|&e| e < value)
    }

    /// Half-open bin index range `[a, b)` overlapped by `[start, end)`
    ///
    /// An interval that crosses no bin edge yields an empty range and
    /// contributes nothing to any series.
    pub fn bin_range(&self, start: f64, end: f64) -> (usize, usize) {
        (self.search(start), self.search(end))
    }
}

/// Computes binned occupancy series over one validated batch
///
/// Holds the batch together with the bin grid derived from its
/// `max_elapsed`, and produces the column-summed series. All computation is
/// synchronous and allocation is one `Vec<f64>` per produced series.
#[derive(Debug)]
pub struct IntervalAggregator<'a> {
    batch: &'a RecordBatch,
    bins: TimeBins,
}

impl<'a> IntervalAggregator<'a> {
    /// Create an aggregator with bins of width `step` spanning the batch
    pub fn new(batch: &'a RecordBatch, step: f64) -> Self {
        let bins = TimeBins::with_step(batch.max_elapsed(), step);
        Self { batch, bins }
    }

    /// Create an aggregator with the default 1-second bins
    pub fn with_default_step(batch: &'a RecordBatch) -> Self {
        Self::new(batch, DEFAULT_BIN_STEP)
    }

    /// The bin grid this aggregator fills
    pub fn bins(&self) -> &TimeBins {
        &self.bins
    }

    /// Occupancy column sums with per-task weight chosen by `weight_of`,
    /// where `weight_of` receives the task's total contribution and the
    /// number of bins it occupies
    fn fill(&self, weight_of: impl Fn(&crate::stats::TaskRecord, usize) -> f64) -> Vec<f64> {
        let mut series = vec![0.0; self.bins.len()];

        for record in self.batch.records() {
            let (start, end) = self.batch.relative(record);
            let (a, b) = self.bins.bin_range(start, end);
            if b == a {
                continue;
            }
            let w = weight_of(record, b - a);
            for slot in &mut series[a..b] {
                *slot += w;
            }
        }

        series
    }

    /// Number of concurrently active tasks per bin
    pub fn concurrency_series(&self) -> Vec<f64> {
        self.fill(|_, _| 1.0)
    }

    /// Aggregate throughput per bin, each task's work spread evenly across
    /// the bins it occupies
    ///
    /// Records without a work measurement contribute zero. Summing the
    /// series over one task's occupied bins recovers that task's work.
    pub fn rate_series(&self) -> Vec<f64> {
        self.fill(|record, occupied| record.work.unwrap_or(0.0) / occupied as f64)
    }
}
