//! Per-task rate distribution
//!
//! The binned series describe the run over time; this histogram describes
//! the *population* of tasks. In a healthy fan-out the per-task rates
//! cluster tightly; a long left tail means stragglers (cold starts, noisy
//! neighbors, throttled workers) and shows up here long before it is visible
//! in an aggregate curve.
//!
//! Backed by HdrHistogram with 3 significant digits, so rates from 1 unit/s
//! up are recorded with 0.1% relative error in constant time. Rates below
//! one unit per second are clamped to 1; pick a unit (bytes/s, FLOPS) fine
//! enough that real rates sit well above that floor.

use super::record::RecordBatch;
use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

/// Histogram over the average rates of individual tasks
///
/// Tasks without a work measurement or with zero duration have no defined
/// rate and are skipped; `skipped()` reports how many.
#[derive(Debug, Clone)]
pub struct RateHistogram {
    histogram: Histogram<u64>,
    skipped: u64,
}

impl RateHistogram {
    /// Create an empty, auto-resizing histogram
    pub fn new() -> Self {
        let histogram =
            Histogram::new(3).expect("3 significant digits is a valid histogram precision");
        Self {
            histogram,
            skipped: 0,
        }
    }

    /// Build the distribution for one batch
    pub fn from_batch(batch: &RecordBatch) -> Self {
        let mut h = Self::new();
        for record in batch.records() {
            h.record(record.rate());
        }
        h
    }

    /// Record one task's rate; `None` counts as skipped
    pub fn record(&mut self, rate: Option<f64>) {
        match rate {
            Some(r) => {
                // HdrHistogram stores integers; clamp sub-unit rates to the
                // smallest recordable value
                let value = (r.round() as u64).max(1);
                self.histogram.saturating_record(value);
            }
            None => self.skipped += 1,
        }
    }

    /// Number of rates recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    /// Whether no rates were recorded
    pub fn is_empty(&self) -> bool {
        self.histogram.is_empty()
    }

    /// Number of tasks with no defined rate
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Lowest recorded rate (0 when empty)
    pub fn min(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.histogram.min()
        }
    }

    /// Highest recorded rate (0 when empty)
    pub fn max(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.histogram.max()
        }
    }

    /// Mean recorded rate (0.0 when empty)
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.histogram.mean()
        }
    }

    /// Rate at the given percentile, 0.0 to 100.0 (0 when empty)
    pub fn percentile(&self, percentile: f64) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.histogram.value_at_quantile(percentile / 100.0)
        }
    }

    /// Fixed-field summary suitable for serialization
    pub fn summary(&self) -> RateDistributionSummary {
        RateDistributionSummary {
            count: self.len(),
            skipped: self.skipped,
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
            p50: self.percentile(50.0),
            p90: self.percentile(90.0),
            p99: self.percentile(99.0),
        }
    }
}

impl Default for RateHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of a [`RateHistogram`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDistributionSummary {
    pub count: u64,
    pub skipped: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TaskRecord;

    #[test]
    fn test_from_batch_counts_and_skips() {
        let batch = RecordBatch::new(vec![
            TaskRecord::with_work(0.0, 2.0, 200.0), // rate 100
            TaskRecord::with_work(0.0, 1.0, 50.0),  // rate 50
            TaskRecord::new(0.0, 1.0),              // no work
            TaskRecord::with_work(1.0, 1.0, 5.0),   // zero duration
        ])
        .unwrap();

        let h = RateHistogram::from_batch(&batch);
        assert_eq!(h.len(), 2);
        assert_eq!(h.skipped(), 2);
        assert_eq!(h.min(), 50);
        assert_eq!(h.max(), 100);
    }

    #[test]
    fn test_percentiles() {
        let mut h = RateHistogram::new();
        for r in 1..=100 {
            h.record(Some(r as f64));
        }

        assert_eq!(h.len(), 100);
        // 0.1% precision keeps these exact at this scale
        assert_eq!(h.percentile(50.0), 50);
        assert_eq!(h.percentile(99.0), 99);
        assert_eq!(h.percentile(100.0), 100);
    }

    #[test]
    fn test_sub_unit_rates_clamp_to_one() {
        let mut h = RateHistogram::new();
        h.record(Some(0.2));
        assert_eq!(h.min(), 1);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let s = RateHistogram::new().summary();
        assert_eq!(s.count, 0);
        assert_eq!(s.min, 0);
        assert_eq!(s.max, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.p99, 0);
    }

    #[test]
    fn test_summary_serde_round_trip() {
        let mut h = RateHistogram::new();
        h.record(Some(10.0));
        h.record(Some(20.0));
        let s = h.summary();

        let json = serde_json::to_string(&s).unwrap();
        let back: RateDistributionSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
