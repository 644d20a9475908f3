//! Task timing records
//!
//! One [`TaskRecord`] is produced per completed unit of work by whatever
//! executes the workers (a serverless pool, a thread pool, a fleet of VMs).
//! Timestamps are wall-clock seconds; they may come from different machines,
//! so monotonicity across records is not assumed anywhere downstream. The
//! only hard requirement is that each record is internally consistent, which
//! [`RecordBatch::new`] enforces up front so the aggregation passes never
//! have to.

use serde::{Deserialize, Serialize};

/// Validation errors for task record batches
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// A record ends before it starts; binning it would produce a negative
    /// bin range
    #[error("malformed record at index {index}: end {end} precedes start {start}")]
    MalformedRecord { index: usize, start: f64, end: f64 },

    /// A record carries a NaN or infinite timestamp or work value
    #[error("malformed record at index {index}: non-finite timestamp or work value")]
    NonFiniteRecord { index: usize },
}

/// Timing record for one completed task
///
/// `work` is the amount of work the task performed in whatever unit the
/// benchmark measures (bytes transferred, floating-point operations). Tasks
/// that only contribute to concurrency accounting leave it `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Wall-clock start time in seconds
    pub start: f64,
    /// Wall-clock end time in seconds, `end >= start`
    pub end: f64,
    /// Work completed by this task, if measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<f64>,
}

impl TaskRecord {
    /// Create a record with no work measurement
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            work: None,
        }
    }

    /// Create a record carrying a work measurement
    pub fn with_work(start: f64, end: f64, work: f64) -> Self {
        Self {
            start,
            end,
            work: Some(work),
        }
    }

    /// Wall-clock duration of the task in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Average rate over the task's active window (`work / duration`)
    ///
    /// `None` when no work was measured or the task had zero duration.
    pub fn rate(&self) -> Option<f64> {
        let d = self.duration();
        match self.work {
            Some(w) if d > 0.0 => Some(w / d),
            _ => None,
        }
    }
}

/// An immutable, validated batch of task records
///
/// Construction validates every record and fixes the batch's time anchor:
/// `zero_time` is the earliest start in the batch, and every derived series
/// measures elapsed time from it. A batch is a snapshot of one benchmark
/// run; nothing in it mutates after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBatch {
    records: Vec<TaskRecord>,
    zero_time: f64,
    max_elapsed: f64,
}

impl RecordBatch {
    /// Validate `records` and compute the batch time anchor
    ///
    /// An empty batch is valid and yields empty derived series everywhere
    /// downstream. Returns [`RecordError`] for the first record with
    /// `end < start` or a non-finite field.
    pub fn new(records: Vec<TaskRecord>) -> Result<Self, RecordError> {
        for (index, r) in records.iter().enumerate() {
            let finite =
                r.start.is_finite() && r.end.is_finite() && r.work.map_or(true, f64::is_finite);
            if !finite {
                return Err(RecordError::NonFiniteRecord { index });
            }
            if r.end < r.start {
                return Err(RecordError::MalformedRecord {
                    index,
                    start: r.start,
                    end: r.end,
                });
            }
        }

        let zero_time = records.iter().map(|r| r.start).fold(f64::INFINITY, f64::min);
        let zero_time = if zero_time.is_finite() { zero_time } else { 0.0 };
        let max_elapsed = records
            .iter()
            .map(|r| r.end - zero_time)
            .fold(0.0, f64::max);

        Ok(Self {
            records,
            zero_time,
            max_elapsed,
        })
    }

    /// The validated records in their original order
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch contains no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest start time in the batch (0.0 for an empty batch)
    pub fn zero_time(&self) -> f64 {
        self.zero_time
    }

    /// Largest `end - zero_time` in the batch (0.0 for an empty batch)
    pub fn max_elapsed(&self) -> f64 {
        self.max_elapsed
    }

    /// A record's `(start, end)` relative to the batch anchor
    pub fn relative(&self, record: &TaskRecord) -> (f64, f64) {
        (record.start - self.zero_time, record.end - self.zero_time)
    }

    /// Sum of all measured work in the batch
    pub fn total_work(&self) -> f64 {
        self.records.iter().filter_map(|r| r.work).sum()
    }
}
