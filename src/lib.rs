//! Burstbench - core engine for burst-concurrency micro-benchmarks
//!
//! Burstbench measures what a large fan-out of concurrent workers actually
//! achieved: it synthesizes incompressible upload payloads of arbitrary size
//! and turns per-worker timing records into concurrency curves, throughput
//! curves, and rate distributions.
//!
//! # Architecture
//!
//! - **Payload synthesis**: deterministic, seekable pseudo-random byte streams
//!   with O(1 MiB) memory cost regardless of payload size
//! - **Interval aggregation**: time-binned concurrency and rate series from
//!   `(start, end, work)` task records
//! - **Effective throughput**: rolling cumulative-rate curve and per-task
//!   rate histograms
//! - **Compute workload**: dense-matmul FLOPS kernel for compute benchmarks
//!
//! Orchestration is deliberately absent: invoking workers, talking to object
//! storage, persisting results, and plotting all belong to the caller. The
//! crate consumes completed-task records and produces byte content and plain
//! numeric series.

pub mod compute;
pub mod payload;
pub mod stats;
pub mod util;

// Re-export commonly used types
pub use payload::{ByteSource, RandomStream, SeekWhence};
pub use stats::{BatchSummary, RecordBatch, TaskRecord};

/// Result type used throughout burstbench
pub type Result<T> = anyhow::Result<T>;
