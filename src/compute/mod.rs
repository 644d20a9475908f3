//! Compute throughput workload
//!
//! A CPU-bound kernel for measuring achievable floating-point throughput
//! inside one worker: `loops` dense `n x n` f64 matrix multiplications, rows
//! computed in parallel with rayon. The known FLOP count of the kernel
//! (`2 * n^3` per multiplication) divided by measured wall time gives the
//! worker's achieved FLOPS, and the resulting [`FlopsMeasurement`] converts
//! straight into a [`TaskRecord`](crate::stats::TaskRecord) so a fleet of
//! worker measurements feeds the aggregation engine unchanged.

use crate::stats::TaskRecord;
use crate::util::time::{format_duration, format_rate, per_second};
use rayon::prelude::*;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Dense matrix-multiplication workload parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatmulWorkload {
    /// Matrix dimension; operands are `n x n`
    pub n: usize,
    /// Number of multiplications to perform
    pub loops: usize,
}

impl MatmulWorkload {
    /// Create a workload of `loops` multiplications of `n x n` matrices
    pub fn new(n: usize, loops: usize) -> Self {
        Self { n, loops }
    }

    /// Floating-point operations this workload performs
    ///
    /// One `n x n` multiplication is `n^3` multiply-adds, counted as
    /// `2 * n^3` FLOP.
    pub fn estimated_flop(&self) -> u64 {
        2 * (self.n as u64).pow(3) * self.loops as u64
    }

    /// Run the workload to completion and measure it
    ///
    /// Operands are deterministic (`A[i][j] = B[i][j] = i*n + j`), so the
    /// result checksum is reproducible and doubles as a guard against the
    /// optimizer eliding the work.
    pub fn run(&self) -> FlopsMeasurement {
        let n = self.n;
        let a: Vec<f64> = (0..n * n).map(|i| i as f64).collect();
        let b = a.clone();

        let wall_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        let timer = Instant::now();

        let mut checksum = 0.0;
        for _ in 0..self.loops {
            let mut c = vec![0.0f64; n * n];
            c.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
                for k in 0..n {
                    let aik = a[i * n + k];
                    let b_row = &b[k * n..(k + 1) * n];
                    for (slot, &bkj) in row.iter_mut().zip(b_row) {
                        *slot += aik * bkj;
                    }
                }
            });
            checksum += c.iter().sum::<f64>();
        }

        FlopsMeasurement {
            started: wall_start,
            elapsed: timer.elapsed(),
            flop: self.estimated_flop(),
            checksum,
        }
    }
}

/// Result of running a [`MatmulWorkload`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlopsMeasurement {
    /// Wall-clock start time, seconds since the Unix epoch
    pub started: f64,
    /// Measured duration of the kernel
    pub elapsed: Duration,
    /// Floating-point operations performed
    pub flop: u64,
    /// Sum of all result elements across iterations
    pub checksum: f64,
}

impl FlopsMeasurement {
    /// Achieved floating-point operations per second
    pub fn achieved_flops(&self) -> f64 {
        per_second(self.flop as f64, self.elapsed)
    }

    /// Wall-clock end time, seconds since the Unix epoch
    pub fn finished(&self) -> f64 {
        self.started + self.elapsed.as_secs_f64()
    }

    /// Convert into a task record with the FLOP count as the work measure
    pub fn to_task_record(&self) -> TaskRecord {
        TaskRecord::with_work(self.started, self.finished(), self.flop as f64)
    }
}

impl std::fmt::Display for FlopsMeasurement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} FLOP in {} ({}FLOPS)",
            self.flop,
            format_duration(self.elapsed),
            format_rate(self.achieved_flops())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::RecordBatch;

    #[test]
    fn test_estimated_flop() {
        assert_eq!(MatmulWorkload::new(4, 1).estimated_flop(), 128);
        assert_eq!(MatmulWorkload::new(64, 3).estimated_flop(), 2 * 64 * 64 * 64 * 3);
    }

    #[test]
    fn test_checksum_reproducible() {
        let w = MatmulWorkload::new(32, 2);
        let m1 = w.run();
        let m2 = w.run();
        assert_eq!(m1.checksum, m2.checksum);
        assert_eq!(m1.flop, w.estimated_flop());
    }

    #[test]
    fn test_small_matmul_checksum() {
        // n = 2, A = B = [[0,1],[2,3]]: product is [[2,3],[6,11]], sum 22
        let m = MatmulWorkload::new(2, 1).run();
        assert_eq!(m.checksum, 22.0);

        // Two loops double the checksum
        let m = MatmulWorkload::new(2, 2).run();
        assert_eq!(m.checksum, 44.0);
    }

    #[test]
    fn test_measurement_to_task_record() {
        let m = MatmulWorkload::new(16, 1).run();
        let record = m.to_task_record();

        assert_eq!(record.start, m.started);
        assert!(record.end >= record.start);
        assert_eq!(record.work, Some(m.flop as f64));

        // Feeds straight into batch aggregation
        let batch = RecordBatch::new(vec![record]).unwrap();
        assert_eq!(batch.total_work(), m.flop as f64);
    }

    #[test]
    fn test_achieved_flops_positive() {
        let m = MatmulWorkload::new(64, 1).run();
        assert!(m.achieved_flops() > 0.0);
        assert!(m.elapsed > Duration::ZERO);
    }

    #[test]
    fn test_display_mentions_flops() {
        let m = MatmulWorkload::new(8, 1).run();
        let s = m.to_string();
        assert!(s.contains("FLOPS"));
    }
}
