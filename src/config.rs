//! Benchmark configuration.

use std::path::PathBuf;

use crate::error::{BenchError, Result};
use crate::kernels::Kernel;
use crate::stats::DEFAULT_STDEVS;
use crate::verify::DEFAULT_TOLERANCE;

pub const DEFAULT_ROWS_A: usize = 2500;
pub const DEFAULT_COLS_A: usize = 3000;
pub const DEFAULT_COLS_B: usize = 2100;
pub const DEFAULT_RUNS: usize = 100;
pub const DEFAULT_SEED: u64 = 0xdead_beef;

/// Everything one benchmark run needs, validated up front.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub kernel: Kernel,
    pub rows_a: usize,
    /// Columns of A, which are also the rows of B.
    pub cols_a: usize,
    pub cols_b: usize,
    pub runs: usize,
    pub warmup: usize,
    pub n_stdevs: f64,
    pub tolerance: f32,
    pub seed: u64,
    /// First CPU of the affinity mask.
    pub cpu: usize,
    /// Number of CPUs in the affinity mask.
    pub nthreads: usize,
    pub output_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            kernel: Kernel::CacheBlocked,
            rows_a: DEFAULT_ROWS_A,
            cols_a: DEFAULT_COLS_A,
            cols_b: DEFAULT_COLS_B,
            runs: DEFAULT_RUNS,
            warmup: 0,
            n_stdevs: DEFAULT_STDEVS,
            tolerance: DEFAULT_TOLERANCE,
            seed: DEFAULT_SEED,
            cpu: 0,
            nthreads: 1,
            output_dir: PathBuf::from("."),
        }
    }
}

impl BenchConfig {
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            ..Self::default()
        }
    }

    pub fn with_dims(mut self, rows_a: usize, cols_a: usize, cols_b: usize) -> Self {
        self.rows_a = rows_a;
        self.cols_a = cols_a;
        self.cols_b = cols_b;
        self
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Rejects anything that would make allocation or the benchmark ill-formed.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("arows", self.rows_a),
            ("acolsnbrows", self.cols_a),
            ("bcols", self.cols_b),
            ("nthreads", self.nthreads),
        ] {
            if value == 0 {
                return Err(BenchError::InvalidDimension { name, value });
            }
        }
        for (name, rows, cols) in [
            ("A", self.rows_a, self.cols_a),
            ("B", self.cols_a, self.cols_b),
            ("C", self.rows_a, self.cols_b),
        ] {
            if rows.checked_mul(cols).is_none() {
                return Err(BenchError::DimensionOverflow { name, rows, cols });
            }
        }
        if self.runs == 0 {
            return Err(BenchError::InvalidRuns(self.runs));
        }
        if !self.n_stdevs.is_finite() || self.n_stdevs <= 0.0 {
            return Err(BenchError::InvalidThreshold(self.n_stdevs));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(BenchError::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Multiply-add pairs per invocation, i.e. half the FLOP count.
    pub fn macs(&self) -> u64 {
        self.rows_a as u64 * self.cols_a as u64 * self.cols_b as u64
    }
}
