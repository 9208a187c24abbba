//! Matrix multiplication kernel benchmark.
//!
//! Times one kernel variant over fixed-size random matrices, checks its
//! output against a reference kernel, and reduces the timings to an
//! outlier-filtered mean.
//!
//! ## Usage
//!
//! ```
//! use mmult::{BenchConfig, Kernel, run_benchmark};
//!
//! let config = BenchConfig::new(Kernel::CacheBlocked)
//!     .with_dims(33, 17, 20)
//!     .with_runs(5);
//!
//! let report = run_benchmark(&config).unwrap();
//! assert!(report.verification.passed());
//! assert_eq!(report.runs.len(), 5);
//! ```
//!
//! The kernels can also be called directly:
//!
//! ```
//! use mmult::matmul_blocked;
//!
//! let a = vec![1.0f32, 2.0, 3.0, 4.0];
//! let b = vec![5.0f32, 6.0, 7.0, 8.0];
//! let mut c = vec![0.0f32; 4];
//!
//! matmul_blocked(&a, &b, &mut c, 2, 2, 2);
//! assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! ## What's inside
//!
//! - Reference (i-j-k), naive (i-k-j) and 16×16 cache-blocked scalar kernels
//! - Guarded output buffers that expose out-of-bounds writes
//! - Iterative k·σ outlier rejection over per-run timings

pub mod blocked;
pub mod config;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod report;
pub mod runner;
pub mod sched;
pub mod stats;
pub mod verify;
pub mod workload;

use tracing::info;

pub use blocked::tiled::matmul_blocked;
pub use config::BenchConfig;
pub use error::{BenchError, Result};
pub use kernels::{Kernel, KernelArgs};
pub use matrix::naive_ikj::matmul_naive_ikj;
pub use matrix::reference::matmul_reference;
pub use report::BenchReport;
pub use runner::{BenchmarkRunner, RunSet, RuntimeSample};
pub use stats::{OutlierFilter, RobustMean};
pub use verify::{Verification, verify};
pub use workload::Workload;

/// Runs the whole pipeline for `config`: allocate, compute the reference,
/// time the selected kernel, verify the last output and reduce the timings.
///
/// Scheduling setup and the CSV dump are left to the caller.
pub fn run_benchmark(config: &BenchConfig) -> Result<BenchReport> {
    config.validate()?;
    let mut workload = Workload::new(config)?;
    let runner = BenchmarkRunner::new(config.runs)?.with_warmup(config.warmup);
    let filter = OutlierFilter::new(config.n_stdevs)?;
    run_workload(config.kernel, &mut workload, &runner, &filter, config.tolerance)
}

/// Benchmarks `kernel` on an already allocated workload.
pub fn run_workload(
    kernel: Kernel,
    workload: &mut Workload,
    runner: &BenchmarkRunner,
    filter: &OutlierFilter,
    tolerance: f32,
) -> Result<BenchReport> {
    workload.compute_reference()?;

    info!(kernel = %kernel, runs = runner.runs(), "invoking the implementation");
    let mut runs = {
        let mut args = workload.candidate_args()?;
        runner.run(kernel, &mut args)
    };

    let verification = verify(&workload.reference, &workload.output, tolerance);
    info!(status = verification.status(), "verified results");

    let mean = filter.reduce(&mut runs)?;
    info!(
        average_ns = mean.average_nanos(),
        masked = mean.masked,
        iterations = mean.iterations,
        "running statistics finished"
    );

    let macs = workload.a.rows() as u64 * workload.a.cols() as u64 * workload.b.cols() as u64;
    Ok(BenchReport {
        kernel,
        runs,
        verification,
        mean,
        macs,
    })
}
