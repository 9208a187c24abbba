//! Benchmark driver for the matmul kernels.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use mmult::config::{
    DEFAULT_COLS_A, DEFAULT_COLS_B, DEFAULT_ROWS_A, DEFAULT_RUNS, DEFAULT_SEED,
};
use mmult::stats::DEFAULT_STDEVS;
use mmult::verify::DEFAULT_TOLERANCE;
use mmult::{BenchConfig, BenchReport, BenchmarkRunner, Kernel, OutlierFilter, Workload, sched};

/// Times a matrix multiplication kernel and reports an outlier-free average
#[derive(Parser, Debug)]
#[command(name = "mmult")]
#[command(version)]
struct Cli {
    /// Implementation to benchmark: ref, naive or opt
    #[arg(short = 'i', long = "impl")]
    kernel: Kernel,

    /// Rows of matrix A
    #[arg(long = "arows", default_value_t = DEFAULT_ROWS_A)]
    rows_a: usize,

    /// Columns of matrix A and rows of matrix B
    #[arg(long = "acolsnbrows", default_value_t = DEFAULT_COLS_A)]
    cols_a: usize,

    /// Columns of matrix B
    #[arg(long = "bcols", default_value_t = DEFAULT_COLS_B)]
    cols_b: usize,

    /// Number of timed runs
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    nruns: usize,

    /// Standard deviations beyond which a run counts as an outlier
    #[arg(long, default_value_t = DEFAULT_STDEVS)]
    nstdevs: f64,

    /// Number of CPUs in the affinity mask
    #[arg(short = 'n', long, default_value_t = 1)]
    nthreads: usize,

    /// First CPU of the affinity mask
    #[arg(short = 'c', long, default_value_t = 0)]
    cpu: usize,

    /// Absolute tolerance when comparing against the reference output
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f32,

    /// Seed for the random input matrices
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Untimed invocations before the timed runs
    #[arg(long, default_value_t = 0)]
    warmup: usize,

    /// Directory for the runtimes CSV
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Skip niceness, FIFO scheduling and affinity setup
    #[arg(long)]
    no_sched: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<&Cli> for BenchConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            kernel: cli.kernel,
            rows_a: cli.rows_a,
            cols_a: cli.cols_a,
            cols_b: cli.cols_b,
            runs: cli.nruns,
            warmup: cli.warmup,
            n_stdevs: cli.nstdevs,
            tolerance: cli.tolerance,
            seed: cli.seed,
            cpu: cli.cpu,
            nthreads: cli.nthreads,
            output_dir: cli.output_dir.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = BenchConfig::from(&cli);
    config.validate().context("invalid benchmark configuration")?;

    if cli.no_sched {
        info!("scheduling setup skipped");
    } else {
        sched::configure(config.cpu, config.nthreads);
    }

    info!(
        kernel = %config.kernel,
        rows_a = config.rows_a,
        cols_a = config.cols_a,
        cols_b = config.cols_b,
        macs = config.macs(),
        "allocating workload"
    );
    let mut workload = Workload::new(&config).context("failed to allocate workload")?;
    let runner = BenchmarkRunner::new(config.runs)?.with_warmup(config.warmup);
    let filter = OutlierFilter::new(config.n_stdevs)?;

    let report = mmult::run_workload(
        config.kernel,
        &mut workload,
        &runner,
        &filter,
        config.tolerance,
    )
    .context("benchmark failed")?;

    print_summary(&report);

    // A failed dump does not invalidate the measurements
    if let Err(err) = report.dump(&config.output_dir) {
        warn!(error = %err, "failed to write runtimes file");
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_summary(report: &BenchReport) {
    let v = &report.verification;
    println!();
    println!("{}", report.heading());
    println!("  * Verification: {}", v.status());
    if let Some(m) = v.first_mismatch {
        println!(
            "      first mismatch at ({}, {}): expected {}, got {} ({} cells off, max |diff| {})",
            m.row, m.col, m.expected, m.actual, v.mismatches, v.max_abs_diff
        );
    }
    println!(
        "  * Runtimes ({}): {} ns",
        if v.matches { "PASS" } else { "FAIL" },
        report.mean.average_nanos()
    );
    println!(
        "      {} of {} runs kept after {} statistics passes (min {} ns, max {} ns, stdev {:.1} ns)",
        report.mean.active,
        report.runs.len(),
        report.mean.iterations,
        report.mean.min_ns,
        report.mean.max_ns,
        report.mean.std_dev_ns
    );
    println!("  * Throughput: {:.2} GFLOPS", report.gflops());
    println!();
}
