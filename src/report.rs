//! Benchmark results and their CSV dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::kernels::Kernel;
use crate::runner::RunSet;
use crate::stats::RobustMean;
use crate::verify::Verification;

/// Everything one benchmark produced.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub kernel: Kernel,
    pub runs: RunSet,
    pub verification: Verification,
    pub mean: RobustMean,
    /// Multiply-adds per invocation.
    pub macs: u64,
}

impl BenchReport {
    /// Throughput at the robust mean, counting a multiply-add as two FLOPs.
    pub fn gflops(&self) -> f64 {
        if self.mean.average_ns <= 0.0 {
            return 0.0;
        }
        2.0 * self.macs as f64 / self.mean.average_ns
    }

    /// Summary heading naming the kernel by label and by its `--impl` name.
    pub fn heading(&self) -> String {
        format!(
            "Running \"{}\" implementation (--impl {}):",
            self.kernel.label(),
            self.kernel.name()
        )
    }

    /// `<label>_runtimes.csv`
    pub fn file_name(&self) -> String {
        format!("{}_runtimes.csv", self.kernel.label())
    }

    /// Writes the flat record:
    ///
    /// ```text
    /// impl,<label>
    /// num_of_runs,<N>
    /// runtimes, r0, r1, ...
    /// avg,<ns>
    /// ```
    pub fn write_csv<W: Write>(&self, mut out: W) -> Result<()> {
        writeln!(out, "impl,{}", self.kernel.label())?;
        writeln!(out, "num_of_runs,{}", self.runs.len())?;
        write!(out, "runtimes")?;
        for ns in self.runs.nanos() {
            write!(out, ", {ns}")?;
        }
        writeln!(out)?;
        write!(out, "avg,{}", self.mean.average_nanos())?;
        out.flush()?;
        Ok(())
    }

    /// Creates `dir/<label>_runtimes.csv` and writes the record into it.
    pub fn dump(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(self.file_name());
        info!(path = %path.display(), "dumping runtime information");
        let file = File::create(&path)?;
        self.write_csv(BufWriter::new(file))?;
        Ok(path)
    }
}
