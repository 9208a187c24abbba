//! Kernel selection and dispatch.
//!
//! The set of kernels is closed: every variant the benchmark can run is a
//! member of [`Kernel`], and dispatch is a single `match`.
//!
//! Available kernels:
//! - `Reference`: i-j-k scalar loop, the correctness oracle
//! - `Naive`: i-k-j scalar loop
//! - `CacheBlocked`: 16×16×16 tiled scalar loop

pub mod args;

use std::fmt;
use std::str::FromStr;

use crate::blocked::tiled::matmul_blocked;
use crate::error::BenchError;
use crate::matrix::naive_ikj::matmul_naive_ikj;
use crate::matrix::reference::matmul_reference;

pub use args::KernelArgs;

/// Signature shared by every kernel: `(a, b, c, m, n, k)`.
pub type KernelFn = fn(&[f32], &[f32], &mut [f32], usize, usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    Reference,
    Naive,
    CacheBlocked,
}

impl Kernel {
    pub const ALL: [Kernel; 3] = [Kernel::Reference, Kernel::Naive, Kernel::CacheBlocked];

    /// Short name accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Reference => "ref",
            Kernel::Naive => "naive",
            Kernel::CacheBlocked => "opt",
        }
    }

    /// Label used in reports and result file names.
    pub fn label(self) -> &'static str {
        match self {
            Kernel::Reference => "mmult_ref",
            Kernel::Naive => "mmult_naive",
            Kernel::CacheBlocked => "mmult_opt",
        }
    }

    pub fn function(self) -> KernelFn {
        match self {
            Kernel::Reference => matmul_reference,
            Kernel::Naive => matmul_naive_ikj,
            Kernel::CacheBlocked => matmul_blocked,
        }
    }

    /// Computes `C = A * B` into `args`' output, overwriting it.
    #[inline]
    pub fn run(self, args: &mut KernelArgs<'_>) {
        let (a, b, c, m, n, k) = args.parts();
        (self.function())(a, b, c, m, n, k);
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kernel {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ref" | "reference" => Ok(Kernel::Reference),
            "naive" => Ok(Kernel::Naive),
            "opt" | "blocked" => Ok(Kernel::CacheBlocked),
            other => Err(BenchError::UnknownKernel(other.to_string())),
        }
    }
}
