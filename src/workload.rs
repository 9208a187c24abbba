//! Input matrices and output buffers for one benchmark.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::kernels::{Kernel, KernelArgs};
use crate::matrix::buffer::{MatrixBuffer, OutputBuffer};

/// Seeded random A and B plus guarded reference and candidate outputs.
#[derive(Debug)]
pub struct Workload {
    pub a: MatrixBuffer,
    pub b: MatrixBuffer,
    pub reference: OutputBuffer,
    pub output: OutputBuffer,
}

impl Workload {
    /// Allocates the buffers described by `config`. The config is validated first.
    pub fn new(config: &BenchConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let a = MatrixBuffer::random(config.rows_a, config.cols_a, &mut rng)?;
        let b = MatrixBuffer::random(config.cols_a, config.cols_b, &mut rng)?;
        let reference = OutputBuffer::new(config.rows_a, config.cols_b)?;
        let output = OutputBuffer::new(config.rows_a, config.cols_b)?;

        Ok(Self {
            a,
            b,
            reference,
            output,
        })
    }

    /// Builds a workload from explicit inputs. `a.cols()` must equal `b.rows()`.
    pub fn from_inputs(a: MatrixBuffer, b: MatrixBuffer) -> Result<Self> {
        if a.cols() != b.rows() {
            return Err(BenchError::MatmulMismatch {
                m: a.rows(),
                k: a.cols(),
                k2: b.rows(),
                n: b.cols(),
            });
        }
        let reference = OutputBuffer::new(a.rows(), b.cols())?;
        let output = OutputBuffer::new(a.rows(), b.cols())?;
        Ok(Self {
            a,
            b,
            reference,
            output,
        })
    }

    /// Computes the baseline into `reference` with the reference kernel.
    pub fn compute_reference(&mut self) -> Result<()> {
        info!(
            rows_a = self.a.rows(),
            cols_a = self.a.cols(),
            cols_b = self.b.cols(),
            "computing reference output"
        );
        let mut args = self.reference_args()?;
        Kernel::Reference.run(&mut args);
        Ok(())
    }

    /// Arguments writing into the candidate output buffer.
    pub fn candidate_args(&mut self) -> Result<KernelArgs<'_>> {
        self.check_shared_dim()?;
        KernelArgs::new(
            self.a.as_slice(),
            self.b.as_slice(),
            self.output.storage_mut(),
            self.a.rows(),
            self.a.cols(),
            self.b.cols(),
        )
    }

    fn reference_args(&mut self) -> Result<KernelArgs<'_>> {
        self.check_shared_dim()?;
        KernelArgs::new(
            self.a.as_slice(),
            self.b.as_slice(),
            self.reference.storage_mut(),
            self.a.rows(),
            self.a.cols(),
            self.b.cols(),
        )
    }

    fn check_shared_dim(&self) -> Result<()> {
        if self.a.cols() != self.b.rows() {
            return Err(BenchError::MatmulMismatch {
                m: self.a.rows(),
                k: self.a.cols(),
                k2: self.b.rows(),
                n: self.b.cols(),
            });
        }
        Ok(())
    }
}
