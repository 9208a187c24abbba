//! Validated argument bundle for one kernel invocation.

use crate::error::{BenchError, Result};

/// Inputs, output and dimensions for `C = A * B`.
///
/// A is `rows_a × cols_a`, B is `cols_a × cols_b`, C is `rows_a × cols_b`.
/// The shared dimension is stored once, so A's columns always equal B's
/// rows. [`KernelArgs::new`] checks every buffer against its dimensions,
/// which is what lets the kernels skip their own checks.
#[derive(Debug)]
pub struct KernelArgs<'a> {
    a: &'a [f32],
    b: &'a [f32],
    output: &'a mut [f32],
    rows_a: usize,
    cols_a: usize,
    cols_b: usize,
}

impl<'a> KernelArgs<'a> {
    /// Builds the bundle, failing fast on zero dimensions or short buffers.
    ///
    /// `output` may be longer than `rows_a * cols_b`; trailing guard cells
    /// ride along so overruns are observable afterwards.
    pub fn new(
        a: &'a [f32],
        b: &'a [f32],
        output: &'a mut [f32],
        rows_a: usize,
        cols_a: usize,
        cols_b: usize,
    ) -> Result<Self> {
        for (name, value) in [("rows_a", rows_a), ("cols_a", cols_a), ("cols_b", cols_b)] {
            if value == 0 {
                return Err(BenchError::InvalidDimension { name, value });
            }
        }

        check_len("A", a.len(), rows_a, cols_a)?;
        check_len("B", b.len(), cols_a, cols_b)?;
        check_len("C", output.len(), rows_a, cols_b)?;

        Ok(Self {
            a,
            b,
            output,
            rows_a,
            cols_a,
            cols_b,
        })
    }

    pub fn rows_a(&self) -> usize {
        self.rows_a
    }

    pub fn cols_a(&self) -> usize {
        self.cols_a
    }

    pub fn cols_b(&self) -> usize {
        self.cols_b
    }

    pub fn a(&self) -> &[f32] {
        self.a
    }

    pub fn b(&self) -> &[f32] {
        self.b
    }

    /// Logical output region, guard cells excluded.
    pub fn output(&self) -> &[f32] {
        &self.output[..self.rows_a * self.cols_b]
    }

    /// Splits into the pieces a kernel needs: `(a, b, c, m, n, k)`.
    pub(crate) fn parts(&mut self) -> (&[f32], &[f32], &mut [f32], usize, usize, usize) {
        (
            self.a,
            self.b,
            &mut *self.output,
            self.rows_a,
            self.cols_b,
            self.cols_a,
        )
    }
}

fn check_len(name: &'static str, got: usize, rows: usize, cols: usize) -> Result<()> {
    let needed = rows
        .checked_mul(cols)
        .ok_or(BenchError::DimensionOverflow { name, rows, cols })?;
    if got < needed {
        return Err(BenchError::BufferTooSmall { name, needed, got });
    }
    Ok(())
}
