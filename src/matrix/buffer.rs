//! Flat row-major matrix storage with trailing guard cells.

use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::error::{BenchError, Result};

/// Number of sentinel cells appended past the logical end of an output buffer.
pub const GUARD_CELLS: usize = 4;

/// Bit pattern written into every guard cell.
pub const GUARD_BITS: u32 = 0xdead_cafe;

/// A row-major `rows × cols` matrix of `f32`, element `(i, j)` at `i * cols + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuffer {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl MatrixBuffer {
    /// Zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_len("matrix", rows, cols)?;
        Ok(Self {
            data: vec![0.0; len],
            rows,
            cols,
        })
    }

    /// Wraps existing row-major data. `data` must hold at least `rows * cols` elements.
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self> {
        let needed = checked_len("matrix", rows, cols)?;
        if data.len() < needed {
            return Err(BenchError::BufferTooSmall {
                name: "matrix",
                needed,
                got: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Matrix filled with values drawn uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Result<Self> {
        let len = checked_len("matrix", rows, cols)?;
        let dist = Uniform::new(0.0f32, 1.0f32);
        let data = (0..len).map(|_| dist.sample(rng)).collect();
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }
}

/// Output matrix followed by [`GUARD_CELLS`] sentinel cells.
///
/// Kernels receive the whole allocation, guard cells included, so a kernel
/// that writes past its logical bound corrupts a sentinel instead of
/// silently succeeding. [`OutputBuffer::guard_intact`] detects that.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl OutputBuffer {
    /// Allocates a zeroed `rows × cols` output and arms its guard cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_len("output", rows, cols)?;
        let mut data = vec![0.0; len + GUARD_CELLS];
        for cell in &mut data[len..] {
            *cell = f32::from_bits(GUARD_BITS);
        }
        Ok(Self { data, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of logical elements, guard cells excluded.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The logical `rows × cols` region.
    pub fn as_slice(&self) -> &[f32] {
        &self.data[..self.len()]
    }

    /// The full allocation, guard cells included.
    pub fn storage(&self) -> &[f32] {
        &self.data
    }

    /// Mutable view of the full allocation, guard cells included.
    pub fn storage_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn guards(&self) -> &[f32] {
        &self.data[self.len()..]
    }

    pub fn guards_mut(&mut self) -> &mut [f32] {
        let len = self.len();
        &mut self.data[len..]
    }

    /// True if every guard cell still holds [`GUARD_BITS`] bit-for-bit.
    pub fn guard_intact(&self) -> bool {
        self.guards().iter().all(|g| g.to_bits() == GUARD_BITS)
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }
}

fn checked_len(name: &'static str, rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(BenchError::DimensionOverflow { name, rows, cols })
}
