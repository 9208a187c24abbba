//! Cache-blocked scalar GEMM with square tiles.

/// Tile edge used along all three dimensions.
pub const BLOCK_SIZE: usize = 16;

/// Cache-blocked matrix multiplication: C = A * B.
///
/// Splits the i, j and k ranges into `BLOCK_SIZE` tiles and walks them in
/// (ii, jj, kk) order. Inside a tile each output cell is loaded into a
/// scalar, accumulated over the k-tile, then written back, so partial sums
/// from successive k-tiles compose. The last tile on each axis is clamped
/// to the matrix bound.
///
/// Each cell is carried through the k-tiles in a single scalar in
/// increasing k order, the same summation order as
/// [`matmul_reference`](crate::matrix::reference::matmul_reference), so the
/// output is bit-identical to it. Verification still compares with a
/// tolerance.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, overwritten
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
pub fn matmul_blocked(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    // Zero the destination before any tile accumulates into it
    c[..m * n].fill(0.0);

    for ii in (0..m).step_by(BLOCK_SIZE) {
        let i_end = (ii + BLOCK_SIZE).min(m);

        for jj in (0..n).step_by(BLOCK_SIZE) {
            let j_end = (jj + BLOCK_SIZE).min(n);

            for kk in (0..k).step_by(BLOCK_SIZE) {
                let k_end = (kk + BLOCK_SIZE).min(k);

                for i in ii..i_end {
                    let a_row = &a[i * k..i * k + k];

                    for j in jj..j_end {
                        // Start with the partial sum from earlier k-tiles
                        let mut val = c[i * n + j];
                        for p in kk..k_end {
                            val += a_row[p] * b[p * n + j];
                        }
                        c[i * n + j] = val;
                    }
                }
            }
        }
    }
}
