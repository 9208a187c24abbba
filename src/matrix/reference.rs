/// Reference matrix multiplication using i-j-k loop order.
///
/// This is the textbook triple loop: one scalar accumulator per output cell,
/// summed in monotonic `p` order and stored once. Every other kernel is
/// checked against its output.
///
/// Use this as a correctness baseline, not for performance.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, overwritten (C = A * B)
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
///
/// # Panics
///
/// Panics if a slice is shorter than its dimensions require.
pub fn matmul_reference(a: &[f32], b: &[f32], c: &mut [f32], m: usize, n: usize, k: usize) {
    c[..m * n].fill(0.0);

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0f32;
            for p in 0..k {
                sum += a[i * k + p] * b[p * n + j];
            }
            c[i * n + j] = sum;
        }
    }
}
