use mmult::matrix::buffer::{GUARD_BITS, GUARD_CELLS, OutputBuffer};
use mmult::verify::DEFAULT_TOLERANCE;
use mmult::{Kernel, KernelArgs, matmul_blocked, matmul_naive_ikj, matmul_reference, verify};

fn assert_matrices_close(expected: &[f32], actual: &[f32], name: &str) {
    assert_eq!(expected.len(), actual.len(), "{}: length mismatch", name);
    for i in 0..expected.len() {
        assert!(
            (expected[i] - actual[i]).abs() <= DEFAULT_TOLERANCE,
            "{}: mismatch at index {}: expected {}, got {}",
            name,
            i,
            expected[i],
            actual[i]
        );
    }
}

fn inputs(m: usize, n: usize, k: usize) -> (Vec<f32>, Vec<f32>) {
    // Small magnitudes keep the absolute tolerance meaningful
    let a: Vec<f32> = (0..m * k).map(|i| (i % 10) as f32 * 0.01).collect();
    let b: Vec<f32> = (0..k * n).map(|i| (i % 7) as f32 * 0.01).collect();
    (a, b)
}

/// Runs `kernel` into a guarded buffer and returns it.
fn run_guarded(kernel: Kernel, a: &[f32], b: &[f32], m: usize, n: usize, k: usize) -> OutputBuffer {
    let mut out = OutputBuffer::new(m, n).unwrap();
    let mut args = KernelArgs::new(a, b, out.storage_mut(), m, k, n).unwrap();
    kernel.run(&mut args);
    out
}

// ============================================================
// Small matrix tests
// ============================================================

#[test]
fn test_2x2_multiply_is_exact_for_every_kernel() {
    let a = vec![1.0, 2.0, 3.0, 4.0];
    let b = vec![5.0, 6.0, 7.0, 8.0];

    for kernel in Kernel::ALL {
        let out = run_guarded(kernel, &a, &b, 2, 2, 2);
        assert_eq!(out.as_slice(), &[19.0, 22.0, 43.0, 50.0], "{}", kernel);
        assert!(out.guard_intact(), "{}", kernel);
    }
}

#[test]
fn test_2x3_times_3x2() {
    let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]; // 2x3
    let b = vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]; // 3x2

    let mut c_ref = vec![0.0; 4];
    let mut c_blocked = vec![0.0; 4];

    matmul_reference(&a, &b, &mut c_ref, 2, 2, 3);
    matmul_blocked(&a, &b, &mut c_blocked, 2, 2, 3);

    assert_eq!(c_ref, vec![58.0, 64.0, 139.0, 154.0]);
    assert_eq!(c_ref, c_blocked);
}

#[test]
fn test_small_odd_sizes() {
    let test_sizes = [
        (1, 1, 1),
        (3, 3, 3),
        (5, 5, 5),
        (3, 5, 7),
        (7, 3, 5),
        (11, 13, 17),
    ];

    for (m, n, k) in test_sizes {
        let (a, b) = inputs(m, n, k);

        let mut c_ref = vec![0.0; m * n];
        let mut c_blocked = vec![0.0; m * n];

        matmul_reference(&a, &b, &mut c_ref, m, n, k);
        matmul_blocked(&a, &b, &mut c_blocked, m, n, k);

        assert_matrices_close(&c_ref, &c_blocked, &format!("{}x{}x{}", m, n, k));
    }
}

// ============================================================
// Tile boundary tests
// ============================================================

#[test]
fn test_tile_boundary_16() {
    let test_sizes = [15, 16, 17, 31, 32, 33, 48, 49];

    for size in test_sizes {
        let (a, b) = inputs(size, size, size);

        let reference = run_guarded(Kernel::Reference, &a, &b, size, size, size);
        let blocked = run_guarded(Kernel::CacheBlocked, &a, &b, size, size, size);

        let v = verify(&reference, &blocked, DEFAULT_TOLERANCE);
        assert!(v.matches, "tile_16_size_{}: {:?}", size, v.first_mismatch);
        assert!(v.guard_ok, "tile_16_size_{}: guard overwritten", size);
    }
}

#[test]
fn test_17_cubed_partial_tiles_on_every_axis() {
    let (a, b) = inputs(17, 17, 17);

    let reference = run_guarded(Kernel::Reference, &a, &b, 17, 17, 17);
    let blocked = run_guarded(Kernel::CacheBlocked, &a, &b, 17, 17, 17);

    assert_matrices_close(reference.as_slice(), blocked.as_slice(), "17x17x17");
    assert!(blocked.guard_intact());
}

#[test]
fn test_non_square_matrices() {
    let test_cases = [
        (32, 64, 48),  // wide result
        (64, 32, 48),  // tall result
        (100, 50, 75), // odd sizes
        (48, 48, 100), // deep k
        (13, 17, 19),  // primes
        (1, 40, 33),   // single row
        (40, 1, 33),   // single column
    ];

    for (m, n, k) in test_cases {
        let (a, b) = inputs(m, n, k);

        let reference = run_guarded(Kernel::Reference, &a, &b, m, n, k);
        for kernel in [Kernel::Naive, Kernel::CacheBlocked] {
            let out = run_guarded(kernel, &a, &b, m, n, k);
            let v = verify(&reference, &out, DEFAULT_TOLERANCE);
            assert!(
                v.passed(),
                "{} non_square_{}x{}x{}: {}",
                kernel,
                m,
                n,
                k,
                v.status()
            );
        }
    }
}

// ============================================================
// Determinism and ordering
// ============================================================

#[test]
fn test_blocked_is_deterministic() {
    let (m, n, k) = (37, 29, 45);
    let (a, b) = inputs(m, n, k);

    let mut first = vec![0.0; m * n];
    let mut second = vec![0.0; m * n];
    matmul_blocked(&a, &b, &mut first, m, n, k);
    matmul_blocked(&a, &b, &mut second, m, n, k);

    let first_bits: Vec<u32> = first.iter().map(|v| v.to_bits()).collect();
    let second_bits: Vec<u32> = second.iter().map(|v| v.to_bits()).collect();
    assert_eq!(first_bits, second_bits);
}

#[test]
fn test_naive_matches_reference_bitwise() {
    let (m, n, k) = (23, 19, 41);
    let a: Vec<f32> = (0..m * k).map(|i| ((i * 37) % 101) as f32 / 101.0).collect();
    let b: Vec<f32> = (0..k * n).map(|i| ((i * 53) % 97) as f32 / 97.0).collect();

    let mut c_ref = vec![0.0; m * n];
    let mut c_naive = vec![0.0; m * n];
    matmul_reference(&a, &b, &mut c_ref, m, n, k);
    matmul_naive_ikj(&a, &b, &mut c_naive, m, n, k);

    assert_eq!(c_ref, c_naive);
}

// ============================================================
// Overwrite test (C = A*B, not C += A*B)
// ============================================================

#[test]
fn test_stale_output_is_overwritten() {
    let size = 20;
    let (a, b) = inputs(size, size, size);

    let mut expected = vec![0.0; size * size];
    matmul_reference(&a, &b, &mut expected, size, size, size);

    for kernel in Kernel::ALL {
        let mut c = vec![5.0; size * size];
        (kernel.function())(&a, &b, &mut c, size, size, size);
        assert_matrices_close(&expected, &c, &format!("overwrite_{}", kernel));
    }
}

// ============================================================
// Guard cells
// ============================================================

#[test]
fn test_guards_survive_every_kernel() {
    let (m, n, k) = (18, 33, 17);
    let (a, b) = inputs(m, n, k);

    for kernel in Kernel::ALL {
        let out = run_guarded(kernel, &a, &b, m, n, k);
        assert_eq!(out.guards().len(), GUARD_CELLS);
        assert!(
            out.guards().iter().all(|g| g.to_bits() == GUARD_BITS),
            "{} touched a guard cell",
            kernel
        );
    }
}

#[test]
fn test_corrupted_guard_is_reported_independently() {
    let (a, b) = inputs(4, 4, 4);
    let reference = run_guarded(Kernel::Reference, &a, &b, 4, 4, 4);
    let mut blocked = run_guarded(Kernel::CacheBlocked, &a, &b, 4, 4, 4);

    blocked.guards_mut()[GUARD_CELLS - 1] = 1.0;

    let v = verify(&reference, &blocked, DEFAULT_TOLERANCE);
    assert!(v.matches);
    assert!(!v.guard_ok);
}
