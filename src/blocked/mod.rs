//! Cache-blocked GEMM implementations.
//!
//! These functions break the matrix multiplication into tiles so that the
//! pieces of A, B and C being worked on stay resident in L1 while they are
//! reused.
//!
//! Available implementations:
//! - `tiled`: 16×16×16 scalar tiles, the `opt` benchmark variant

pub mod tiled;
