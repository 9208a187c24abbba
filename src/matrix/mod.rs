//! Matrix storage and the scalar kernels.
//!
//! The reference kernel is the correctness baseline every other variant is
//! verified against; the i-k-j kernel is the plain scalar contender.

pub mod buffer;
pub mod naive_ikj;
pub mod reference;
