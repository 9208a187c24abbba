//! Output verification against the reference kernel.

use std::fmt;

use crate::matrix::buffer::OutputBuffer;

/// Default absolute tolerance for element comparison.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// First cell that fell outside the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub expected: f32,
    pub actual: f32,
}

/// Outcome of comparing a candidate output with the reference output.
///
/// `matches` and `guard_ok` are independent: a kernel can produce the right
/// numbers and still have scribbled past its output, or the other way round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub matches: bool,
    pub guard_ok: bool,
    pub mismatches: usize,
    pub max_abs_diff: f32,
    pub first_mismatch: Option<Mismatch>,
}

impl Verification {
    pub fn passed(&self) -> bool {
        self.matches && self.guard_ok
    }

    pub fn status(&self) -> &'static str {
        match (self.matches, self.guard_ok) {
            (true, true) => "Success",
            (false, true) => "Fail, but no buffer overruns",
            (true, false) => "Success, but failed buffer overruns check",
            (false, false) => "Failed, and failed buffer overruns check",
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status())
    }
}

/// Compares `candidate` with `reference` element-wise within `tolerance`
/// and checks the candidate's guard cells.
///
/// A NaN on either side never matches.
///
/// # Panics
///
/// Panics if the two buffers have different shapes.
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn verify(reference: &OutputBuffer, candidate: &OutputBuffer, tolerance: f32) -> Verification {
    assert_eq!(
        (reference.rows(), reference.cols()),
        (candidate.rows(), candidate.cols()),
        "reference and candidate shapes differ"
    );

    let cols = candidate.cols();
    let mut mismatches = 0;
    let mut max_abs_diff = 0.0f32;
    let mut first_mismatch = None;

    for (idx, (&expected, &actual)) in reference
        .as_slice()
        .iter()
        .zip(candidate.as_slice())
        .enumerate()
    {
        let diff = (actual - expected).abs();
        if diff > max_abs_diff || diff.is_nan() {
            max_abs_diff = diff;
        }
        // Written so that NaN fails the comparison
        if !(diff <= tolerance) {
            mismatches += 1;
            if first_mismatch.is_none() {
                first_mismatch = Some(Mismatch {
                    row: idx / cols,
                    col: idx % cols,
                    expected,
                    actual,
                });
            }
        }
    }

    Verification {
        matches: mismatches == 0,
        guard_ok: candidate.guard_intact(),
        mismatches,
        max_abs_diff,
        first_mismatch,
    }
}
