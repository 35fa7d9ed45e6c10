//! Euclidean distance kernel shared by the flat index and density estimator.
//!
//! Inputs come from validated [`crate::Dataset`] rows or from queries whose
//! dimension has already been checked, so the kernel itself does not repeat
//! the validation. Accumulation happens in `f64` to keep large dimensions
//! stable.

/// Computes the Euclidean distance between two equally sized vectors.
#[expect(clippy::float_arithmetic, reason = "vector arithmetic")]
#[expect(
    clippy::cast_possible_truncation,
    reason = "distances are reported in the dataset's f32 precision"
)]
pub(crate) fn euclidean(left: &[f32], right: &[f32]) -> f32 {
    debug_assert_eq!(left.len(), right.len(), "dimensions must match");
    let mut sum = 0.0_f64;
    for (&l, &r) in left.iter().zip(right) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    sum.sqrt() as f32
}
