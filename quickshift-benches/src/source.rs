//! Synthetic benchmark datasets.

use quickshift_core::Dataset;
use quickshift_providers_dense::GaussianBlobs;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Shape and seed of a synthetic dataset.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticConfig {
    /// Total number of points.
    pub point_count: usize,
    /// Generator seed.
    pub seed: u64,
}

/// Two well-separated 2-D Gaussian blobs holding `point_count` points
/// between them, the first blob taking any odd point.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `point_count` is below two.
pub fn two_blobs(config: SyntheticConfig) -> Result<Dataset, BenchSetupError> {
    if config.point_count < 2 {
        return Err(BenchSetupError::ZeroValue {
            context: "points per blob",
        });
    }
    let generated = GaussianBlobs::default()
        .with_per_blob(config.point_count.div_ceil(2))
        .with_seed(config.seed)
        .generate()?;
    // Points are blob-major, so a prefix keeps both blobs.
    let prefix: Vec<usize> = (0..config.point_count).collect();
    Ok(generated.dataset.select("two-blobs", &prefix)?)
}

/// Structureless points drawn uniformly from `[-100, 100)` in two dimensions.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] for an empty dataset.
pub fn uniform_noise(config: SyntheticConfig) -> Result<Dataset, BenchSetupError> {
    if config.point_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "point count",
        });
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let rows = (0..config.point_count)
        .map(|_| vec![rng.gen_range(-100.0..100.0), rng.gen_range(-100.0..100.0)])
        .collect();
    Ok(Dataset::from_rows("uniform-noise", rows)?)
}
