//! Synthetic isotropic Gaussian blobs with ground-truth labels.
use std::f32::consts::TAU;

use quickshift_core::Dataset;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::errors::DenseIngestError;

/// A generated dataset together with the blob each point was drawn from.
#[derive(Clone, Debug)]
pub struct LabelledDataset {
    /// Generated points, blob by blob in centre order.
    pub dataset: Dataset,
    /// Index of the generating centre for every point.
    pub labels: Vec<usize>,
}

/// Generator for points scattered normally around fixed centres.
///
/// The default reproduces the classic two-cluster benchmark: 5000 points
/// around each of `(-90, -90)` and `(0, 0)` with standard deviation 5.
///
/// # Examples
/// ```
/// use quickshift_providers_dense::GaussianBlobs;
///
/// let blobs = GaussianBlobs::default().with_per_blob(50).generate()?;
/// assert_eq!(blobs.dataset.len(), 100);
/// assert_eq!(blobs.dataset.dimension(), 2);
/// assert_eq!(blobs.labels[49], 0);
/// assert_eq!(blobs.labels[50], 1);
/// # Ok::<(), quickshift_providers_dense::DenseIngestError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianBlobs {
    centres: Vec<Vec<f32>>,
    per_blob: usize,
    std_dev: f32,
    seed: u64,
}

impl Default for GaussianBlobs {
    fn default() -> Self {
        Self::new(vec![vec![-90.0, -90.0], vec![0.0, 0.0]])
    }
}

impl GaussianBlobs {
    /// Creates a generator around `centres` with the default size, spread
    /// and seed.
    #[must_use]
    pub const fn new(centres: Vec<Vec<f32>>) -> Self {
        Self {
            centres,
            per_blob: 5_000,
            std_dev: 5.0,
            seed: 0,
        }
    }

    /// Sets how many points each blob receives.
    #[must_use]
    pub const fn with_per_blob(mut self, per_blob: usize) -> Self {
        self.per_blob = per_blob;
        self
    }

    /// Sets the per-coordinate standard deviation.
    #[must_use]
    pub const fn with_std_dev(mut self, std_dev: f32) -> Self {
        self.std_dev = std_dev;
        self
    }

    /// Sets the generator seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the blob centres.
    #[must_use]
    pub fn centres(&self) -> &[Vec<f32>] {
        &self.centres
    }

    /// Returns the number of points per blob.
    #[must_use]
    #[rustfmt::skip]
    pub const fn per_blob(&self) -> usize { self.per_blob }

    /// Draws the points.
    ///
    /// # Errors
    /// Returns [`DenseIngestError::InvalidStdDev`] for a negative or
    /// non-finite spread and [`DenseIngestError::Dataset`] when there are no
    /// centres, no points per blob, or the centres disagree on dimension.
    #[expect(clippy::float_arithmetic, reason = "Box-Muller transform")]
    pub fn generate(&self) -> Result<LabelledDataset, DenseIngestError> {
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(DenseIngestError::InvalidStdDev {
                std_dev: self.std_dev,
            });
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut rows = Vec::with_capacity(self.centres.len().saturating_mul(self.per_blob));
        let mut labels = Vec::with_capacity(rows.capacity());
        for (label, centre) in self.centres.iter().enumerate() {
            for _ in 0..self.per_blob {
                let point = centre
                    .iter()
                    .map(|&mean| mean + self.std_dev * standard_normal(&mut rng))
                    .collect();
                rows.push(point);
                labels.push(label);
            }
        }
        let dataset = Dataset::from_rows("gaussian-blobs", rows)?;
        Ok(LabelledDataset { dataset, labels })
    }
}

#[expect(clippy::float_arithmetic, reason = "Box-Muller transform")]
fn standard_normal(rng: &mut SmallRng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
