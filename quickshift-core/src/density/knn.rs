//! k-nearest-neighbour density estimator.
//!
//! The density at a point is the reciprocal of its mean distance to the
//! closest reference points. The mean is floored so coincident points still
//! produce a finite value.

use super::{DensityEstimator, DensityModel, error::DensityError};
use crate::{
    Dataset,
    index::{FlatIndexBuilder, IndexBuilder, NeighbourIndex},
};

/// Smallest mean distance used when inverting, keeping densities finite.
const MEAN_DISTANCE_FLOOR: f64 = 1.0e-12;

/// Density estimator backed by nearest-neighbour distances.
///
/// # Examples
/// ```
/// use quickshift_core::{Dataset, DensityEstimator, DensityModel, KnnDensity};
///
/// let reference = Dataset::from_rows(
///     "ref",
///     vec![vec![0.0], vec![0.1], vec![0.2], vec![9.0]],
/// )?;
/// let model = KnnDensity::new().fit(&reference)?;
/// let crowded = model.density(&[0.1], 3)?;
/// let sparse = model.density(&[9.0], 3)?;
/// assert!(crowded > sparse);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct KnnDensity<B = FlatIndexBuilder> {
    index_builder: B,
}

impl KnnDensity {
    /// Creates an estimator backed by an exact [`FlatIndexBuilder`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index_builder: FlatIndexBuilder,
        }
    }
}

impl<B: IndexBuilder> KnnDensity<B> {
    /// Creates an estimator that indexes reference sets with `index_builder`.
    #[must_use]
    pub const fn with_index_builder(index_builder: B) -> Self {
        Self { index_builder }
    }
}

impl<B: IndexBuilder> DensityEstimator for KnnDensity<B> {
    type Model = KnnDensityModel<B::Index>;

    fn fit(&self, reference: &Dataset) -> Result<Self::Model, DensityError> {
        if reference.is_empty() {
            return Err(DensityError::EmptyReference);
        }
        let index = self.index_builder.build(reference)?;
        Ok(KnnDensityModel { index })
    }
}

/// Fitted k-nearest-neighbour density model.
#[derive(Clone, Debug)]
pub struct KnnDensityModel<I> {
    index: I,
}

impl<I: NeighbourIndex> KnnDensityModel<I> {
    /// Returns the number of reference points backing the model.
    #[must_use]
    pub fn reference_len(&self) -> usize {
        self.index.len()
    }
}

impl<I: NeighbourIndex> DensityModel for KnnDensityModel<I> {
    #[expect(clippy::float_arithmetic, reason = "density is an inverse mean")]
    #[expect(
        clippy::cast_precision_loss,
        reason = "neighbour counts are far below 2^52"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "densities are reported in f32 precision and bounded by the floor"
    )]
    fn density(&self, point: &[f32], neighbourhood: usize) -> Result<f32, DensityError> {
        if neighbourhood == 0 {
            return Err(DensityError::ZeroNeighbourhood);
        }
        let neighbours = self.index.search(point, neighbourhood)?;
        if neighbours.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = neighbours.iter().map(|n| f64::from(n.distance)).sum();
        let mean = total / neighbours.len() as f64;
        Ok((1.0 / mean.max(MEAN_DISTANCE_FLOOR)) as f32)
    }
}
