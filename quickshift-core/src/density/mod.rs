//! Approximate density estimation.
//!
//! A [`DensityEstimator`] is fitted on a reference dataset and yields a
//! [`DensityModel`] answering "how dense is the reference set around this
//! point, given an effective neighbourhood size". The clustering engine only
//! compares densities with each other, so values need to be locally
//! meaningful rather than calibrated.

mod error;
mod knn;

pub use self::{
    error::{DensityError, DensityErrorCode},
    knn::{KnnDensity, KnnDensityModel},
};

use crate::Dataset;

/// Fits density models on reference datasets.
pub trait DensityEstimator: Send + Sync {
    /// Model produced by [`DensityEstimator::fit`].
    type Model: DensityModel;

    /// Fits a model on `reference`.
    ///
    /// # Errors
    /// Returns [`DensityError::EmptyReference`] when `reference` holds no
    /// points, or any error raised while indexing it.
    fn fit(&self, reference: &Dataset) -> Result<Self::Model, DensityError>;
}

/// Read-only density oracle produced by a [`DensityEstimator`].
pub trait DensityModel: Send + Sync {
    /// Estimates the density at `point` using `neighbourhood` reference
    /// points. The returned value is finite and non-negative.
    ///
    /// # Errors
    /// Returns [`DensityError::ZeroNeighbourhood`] when `neighbourhood` is
    /// zero, or any error raised while querying the reference set.
    fn density(&self, point: &[f32], neighbourhood: usize) -> Result<f32, DensityError>;
}
