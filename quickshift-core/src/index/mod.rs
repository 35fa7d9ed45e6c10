//! Nearest-neighbour search over [`crate::Dataset`] points.
//!
//! The clustering engine only depends on the [`NeighbourIndex`] and
//! [`IndexBuilder`] traits: an index is built once, then queried many times
//! with arbitrary points of the same dimension. The same builder produces
//! independent indices for a full dataset and for a sample of it.
//!
//! [`FlatIndex`] is the exact brute-force implementation shipped with the
//! crate.

mod error;
mod flat;
mod types;

pub use self::{
    error::{IndexError, IndexErrorCode},
    flat::{FlatIndex, FlatIndexBuilder},
    types::Neighbour,
};

use crate::Dataset;

/// Answers "k nearest points to this query" over a fixed point set.
pub trait NeighbourIndex: Send + Sync {
    /// Returns the number of indexed points.
    fn len(&self) -> usize;

    /// Returns whether the index holds no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dimension of the indexed points.
    fn dimension(&self) -> usize;

    /// Returns up to `k` indexed points closest to `query`, ascending by
    /// distance with ties broken by the lower id.
    ///
    /// When `query` is itself one of the indexed points it is returned with a
    /// distance of zero.
    ///
    /// # Errors
    /// Returns [`IndexError::DimensionMismatch`] when `query` has the wrong
    /// dimension and [`IndexError::NonFiniteQuery`] when it contains NaN or
    /// infinite coordinates.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbour>, IndexError>;
}

/// Builds a [`NeighbourIndex`] over a dataset.
pub trait IndexBuilder: Send + Sync {
    /// Index type produced by this builder.
    type Index: NeighbourIndex;

    /// Builds an index over every point of `points`.
    ///
    /// # Errors
    /// Returns [`IndexError::EmptyBuild`] when `points` holds no points.
    fn build(&self, points: &Dataset) -> Result<Self::Index, IndexError>;
}
