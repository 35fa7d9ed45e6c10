//! Exact brute-force Euclidean index.
//!
//! Every query scans all indexed points and keeps the `k` closest in a
//! bounded max-heap, so results are exact and ordered deterministically.

use std::collections::BinaryHeap;

use tracing::debug;

use super::{IndexBuilder, NeighbourIndex, error::IndexError, types::Neighbour};
use crate::{Dataset, distance::euclidean};

/// Builds [`FlatIndex`] instances.
///
/// # Examples
/// ```
/// use quickshift_core::{Dataset, FlatIndexBuilder, IndexBuilder, NeighbourIndex};
///
/// let points = Dataset::from_rows("line", vec![vec![0.0], vec![1.0], vec![5.0]])?;
/// let index = FlatIndexBuilder.build(&points)?;
/// let neighbours = index.search(&[0.9], 2)?;
/// assert_eq!(neighbours.iter().map(|n| n.id).collect::<Vec<_>>(), [1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatIndexBuilder;

impl IndexBuilder for FlatIndexBuilder {
    type Index = FlatIndex;

    fn build(&self, points: &Dataset) -> Result<Self::Index, IndexError> {
        FlatIndex::new(points.clone())
    }
}

/// Exact L2 index that owns a copy of the indexed points.
#[derive(Clone, Debug)]
pub struct FlatIndex {
    points: Dataset,
}

impl FlatIndex {
    /// Creates an index over `points`.
    ///
    /// # Errors
    /// Returns [`IndexError::EmptyBuild`] when `points` holds no points.
    pub fn new(points: Dataset) -> Result<Self, IndexError> {
        if points.is_empty() {
            return Err(IndexError::EmptyBuild);
        }
        debug!(
            points = points.len(),
            dimension = points.dimension(),
            "flat index built"
        );
        Ok(Self { points })
    }

    fn validate_query(&self, query: &[f32]) -> Result<(), IndexError> {
        if query.len() != self.points.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.points.dimension(),
                actual: query.len(),
            });
        }
        match query.iter().position(|value| !value.is_finite()) {
            Some(index) => Err(IndexError::NonFiniteQuery { index }),
            None => Ok(()),
        }
    }
}

impl NeighbourIndex for FlatIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn dimension(&self) -> usize {
        self.points.dimension()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbour>, IndexError> {
        self.validate_query(query)?;
        let limit = k.min(self.points.len());
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut best = BinaryHeap::with_capacity(limit + 1);
        for (id, point) in self.points.rows().enumerate() {
            let candidate = Neighbour {
                id,
                distance: euclidean(query, point),
            };
            if best.len() < limit {
                best.push(candidate);
            } else if best.peek().is_some_and(|furthest| candidate < *furthest) {
                best.pop();
                best.push(candidate);
            }
        }
        Ok(best.into_sorted_vec())
    }
}
