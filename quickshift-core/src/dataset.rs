//! Dense point storage for the QuickShift core runtime.
//!
//! A [`Dataset`] is an ordered sequence of fixed-dimension points held in one
//! contiguous row-major buffer. A point's position is its identity for the
//! duration of a clustering run.

use std::sync::Arc;

use crate::error::DatasetError;

/// Validated, row-major collection of `f32` points.
///
/// # Examples
/// ```
/// use quickshift_core::Dataset;
///
/// let dataset = Dataset::from_rows("demo", vec![vec![0.0, 1.0], vec![2.0, 3.0]])?;
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.dimension(), 2);
/// assert_eq!(dataset.row(1)?, &[2.0, 3.0]);
/// # Ok::<(), quickshift_core::DatasetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: Arc<str>,
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
}

impl Dataset {
    /// Builds a dataset from individual rows.
    ///
    /// # Errors
    /// Returns [`DatasetError::Empty`] when `rows` is empty,
    /// [`DatasetError::ZeroDimension`] when the first row is empty,
    /// [`DatasetError::DimensionMismatch`] when row lengths differ, and
    /// [`DatasetError::NonFinite`] when a coordinate is NaN or infinite.
    pub fn from_rows(name: impl Into<Arc<str>>, rows: Vec<Vec<f32>>) -> Result<Self, DatasetError> {
        let Some(first) = rows.first() else {
            return Err(DatasetError::Empty);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(DatasetError::ZeroDimension);
        }

        let mut values = Vec::with_capacity(rows.len().saturating_mul(dimension));
        for (row, point) in rows.iter().enumerate() {
            if point.len() != dimension {
                return Err(DatasetError::DimensionMismatch {
                    row,
                    expected: dimension,
                    actual: point.len(),
                });
            }
            values.extend_from_slice(point);
        }
        Self::from_flat(name, rows.len(), dimension, values)
    }

    /// Builds a dataset from a flat row-major buffer.
    ///
    /// # Errors
    /// Returns [`DatasetError::Empty`] for zero rows,
    /// [`DatasetError::ZeroDimension`] for a zero dimension,
    /// [`DatasetError::LengthMismatch`] when `values.len() != rows * dimension`,
    /// and [`DatasetError::NonFinite`] when a coordinate is NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::{Dataset, DatasetError};
    ///
    /// let err = Dataset::from_flat("bad", 2, 2, vec![0.0, 1.0, 2.0]).unwrap_err();
    /// assert!(matches!(err, DatasetError::LengthMismatch { actual: 3, .. }));
    /// ```
    pub fn from_flat(
        name: impl Into<Arc<str>>,
        rows: usize,
        dimension: usize,
        values: Vec<f32>,
    ) -> Result<Self, DatasetError> {
        if rows == 0 {
            return Err(DatasetError::Empty);
        }
        if dimension == 0 {
            return Err(DatasetError::ZeroDimension);
        }
        if rows.checked_mul(dimension) != Some(values.len()) {
            return Err(DatasetError::LengthMismatch {
                rows,
                dimension,
                actual: values.len(),
            });
        }
        if let Some(position) = values.iter().position(|value| !value.is_finite()) {
            return Err(DatasetError::NonFinite {
                row: position / dimension,
                column: position % dimension,
            });
        }

        Ok(Self {
            name: name.into(),
            rows,
            dimension,
            values,
        })
    }

    /// Returns the human-readable name of the dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of points.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.rows }

    /// Returns whether the dataset holds no points. Validated datasets are
    /// never empty, but the accessor keeps the usual collection vocabulary.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.rows == 0 }

    /// Returns the dimension shared by every point.
    #[must_use]
    #[rustfmt::skip]
    pub fn dimension(&self) -> usize { self.dimension }

    /// Returns the underlying row-major buffer.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the coordinates of point `index`.
    ///
    /// # Errors
    /// Returns [`DatasetError::OutOfBounds`] when `index >= len()`.
    pub fn row(&self, index: usize) -> Result<&[f32], DatasetError> {
        let start = index
            .checked_mul(self.dimension)
            .ok_or(DatasetError::OutOfBounds { index })?;
        let end = start
            .checked_add(self.dimension)
            .ok_or(DatasetError::OutOfBounds { index })?;
        self.values
            .get(start..end)
            .ok_or(DatasetError::OutOfBounds { index })
    }

    /// Iterates over the points in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        self.values.chunks_exact(self.dimension)
    }

    /// Copies the points at `indices`, in the given order, into a new dataset.
    ///
    /// # Errors
    /// Returns [`DatasetError::Empty`] when `indices` is empty and
    /// [`DatasetError::OutOfBounds`] when an index is invalid.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::Dataset;
    ///
    /// let dataset = Dataset::from_rows("demo", vec![vec![0.0], vec![1.0], vec![2.0]])?;
    /// let subset = dataset.select("subset", &[2, 0])?;
    /// assert_eq!(subset.values(), &[2.0, 0.0]);
    /// # Ok::<(), quickshift_core::DatasetError>(())
    /// ```
    pub fn select(
        &self,
        name: impl Into<Arc<str>>,
        indices: &[usize],
    ) -> Result<Self, DatasetError> {
        if indices.is_empty() {
            return Err(DatasetError::Empty);
        }
        let mut values = Vec::with_capacity(indices.len().saturating_mul(self.dimension));
        for &index in indices {
            values.extend_from_slice(self.row(index)?);
        }
        Ok(Self {
            name: name.into(),
            rows: indices.len(),
            dimension: self.dimension,
            values,
        })
    }
}
