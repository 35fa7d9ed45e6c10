//! Error types produced by nearest-neighbour indices.

use thiserror::Error;

use crate::error::define_error_codes;

/// Errors produced while building or querying a [`super::NeighbourIndex`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum IndexError {
    /// Construction was attempted on an empty point set.
    #[error("cannot build a neighbour index from an empty point set")]
    EmptyBuild,
    /// The query had a different dimension from the indexed points.
    #[error("query has dimension {actual} but the index holds dimension {expected}")]
    DimensionMismatch {
        /// Dimension of the indexed points.
        expected: usize,
        /// Dimension of the query.
        actual: usize,
    },
    /// The query contained a NaN or infinite coordinate.
    #[error("query has a non-finite coordinate at position {index}")]
    NonFiniteQuery {
        /// Offending coordinate.
        index: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`IndexError`] variants.
    enum IndexErrorCode for IndexError {
        /// Construction was attempted on an empty point set.
        EmptyBuild => EmptyBuild => "INDEX_EMPTY_BUILD",
        /// The query had a different dimension from the indexed points.
        DimensionMismatch => DimensionMismatch { .. } => "INDEX_DIMENSION_MISMATCH",
        /// The query contained a NaN or infinite coordinate.
        NonFiniteQuery => NonFiniteQuery { .. } => "INDEX_NON_FINITE_QUERY",
    }
}
