//! Error types produced by density estimators.

use thiserror::Error;

use crate::{error::define_error_codes, index::IndexError};

/// Errors produced while fitting or querying a density model.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum DensityError {
    /// The estimator was fitted on an empty reference set.
    #[error("cannot fit a density model on an empty reference set")]
    EmptyReference,
    /// A density was requested with a zero neighbourhood.
    #[error("density neighbourhood must be at least 1")]
    ZeroNeighbourhood,
    /// The underlying neighbour index failed.
    #[error("reference index failed: {0}")]
    Index(#[from] IndexError),
}

define_error_codes! {
    /// Stable codes describing [`DensityError`] variants.
    enum DensityErrorCode for DensityError {
        /// The estimator was fitted on an empty reference set.
        EmptyReference => EmptyReference => "DENSITY_EMPTY_REFERENCE",
        /// A density was requested with a zero neighbourhood.
        ZeroNeighbourhood => ZeroNeighbourhood => "DENSITY_ZERO_NEIGHBOURHOOD",
        /// The underlying neighbour index failed.
        Index => Index(..) => "DENSITY_INDEX_FAILURE",
    }
}
