//! Error types for the QuickShift core library.
//!
//! Defines the error enums exposed by the public API, their stable codes, and
//! a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{density::DensityError, index::IndexError, result::NonContiguousClusterIds};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// An error produced while constructing or reading a [`crate::Dataset`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DatasetError {
    /// The dataset contained no rows.
    #[error("dataset contains no points")]
    Empty,
    /// Rows must have a positive dimension.
    #[error("dataset points must have positive dimension")]
    ZeroDimension,
    /// A row did not match the dimension of the first row.
    #[error("point {row} has dimension {actual} but expected {expected}")]
    DimensionMismatch {
        /// Offending row.
        row: usize,
        /// Dimension established by the first row.
        expected: usize,
        /// Dimension of the offending row.
        actual: usize,
    },
    /// A flat buffer did not hold `rows * dimension` values.
    #[error("flat buffer holds {actual} values but {rows} rows of dimension {dimension} were declared")]
    LengthMismatch {
        /// Declared row count.
        rows: usize,
        /// Declared dimension.
        dimension: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point {row} has a non-finite coordinate at position {column}")]
    NonFinite {
        /// Offending row.
        row: usize,
        /// Offending coordinate within the row.
        column: usize,
    },
    /// Requested row was outside the dataset's bounds.
    #[error("point index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row.
        index: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`DatasetError`] variants.
    enum DatasetErrorCode for DatasetError {
        /// The dataset contained no rows.
        Empty => Empty => "DATASET_EMPTY",
        /// Rows must have a positive dimension.
        ZeroDimension => ZeroDimension => "DATASET_ZERO_DIMENSION",
        /// A row did not match the dimension of the first row.
        DimensionMismatch => DimensionMismatch { .. } => "DATASET_DIMENSION_MISMATCH",
        /// A flat buffer did not hold `rows * dimension` values.
        LengthMismatch => LengthMismatch { .. } => "DATASET_LENGTH_MISMATCH",
        /// A coordinate was NaN or infinite.
        NonFinite => NonFinite { .. } => "DATASET_NON_FINITE",
        /// Requested row was outside the dataset's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATASET_OUT_OF_BOUNDS",
    }
}

/// Broad classification of [`QuickShiftError`] values.
///
/// None of these conditions are transient, so callers should not retry the
/// same call without changing its parameters or data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// The dataset or parameters were rejected before any work started.
    InvalidInput,
    /// The sample was too small for the recursive clustering step.
    DegenerateSample,
    /// An unsampled point had no valid sample neighbour to inherit from.
    UnresolvedExtension,
    /// A collaborator or internal structure failed.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidInput => "invalid input",
            Self::DegenerateSample => "degenerate sample",
            Self::UnresolvedExtension => "unresolved extension",
            Self::Internal => "internal",
        })
    }
}

/// Error type produced when configuring or running QuickShift clustering.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum QuickShiftError {
    /// The dataset failed validation.
    #[error("invalid dataset: {0}")]
    InvalidDataset(#[from] DatasetError),
    /// The neighbourhood size was zero.
    #[error("neighbourhood size must be at least 1")]
    ZeroNeighbourhood,
    /// The neighbourhood size was not smaller than the dataset.
    #[error("neighbourhood size {neighbours} must be smaller than the dataset size {items}")]
    NeighbourhoodTooLarge {
        /// Requested neighbourhood size.
        neighbours: usize,
        /// Number of points in the dataset.
        items: usize,
    },
    /// Caller-supplied densities did not cover the dataset.
    #[error("expected {expected} density values but received {actual}")]
    DensityLengthMismatch {
        /// Number of points in the dataset.
        expected: usize,
        /// Number of densities supplied.
        actual: usize,
    },
    /// A density value was negative or non-finite.
    #[error("density at point {point} must be finite and non-negative (got {value})")]
    InvalidDensity {
        /// Point carrying the invalid density.
        point: usize,
        /// The rejected value.
        value: f32,
    },
    /// The sampling policy produced a probability outside `[0, 1]`.
    #[error("sampling probability {probability} for {items} points is outside [0, 1]")]
    InvalidSamplingProbability {
        /// Dataset size handed to the policy.
        items: usize,
        /// Probability returned by the policy.
        probability: f64,
    },
    /// The automatic strategy threshold was zero.
    #[error("scaled threshold must be at least 1")]
    InvalidScaledThreshold,
    /// The sample cannot support the recursive clustering step.
    #[error(
        "sample of {sample_size} points cannot support recursive clustering (neighbourhood {neighbours})"
    )]
    DegenerateSample {
        /// Final sample size after augmentation.
        sample_size: usize,
        /// Recursive neighbourhood size derived from the sample.
        neighbours: usize,
    },
    /// The exact clusterer returned the wrong number of sample labels.
    #[error("expected {expected} sample labels but the exact clusterer returned {actual}")]
    SampleLabelMismatch {
        /// Final sample size.
        expected: usize,
        /// Number of labels returned.
        actual: usize,
    },
    /// Final labels were not numbered contiguously from zero.
    #[error("cluster labels are not contiguous: {0}")]
    InvalidLabels(#[from] NonContiguousClusterIds),
    /// An unsampled point had no qualifying sample neighbour.
    #[error("point {point} has no denser neighbour among its {candidates} sample neighbours")]
    UnresolvedExtension {
        /// The unsampled point that could not be labelled.
        point: usize,
        /// Number of sample neighbours inspected.
        candidates: usize,
    },
    /// A parent chain failed to reach a root.
    #[error("parent chain starting at point {point} does not reach a root within {limit} steps")]
    ParentCycle {
        /// Point whose chain was being resolved.
        point: usize,
        /// Step limit that was exceeded.
        limit: usize,
    },
    /// A parent pointer referenced a point outside the forest.
    #[error("parent {parent} of point {point} is outside the dataset")]
    ParentOutOfBounds {
        /// Point carrying the pointer.
        point: usize,
        /// The out-of-range parent.
        parent: usize,
    },
    /// The nearest-neighbour index failed.
    #[error("nearest-neighbour index failed: {0}")]
    Index(#[from] IndexError),
    /// The density estimator failed.
    #[error("density estimation failed: {0}")]
    Density(#[from] DensityError),
}

define_error_codes! {
    /// Stable codes describing [`QuickShiftError`] variants.
    enum QuickShiftErrorCode for QuickShiftError {
        /// The dataset failed validation.
        InvalidDataset => InvalidDataset(..) => "QUICKSHIFT_INVALID_DATASET",
        /// The neighbourhood size was zero.
        ZeroNeighbourhood => ZeroNeighbourhood => "QUICKSHIFT_ZERO_NEIGHBOURHOOD",
        /// The neighbourhood size was not smaller than the dataset.
        NeighbourhoodTooLarge => NeighbourhoodTooLarge { .. } => "QUICKSHIFT_NEIGHBOURHOOD_TOO_LARGE",
        /// Caller-supplied densities did not cover the dataset.
        DensityLengthMismatch => DensityLengthMismatch { .. } => "QUICKSHIFT_DENSITY_LENGTH_MISMATCH",
        /// A density value was negative or non-finite.
        InvalidDensity => InvalidDensity { .. } => "QUICKSHIFT_INVALID_DENSITY",
        /// The sampling policy produced a probability outside `[0, 1]`.
        InvalidSamplingProbability => InvalidSamplingProbability { .. } => "QUICKSHIFT_INVALID_SAMPLING_PROBABILITY",
        /// The automatic strategy threshold was zero.
        InvalidScaledThreshold => InvalidScaledThreshold => "QUICKSHIFT_INVALID_SCALED_THRESHOLD",
        /// The sample cannot support the recursive clustering step.
        DegenerateSample => DegenerateSample { .. } => "QUICKSHIFT_DEGENERATE_SAMPLE",
        /// The exact clusterer returned the wrong number of sample labels.
        SampleLabelMismatch => SampleLabelMismatch { .. } => "QUICKSHIFT_SAMPLE_LABEL_MISMATCH",
        /// Final labels were not numbered contiguously from zero.
        InvalidLabels => InvalidLabels(..) => "QUICKSHIFT_INVALID_LABELS",
        /// An unsampled point had no qualifying sample neighbour.
        UnresolvedExtension => UnresolvedExtension { .. } => "QUICKSHIFT_UNRESOLVED_EXTENSION",
        /// A parent chain failed to reach a root.
        ParentCycle => ParentCycle { .. } => "QUICKSHIFT_PARENT_CYCLE",
        /// A parent pointer referenced a point outside the forest.
        ParentOutOfBounds => ParentOutOfBounds { .. } => "QUICKSHIFT_PARENT_OUT_OF_BOUNDS",
        /// The nearest-neighbour index failed.
        IndexFailure => Index(..) => "QUICKSHIFT_INDEX_FAILURE",
        /// The density estimator failed.
        DensityFailure => Density(..) => "QUICKSHIFT_DENSITY_FAILURE",
    }
}

impl QuickShiftError {
    /// Classifies the error into the broad [`ErrorKind`] taxonomy.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::{ErrorKind, QuickShiftError};
    ///
    /// let err = QuickShiftError::DegenerateSample { sample_size: 1, neighbours: 0 };
    /// assert_eq!(err.kind(), ErrorKind::DegenerateSample);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDataset(_)
            | Self::ZeroNeighbourhood
            | Self::NeighbourhoodTooLarge { .. }
            | Self::DensityLengthMismatch { .. }
            | Self::InvalidDensity { .. }
            | Self::InvalidSamplingProbability { .. }
            | Self::InvalidScaledThreshold => ErrorKind::InvalidInput,
            Self::DegenerateSample { .. } => ErrorKind::DegenerateSample,
            Self::UnresolvedExtension { .. } => ErrorKind::UnresolvedExtension,
            Self::SampleLabelMismatch { .. }
            | Self::InvalidLabels(_)
            | Self::ParentCycle { .. }
            | Self::ParentOutOfBounds { .. }
            | Self::Index(_)
            | Self::Density(_) => ErrorKind::Internal,
        }
    }

    /// Retrieve the inner [`DatasetErrorCode`] when the dataset was rejected.
    #[must_use]
    pub const fn dataset_code(&self) -> Option<DatasetErrorCode> {
        match self {
            Self::InvalidDataset(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, QuickShiftError>;
