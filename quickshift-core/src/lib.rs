//! QuickShift core library.
//!
//! Density-based mode-seeking clustering over dense `f32` vectors. The exact
//! path ([`ModeSeeker`]) links every point to its densest nearby neighbour
//! and labels each resulting tree; the sampled path ([`SampledAccelerator`])
//! clusters a density-augmented sample of about `2√n` points and extends the
//! labels to the rest.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod dataset;
mod density;
mod distance;
mod error;
mod index;
mod mode_seek;
mod parallel;
mod quickshift;
mod result;
mod sampled;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{
        ClusteringStrategy, DEFAULT_SCALED_THRESHOLD, NeighbourhoodSize, QuickShiftBuilder,
    },
    dataset::Dataset,
    density::{
        DensityError, DensityErrorCode, DensityEstimator, DensityModel, KnnDensity,
        KnnDensityModel,
    },
    error::{
        DatasetError, DatasetErrorCode, ErrorKind, QuickShiftError, QuickShiftErrorCode, Result,
    },
    index::{
        FlatIndex, FlatIndexBuilder, IndexBuilder, IndexError, IndexErrorCode, Neighbour,
        NeighbourIndex,
    },
    mode_seek::{ExactClusterer, ModeSeeker, ParentForest},
    quickshift::{QuickShift, cluster_exact, cluster_scaled},
    result::{ClusterId, ClusteringResult, NonContiguousClusterIds},
    sampled::{
        DEFAULT_SAMPLING_SEED, ExtensionFallback, ExtensionRule, FixedProbability, Sample,
        SampleMember, SampleOrigin, SampledAccelerator, SamplingConfig, SamplingPolicy,
        ScaledAssignment, SqrtSampling,
    },
};
