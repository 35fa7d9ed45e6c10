//! Runtime entry point for QuickShift clustering.
//!
//! Provides the [`QuickShift`] runtime, which resolves the neighbourhood and
//! strategy for a dataset before dispatching to the exact or sampled path,
//! and the two one-shot convenience functions.

use std::num::NonZeroUsize;

use tracing::{Span, field, info, instrument};

use crate::{
    Dataset, Result,
    builder::{ClusteringStrategy, NeighbourhoodSize},
    mode_seek::ModeSeeker,
    result::ClusteringResult,
    sampled::{SampledAccelerator, SamplingConfig},
};

/// Configured QuickShift runtime.
///
/// # Examples
/// ```
/// use quickshift_core::{Dataset, QuickShiftBuilder};
///
/// let dataset = Dataset::from_rows(
///     "three",
///     vec![vec![0.0], vec![0.5], vec![3.0]],
/// )?;
/// let result = QuickShiftBuilder::new().with_neighbours(2).build()?.run(&dataset)?;
/// assert_eq!(result.assignments().len(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuickShift {
    neighbours: NeighbourhoodSize,
    strategy: ClusteringStrategy,
    scaled_threshold: NonZeroUsize,
    sampling: SamplingConfig,
}

impl QuickShift {
    pub(crate) const fn new(
        neighbours: NeighbourhoodSize,
        strategy: ClusteringStrategy,
        scaled_threshold: NonZeroUsize,
        sampling: SamplingConfig,
    ) -> Self {
        Self {
            neighbours,
            strategy,
            scaled_threshold,
            sampling,
        }
    }

    /// Returns the neighbourhood configuration.
    #[must_use]
    #[rustfmt::skip]
    pub const fn neighbours(&self) -> NeighbourhoodSize { self.neighbours }

    /// Returns the configured strategy.
    #[must_use]
    #[rustfmt::skip]
    pub const fn strategy(&self) -> ClusteringStrategy { self.strategy }

    /// Returns the dataset size from which `Auto` picks the sampled path.
    #[must_use]
    #[rustfmt::skip]
    pub const fn scaled_threshold(&self) -> NonZeroUsize { self.scaled_threshold }

    /// Returns the sampling options of the scaled path.
    #[must_use]
    #[rustfmt::skip]
    pub const fn sampling(&self) -> &SamplingConfig { &self.sampling }

    /// Returns the concrete path, [`ClusteringStrategy::Exact`] or
    /// [`ClusteringStrategy::Scaled`], used for a dataset of `items` points.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::{ClusteringStrategy, QuickShiftBuilder};
    ///
    /// let quickshift = QuickShiftBuilder::new().with_scaled_threshold(100).build()?;
    /// assert_eq!(quickshift.strategy_for(99), ClusteringStrategy::Exact);
    /// assert_eq!(quickshift.strategy_for(100), ClusteringStrategy::Scaled);
    /// # Ok::<(), quickshift_core::QuickShiftError>(())
    /// ```
    #[must_use]
    pub const fn strategy_for(&self, items: usize) -> ClusteringStrategy {
        match self.strategy {
            ClusteringStrategy::Auto if items >= self.scaled_threshold.get() => {
                ClusteringStrategy::Scaled
            }
            ClusteringStrategy::Auto | ClusteringStrategy::Exact => ClusteringStrategy::Exact,
            ClusteringStrategy::Scaled => ClusteringStrategy::Scaled,
        }
    }

    /// Clusters `dataset`.
    ///
    /// # Errors
    /// Returns any error raised by [`ModeSeeker::assign`] or
    /// [`SampledAccelerator::assign_large`], for example when the resolved
    /// neighbourhood is not smaller than the dataset.
    #[instrument(
        name = "core.run",
        err,
        skip(self, dataset),
        fields(
            data_source = %dataset.name(),
            items = dataset.len(),
            strategy = ?self.strategy,
            neighbours = field::Empty,
            clusters = field::Empty,
        ),
    )]
    pub fn run(&self, dataset: &Dataset) -> Result<ClusteringResult> {
        let items = dataset.len();
        let neighbours = self.neighbours.resolve(items);
        Span::current().record("neighbours", neighbours);

        let path = self.strategy_for(items);
        let labels = match path {
            ClusteringStrategy::Scaled => {
                SampledAccelerator::new(ModeSeeker::new())
                    .with_config(self.sampling.clone())
                    .assign_large(dataset, neighbours)?
                    .labels
            }
            ClusteringStrategy::Auto | ClusteringStrategy::Exact => {
                ModeSeeker::new().assign(dataset, neighbours)?
            }
        };
        let result = ClusteringResult::from_labels(labels)?;
        Span::current().record("clusters", result.cluster_count());
        info!(
            path = ?path,
            clusters = result.cluster_count(),
            "clustering complete"
        );
        Ok(result)
    }
}

/// Clusters every point of `dataset` exactly with neighbourhood `neighbours`.
///
/// # Errors
/// Returns the errors of [`ModeSeeker::assign`].
///
/// # Examples
/// ```
/// use quickshift_core::{Dataset, cluster_exact};
///
/// let dataset = Dataset::from_rows("pair", vec![vec![0.0], vec![10.0]])?;
/// let result = cluster_exact(&dataset, 1)?;
/// assert_eq!(result.cluster_count(), 2);
/// # Ok::<(), quickshift_core::QuickShiftError>(())
/// ```
pub fn cluster_exact(dataset: &Dataset, neighbours: usize) -> Result<ClusteringResult> {
    let labels = ModeSeeker::new().assign(dataset, neighbours)?;
    Ok(ClusteringResult::from_labels(labels)?)
}

/// Clusters `dataset` through a density-augmented sample with default
/// sampling options.
///
/// # Errors
/// Returns the errors of [`SampledAccelerator::assign_large`].
pub fn cluster_scaled(dataset: &Dataset, neighbours: usize) -> Result<ClusteringResult> {
    let labels = SampledAccelerator::new(ModeSeeker::new())
        .assign_large(dataset, neighbours)?
        .labels;
    Ok(ClusteringResult::from_labels(labels)?)
}
