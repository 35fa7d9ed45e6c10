//! Builder utilities for configuring QuickShift runs.
//!
//! Exposes the strategy and neighbourhood selection surface and the builder
//! validation used before constructing [`QuickShift`] instances.

use std::{num::NonZeroUsize, sync::Arc};

use crate::{
    Result,
    error::QuickShiftError,
    quickshift::QuickShift,
    sampled::{ExtensionFallback, ExtensionRule, SamplingConfig, SamplingPolicy},
};

/// Dataset size at which [`ClusteringStrategy::Auto`] switches to the
/// sampled path.
///
/// Sits well above the default two-blob dataset (10 000 points), which the
/// exact path separates and the sampled path does not.
pub const DEFAULT_SCALED_THRESHOLD: usize = 50_000;

/// Selects which clustering path [`QuickShift::run`] takes.
///
/// # Examples
/// ```
/// use quickshift_core::ClusteringStrategy;
///
/// let strategy = ClusteringStrategy::default();
/// assert!(matches!(strategy, ClusteringStrategy::Auto));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusteringStrategy {
    /// Use the sampled path once the dataset reaches the scaled threshold.
    #[default]
    Auto,
    /// Always run exact mode seeking over every point.
    Exact,
    /// Always cluster a sample and extend its labels.
    Scaled,
}

/// Neighbourhood size used to link points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighbourhoodSize {
    /// `round(√n · log₂ n)`, clamped to `[1, n - 1]`.
    #[default]
    Auto,
    /// A fixed number of neighbours.
    Fixed(NonZeroUsize),
}

impl NeighbourhoodSize {
    /// Resolves the neighbourhood for a dataset of `items` points.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::NeighbourhoodSize;
    ///
    /// assert_eq!(NeighbourhoodSize::Auto.resolve(10_000), 1_329);
    /// assert_eq!(NeighbourhoodSize::Auto.resolve(4), 3);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "sqrt(n) * log2(n)")]
    #[expect(
        clippy::cast_precision_loss,
        reason = "dataset sizes stay far below 2^52"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "the product is non-negative and clamped below n"
    )]
    pub fn resolve(self, items: usize) -> usize {
        match self {
            Self::Fixed(neighbours) => neighbours.get(),
            Self::Auto => {
                if items <= 1 {
                    return 1;
                }
                let size = items as f64;
                let neighbours = (size.sqrt() * size.log2()).round() as usize;
                neighbours.clamp(1, items - 1)
            }
        }
    }
}

/// Configures and constructs [`QuickShift`] instances.
///
/// # Examples
/// ```
/// use quickshift_core::{ClusteringStrategy, QuickShiftBuilder};
///
/// let quickshift = QuickShiftBuilder::new()
///     .with_neighbours(8)
///     .with_strategy(ClusteringStrategy::Exact)
///     .build()?;
/// assert_eq!(quickshift.strategy(), ClusteringStrategy::Exact);
/// # Ok::<(), quickshift_core::QuickShiftError>(())
/// ```
#[derive(Debug, Clone)]
pub struct QuickShiftBuilder {
    neighbours: Option<usize>,
    strategy: ClusteringStrategy,
    scaled_threshold: usize,
    sampling: SamplingConfig,
}

impl Default for QuickShiftBuilder {
    fn default() -> Self {
        Self {
            neighbours: None,
            strategy: ClusteringStrategy::Auto,
            scaled_threshold: DEFAULT_SCALED_THRESHOLD,
            sampling: SamplingConfig::default(),
        }
    }
}

impl QuickShiftBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::{ClusteringStrategy, QuickShiftBuilder};
    ///
    /// let builder = QuickShiftBuilder::new();
    /// assert_eq!(builder.neighbours(), None);
    /// assert_eq!(builder.strategy(), ClusteringStrategy::Auto);
    /// assert_eq!(builder.scaled_threshold(), 50_000);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the neighbourhood size instead of deriving it from the dataset.
    #[must_use]
    pub const fn with_neighbours(mut self, neighbours: usize) -> Self {
        self.neighbours = Some(neighbours);
        self
    }

    /// Restores the dataset-derived neighbourhood size.
    #[must_use]
    pub const fn with_auto_neighbours(mut self) -> Self {
        self.neighbours = None;
        self
    }

    /// Returns the fixed neighbourhood size, if any.
    #[must_use]
    pub const fn neighbours(&self) -> Option<usize> {
        self.neighbours
    }

    /// Sets the clustering strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ClusteringStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the configured clustering strategy.
    #[must_use]
    pub const fn strategy(&self) -> ClusteringStrategy {
        self.strategy
    }

    /// Sets the dataset size from which [`ClusteringStrategy::Auto`] uses the
    /// sampled path.
    #[must_use]
    pub const fn with_scaled_threshold(mut self, threshold: usize) -> Self {
        self.scaled_threshold = threshold;
        self
    }

    /// Returns the configured scaled threshold.
    #[must_use]
    pub const fn scaled_threshold(&self) -> usize {
        self.scaled_threshold
    }

    /// Replaces the sampling policy of the scaled path.
    #[must_use]
    pub fn with_sampling_policy<P>(mut self, policy: P) -> Self
    where
        P: SamplingPolicy + 'static,
    {
        self.sampling = self.sampling.with_shared_policy(Arc::new(policy));
        self
    }

    /// Sets the seed of the scaled path's random sampling pass.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.sampling = self.sampling.with_seed(seed);
        self
    }

    /// Sets how unsampled points pick the sample neighbour they inherit from.
    #[must_use]
    pub fn with_extension_rule(mut self, rule: ExtensionRule) -> Self {
        self.sampling = self.sampling.with_extension_rule(rule);
        self
    }

    /// Sets the behaviour when an unsampled point has no denser sample
    /// neighbour.
    #[must_use]
    pub fn with_extension_fallback(mut self, fallback: ExtensionFallback) -> Self {
        self.sampling = self.sampling.with_extension_fallback(fallback);
        self
    }

    /// Returns the sampling options of the scaled path.
    #[must_use]
    pub const fn sampling(&self) -> &SamplingConfig {
        &self.sampling
    }

    /// Validates the configuration and constructs a [`QuickShift`] instance.
    ///
    /// # Errors
    /// Returns [`QuickShiftError::ZeroNeighbourhood`] for a fixed neighbourhood
    /// of zero and [`QuickShiftError::InvalidScaledThreshold`] for a zero
    /// threshold.
    pub fn build(self) -> Result<QuickShift> {
        let neighbours = match self.neighbours {
            None => NeighbourhoodSize::Auto,
            Some(fixed) => NeighbourhoodSize::Fixed(
                NonZeroUsize::new(fixed).ok_or(QuickShiftError::ZeroNeighbourhood)?,
            ),
        };
        let scaled_threshold = NonZeroUsize::new(self.scaled_threshold)
            .ok_or(QuickShiftError::InvalidScaledThreshold)?;

        Ok(QuickShift::new(
            neighbours,
            self.strategy,
            scaled_threshold,
            self.sampling,
        ))
    }
}
