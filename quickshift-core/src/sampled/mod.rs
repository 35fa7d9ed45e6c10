//! Sampled QuickShift for large datasets.
//!
//! The accelerator clusters a small sample with an [`ExactClusterer`] and
//! extends the resulting labels to every other point:
//!
//! 1. draw a random sample with an expected size of about `√n`;
//! 2. fit a density model on that sample, score every point, and add the
//!    `⌈√n⌉` densest points that are missing so every strong mode is present;
//! 3. cluster the `m` sampled points with neighbourhood `round(√m · ln m)`;
//! 4. give each unsampled point the label of a denser sample neighbour.

mod extension;
mod sampling;

pub use self::{
    extension::{ExtensionFallback, ExtensionRule},
    sampling::{
        FixedProbability, Sample, SampleMember, SampleOrigin, SamplingPolicy, SqrtSampling,
    },
};

use std::{collections::HashMap, fmt, sync::Arc};

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{Span, debug, field, info, instrument};

use self::{
    extension::Candidates,
    sampling::{ceil_sqrt, density_ranking},
};
use crate::{
    Dataset, Result,
    density::{DensityEstimator, DensityModel, KnnDensity},
    error::QuickShiftError,
    index::{FlatIndexBuilder, IndexBuilder, NeighbourIndex},
    mode_seek::{ExactClusterer, count_labels, validate_neighbourhood},
    parallel::{try_map_range, try_map_slice},
};

/// Seed used for the random sampling pass unless overridden.
pub const DEFAULT_SAMPLING_SEED: u64 = 0x5EED_CAFE;

/// Sampling and extension options for [`SampledAccelerator`].
///
/// # Examples
/// ```
/// use quickshift_core::{ExtensionFallback, FixedProbability, SamplingConfig};
///
/// let config = SamplingConfig::default()
///     .with_policy(FixedProbability(0.25))
///     .with_seed(42)
///     .with_extension_fallback(ExtensionFallback::NearestSample);
/// assert_eq!(config.seed(), 42);
/// assert_eq!(config.policy().inclusion_probability(100), 0.25);
/// ```
#[derive(Clone)]
pub struct SamplingConfig {
    policy: Arc<dyn SamplingPolicy>,
    seed: u64,
    extension_rule: ExtensionRule,
    extension_fallback: ExtensionFallback,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            policy: Arc::new(SqrtSampling),
            seed: DEFAULT_SAMPLING_SEED,
            extension_rule: ExtensionRule::default(),
            extension_fallback: ExtensionFallback::default(),
        }
    }
}

impl fmt::Debug for SamplingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplingConfig")
            .field("seed", &self.seed)
            .field("extension_rule", &self.extension_rule)
            .field("extension_fallback", &self.extension_fallback)
            .finish_non_exhaustive()
    }
}

impl SamplingConfig {
    /// Replaces the sampling policy.
    #[must_use]
    pub fn with_policy<P>(mut self, policy: P) -> Self
    where
        P: SamplingPolicy + 'static,
    {
        self.policy = Arc::new(policy);
        self
    }

    /// Replaces the sampling policy with a shared one.
    #[must_use]
    pub fn with_shared_policy(mut self, policy: Arc<dyn SamplingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the seed for the random sampling pass.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the extension criterion.
    #[must_use]
    pub const fn with_extension_rule(mut self, rule: ExtensionRule) -> Self {
        self.extension_rule = rule;
        self
    }

    /// Sets the behaviour when no denser sample neighbour exists.
    #[must_use]
    pub const fn with_extension_fallback(mut self, fallback: ExtensionFallback) -> Self {
        self.extension_fallback = fallback;
        self
    }

    /// Returns the sampling policy.
    #[must_use]
    pub fn policy(&self) -> &dyn SamplingPolicy {
        self.policy.as_ref()
    }

    /// Returns the sampling seed.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Returns the extension criterion.
    #[must_use]
    #[rustfmt::skip]
    pub const fn extension_rule(&self) -> ExtensionRule { self.extension_rule }

    /// Returns the extension fallback.
    #[must_use]
    #[rustfmt::skip]
    pub const fn extension_fallback(&self) -> ExtensionFallback { self.extension_fallback }
}

/// Output of [`SampledAccelerator::assign_large`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledAssignment {
    /// One label per dataset point, contiguous from 0 in order of first
    /// appearance.
    pub labels: Vec<usize>,
    /// Points clustered exactly, with provenance.
    pub sample: Sample,
    /// Density of every dataset point under the model fitted on the random
    /// sample.
    pub densities: Vec<f32>,
    /// Neighbourhood size used for the recursive clustering and extension.
    pub recursive_neighbours: usize,
}

/// Approximate QuickShift that clusters a sample and extends its labels.
///
/// # Examples
/// ```
/// use quickshift_core::{
///     Dataset, ExtensionFallback, ModeSeeker, SampledAccelerator, SamplingConfig,
/// };
///
/// let rows: Vec<Vec<f32>> = (0..200_u16)
///     .map(|i| {
///         let offset = if i % 2 == 0 { 0.0 } else { 100.0 };
///         vec![offset + f32::from(i % 10) * 0.1, f32::from(i / 10) * 0.1]
///     })
///     .collect();
/// let dataset = Dataset::from_rows("stripes", rows)?;
/// let accelerator = SampledAccelerator::new(ModeSeeker::new()).with_config(
///     SamplingConfig::default().with_extension_fallback(ExtensionFallback::NearestSample),
/// );
/// let outcome = accelerator.assign_large(&dataset, 10)?;
/// assert_eq!(outcome.labels.len(), 200);
/// assert!(outcome.sample.len() >= 15);
/// # Ok::<(), quickshift_core::QuickShiftError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SampledAccelerator<C, B = FlatIndexBuilder, E = KnnDensity> {
    exact: C,
    index_builder: B,
    estimator: E,
    config: SamplingConfig,
}

impl<C: ExactClusterer> SampledAccelerator<C> {
    /// Creates an accelerator with exact neighbour search and k-NN densities.
    #[must_use]
    pub fn new(exact: C) -> Self {
        Self::with_collaborators(exact, FlatIndexBuilder, KnnDensity::new())
    }
}

impl<C, B, E> SampledAccelerator<C, B, E>
where
    C: ExactClusterer,
    B: IndexBuilder,
    E: DensityEstimator,
{
    /// Creates an accelerator with explicit collaborators and default
    /// sampling options.
    #[must_use]
    pub fn with_collaborators(exact: C, index_builder: B, estimator: E) -> Self {
        Self {
            exact,
            index_builder,
            estimator,
            config: SamplingConfig::default(),
        }
    }

    /// Replaces the sampling options.
    #[must_use]
    pub fn with_config(mut self, config: SamplingConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the sampling options.
    #[must_use]
    #[rustfmt::skip]
    pub const fn config(&self) -> &SamplingConfig { &self.config }

    /// Clusters `dataset` through a density-augmented sample.
    ///
    /// `neighbours` is the neighbourhood used to score densities against the
    /// random sample; the recursive step derives its own neighbourhood from
    /// the final sample size. Whatever numbering the exact clusterer uses,
    /// the returned labels are renumbered to `0..c` by first appearance.
    ///
    /// # Errors
    /// Returns the input validation errors of [`crate::ModeSeeker::assign`],
    /// [`QuickShiftError::InvalidSamplingProbability`] when the policy yields
    /// a value outside `[0, 1]`, [`QuickShiftError::DegenerateSample`] when the
    /// sample cannot be clustered, and
    /// [`QuickShiftError::UnresolvedExtension`] when an unsampled point has no
    /// denser sample neighbour under [`ExtensionFallback::Fail`].
    #[instrument(
        name = "core.assign_large",
        err,
        skip(self, dataset),
        fields(
            data_source = %dataset.name(),
            items = dataset.len(),
            neighbours = neighbours,
            sample_size = field::Empty,
            clusters = field::Empty,
        ),
    )]
    pub fn assign_large(&self, dataset: &Dataset, neighbours: usize) -> Result<ScaledAssignment> {
        let items = dataset.len();
        validate_neighbourhood(items, neighbours)?;

        let probability = self.config.policy.inclusion_probability(items);
        if !(0.0..=1.0).contains(&probability) {
            return Err(QuickShiftError::InvalidSamplingProbability { items, probability });
        }
        let mut rng = SmallRng::seed_from_u64(self.config.seed);
        let mut sample = Sample::draw(items, probability, &mut rng);
        if sample.is_empty() {
            return Err(QuickShiftError::DegenerateSample {
                sample_size: 0,
                neighbours: 0,
            });
        }
        debug!(probability, random = sample.len(), "drew random sample");

        let random_points = dataset.select(sample_name(dataset, "random"), &sample.indices())?;
        let model = self.estimator.fit(&random_points)?;
        let densities = try_map_range(items, |point| {
            let row = dataset.row(point)?;
            Ok::<_, QuickShiftError>(model.density(row, neighbours)?)
        })?;
        let augmented = sample.augment(&density_ranking(&densities), ceil_sqrt(items));
        debug!(augmented, "augmented sample with densest points");

        let sample_size = sample.len();
        let recursive_neighbours = recursive_neighbourhood(sample_size);
        Span::current().record("sample_size", sample_size);
        if sample_size <= 1 || recursive_neighbours == 0 {
            return Err(QuickShiftError::DegenerateSample {
                sample_size,
                neighbours: recursive_neighbours,
            });
        }

        let sample_points = dataset.select(sample_name(dataset, "sample"), &sample.indices())?;
        let sample_labels = self
            .exact
            .cluster_exact(&sample_points, recursive_neighbours)?;
        if sample_labels.len() != sample_size {
            return Err(QuickShiftError::SampleLabelMismatch {
                expected: sample_size,
                actual: sample_labels.len(),
            });
        }

        let labels = renumber_labels(self.extend(
            dataset,
            &sample,
            &sample_points,
            &sample_labels,
            &densities,
            recursive_neighbours,
        )?);
        let clusters = count_labels(&labels);
        Span::current().record("clusters", clusters);
        info!(sample_size, recursive_neighbours, clusters, "scaled clustering complete");
        Ok(ScaledAssignment {
            labels,
            sample,
            densities,
            recursive_neighbours,
        })
    }

    #[instrument(
        name = "core.extend",
        err,
        skip_all,
        fields(
            sample_size = sample.len(),
            neighbours = neighbours,
            unsampled = field::Empty,
            fallbacks = field::Empty,
        ),
    )]
    fn extend(
        &self,
        dataset: &Dataset,
        sample: &Sample,
        sample_points: &Dataset,
        sample_labels: &[usize],
        densities: &[f32],
        neighbours: usize,
    ) -> Result<Vec<usize>> {
        let members = sample.indices();
        let mut labels: Vec<Option<usize>> = vec![None; dataset.len()];
        for (&index, &label) in members.iter().zip(sample_labels) {
            if let Some(slot) = labels.get_mut(index) {
                *slot = Some(label);
            }
        }

        let unsampled: Vec<usize> = (0..dataset.len())
            .filter(|&point| !sample.contains(point))
            .collect();
        Span::current().record("unsampled", unsampled.len());

        let index = self.index_builder.build(sample_points)?;
        let rule = self.config.extension_rule;
        let fallback = self.config.extension_fallback;
        let targets = try_map_slice(&unsampled, |&point| {
            let row = dataset.row(point)?;
            let found = index.search(row, neighbours)?;
            let candidates = Candidates {
                point,
                neighbours: &found,
                members: &members,
                densities,
            };
            candidates
                .select(rule, fallback)
                .ok_or(QuickShiftError::UnresolvedExtension {
                    point,
                    candidates: found.len(),
                })
        })?;

        let mut fallbacks = 0_usize;
        for (&point, target) in unsampled.iter().zip(&targets) {
            if target.fell_back {
                fallbacks += 1;
                debug!(
                    point,
                    sample_point = members.get(target.position).copied(),
                    "no denser sample neighbour; using nearest sample point"
                );
            }
            if let Some(slot) = labels.get_mut(point) {
                *slot = sample_labels.get(target.position).copied();
            }
        }
        Span::current().record("fallbacks", fallbacks);

        labels
            .into_iter()
            .enumerate()
            .map(|(point, label)| {
                label.ok_or(QuickShiftError::UnresolvedExtension {
                    point,
                    candidates: 0,
                })
            })
            .collect()
    }
}

/// Neighbourhood for the recursive step: `round(√m · ln m)`.
#[expect(clippy::float_arithmetic, reason = "sqrt(m) * ln(m)")]
#[expect(
    clippy::cast_precision_loss,
    reason = "sample sizes stay far below 2^52"
)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the product is non-negative and below m"
)]
pub(crate) fn recursive_neighbourhood(sample_size: usize) -> usize {
    if sample_size <= 1 {
        return 0;
    }
    let size = sample_size as f64;
    (size.sqrt() * size.ln()).round() as usize
}

/// Renames labels to `0..c` in the order they first appear.
pub(crate) fn renumber_labels(labels: Vec<usize>) -> Vec<usize> {
    let mut renamed = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            let next = renamed.len();
            *renamed.entry(label).or_insert(next)
        })
        .collect()
}

fn sample_name(dataset: &Dataset, suffix: &str) -> String {
    format!("{}-{suffix}", dataset.name())
}

#[cfg(test)]
mod tests;
