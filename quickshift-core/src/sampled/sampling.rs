//! Sampling policies and the two-provenance sample they produce.

use std::collections::HashSet;

use rand::{Rng, rngs::SmallRng};

/// Maps a dataset size to a per-point inclusion probability.
///
/// The accelerator draws each point independently with the returned
/// probability, so the expected random sample size is `items * p`.
///
/// Any `Fn(usize) -> f64 + Send + Sync` closure is a policy:
///
/// ```
/// use quickshift_core::SamplingPolicy;
///
/// let tenth = |_: usize| 0.1;
/// assert_eq!(tenth.inclusion_probability(1_000), 0.1);
/// ```
pub trait SamplingPolicy: Send + Sync {
    /// Returns the inclusion probability for a dataset of `items` points.
    /// Values outside `[0, 1]` are rejected by the accelerator.
    fn inclusion_probability(&self, items: usize) -> f64;
}

impl<F> SamplingPolicy for F
where
    F: Fn(usize) -> f64 + Send + Sync,
{
    fn inclusion_probability(&self, items: usize) -> f64 {
        self(items)
    }
}

/// Default policy: `p = 1/√n`, giving an expected sample of `√n` points.
///
/// # Examples
/// ```
/// use quickshift_core::{SamplingPolicy, SqrtSampling};
///
/// assert_eq!(SqrtSampling.inclusion_probability(10_000), 0.01);
/// assert_eq!(SqrtSampling.inclusion_probability(1), 1.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SqrtSampling;

impl SamplingPolicy for SqrtSampling {
    #[expect(clippy::float_arithmetic, reason = "probability is 1/sqrt(n)")]
    #[expect(
        clippy::cast_precision_loss,
        reason = "dataset sizes stay far below 2^52"
    )]
    fn inclusion_probability(&self, items: usize) -> f64 {
        if items == 0 {
            return 0.0;
        }
        (1.0 / (items as f64).sqrt()).min(1.0)
    }
}

/// Policy returning the same probability for every dataset size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedProbability(pub f64);

impl SamplingPolicy for FixedProbability {
    #[rustfmt::skip]
    fn inclusion_probability(&self, _items: usize) -> f64 { self.0 }
}

/// How a point entered the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleOrigin {
    /// Drawn by the random sampling pass.
    Random,
    /// Added because it ranked among the densest points of the dataset.
    DensityAugmented,
}

/// A sample member and its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleMember {
    /// Position of the point in the full dataset.
    pub index: usize,
    /// Why the point was included.
    pub origin: SampleOrigin,
}

/// Subset of dataset indices used for the recursive clustering step.
///
/// Members keep their insertion order: random draws in ascending index
/// order, then augmented points in descending density order. A point is a
/// member at most once regardless of origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sample {
    members: Vec<SampleMember>,
    membership: HashSet<usize>,
}

impl Sample {
    /// Draws every index in `0..items` independently with `probability`.
    ///
    /// `probability` must lie in `[0, 1]`.
    pub(crate) fn draw(items: usize, probability: f64, rng: &mut SmallRng) -> Self {
        let mut sample = Self::default();
        for index in 0..items {
            if rng.gen_bool(probability) {
                sample.insert(index, SampleOrigin::Random);
            }
        }
        sample
    }

    /// Walks the first `budget` entries of `ranking` and adds each one that
    /// is not already a member. Returns the number of points added.
    pub(crate) fn augment(&mut self, ranking: &[usize], budget: usize) -> usize {
        ranking
            .iter()
            .take(budget)
            .filter(|&&index| self.insert(index, SampleOrigin::DensityAugmented))
            .count()
    }

    fn insert(&mut self, index: usize, origin: SampleOrigin) -> bool {
        let added = self.membership.insert(index);
        if added {
            self.members.push(SampleMember { index, origin });
        }
        added
    }

    /// Returns the number of members.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.members.len() }

    /// Returns whether the sample is empty.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    /// Returns whether `index` is a member.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.membership.contains(&index)
    }

    /// Returns members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[SampleMember] {
        &self.members
    }

    /// Returns member indices in insertion order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.members.iter().map(|member| member.index).collect()
    }

    /// Counts members with the given origin.
    #[must_use]
    pub fn count_origin(&self, origin: SampleOrigin) -> usize {
        self.members
            .iter()
            .filter(|member| member.origin == origin)
            .count()
    }
}

/// Orders point indices by descending density, breaking ties by the lower
/// index.
pub(crate) fn density_ranking(densities: &[f32]) -> Vec<usize> {
    let mut ranking: Vec<usize> = (0..densities.len()).collect();
    ranking.sort_by(|&left, &right| {
        let left_density = densities.get(left).copied().unwrap_or_default();
        let right_density = densities.get(right).copied().unwrap_or_default();
        right_density
            .total_cmp(&left_density)
            .then(left.cmp(&right))
    });
    ranking
}

/// Returns `⌈√items⌉`.
pub(crate) const fn ceil_sqrt(items: usize) -> usize {
    let root = items.isqrt();
    if root * root == items { root } else { root + 1 }
}
