//! Exact QuickShift mode seeking.
//!
//! Every point links to the densest of its `k` nearest neighbours when that
//! neighbour is strictly denser than the point itself; otherwise the point is
//! a root. Following the links ends at a local density mode, and points that
//! share a mode share a cluster.

mod forest;

pub use self::forest::ParentForest;

use tracing::{Span, debug, field, instrument};

use crate::{
    Dataset, Result,
    density::{DensityEstimator, DensityModel, KnnDensity},
    error::{DatasetError, QuickShiftError},
    index::{FlatIndexBuilder, IndexBuilder, Neighbour, NeighbourIndex},
    parallel::try_map_range,
};

/// Produces flat cluster labels for a dataset with a given neighbourhood.
///
/// The sampled accelerator clusters its sample through this seam, so tests
/// can substitute a recording or failing implementation.
pub trait ExactClusterer: Send + Sync {
    /// Returns one label per point of `dataset`, numbered from zero in order
    /// of first appearance.
    ///
    /// # Errors
    /// Returns a [`QuickShiftError`] when the dataset or neighbourhood is
    /// rejected or a collaborator fails.
    fn cluster_exact(&self, dataset: &Dataset, neighbours: usize) -> Result<Vec<usize>>;
}

impl<F> ExactClusterer for F
where
    F: Fn(&Dataset, usize) -> Result<Vec<usize>> + Send + Sync,
{
    fn cluster_exact(&self, dataset: &Dataset, neighbours: usize) -> Result<Vec<usize>> {
        self(dataset, neighbours)
    }
}

/// Exact mode-seeking assigner.
///
/// Densities are estimated with twice the linking neighbourhood so each
/// point's density reflects a slightly wider region than the neighbours it
/// may link to.
///
/// # Examples
/// ```
/// use quickshift_core::{Dataset, ModeSeeker};
///
/// let star = |x: f32| vec![
///     vec![x, 0.0],
///     vec![x + 1.0, 0.0],
///     vec![x, 1.0],
///     vec![x - 1.0, 0.0],
/// ];
/// let dataset = Dataset::from_rows("stars", [star(0.0), star(50.0)].concat())?;
/// let labels = ModeSeeker::new().assign(&dataset, 2)?;
/// assert_eq!(labels, [0, 0, 0, 0, 1, 1, 1, 1]);
/// # Ok::<(), quickshift_core::QuickShiftError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ModeSeeker<B = FlatIndexBuilder, E = KnnDensity> {
    index_builder: B,
    estimator: E,
}

impl ModeSeeker {
    /// Creates an assigner using exact neighbour search and k-NN densities.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            index_builder: FlatIndexBuilder,
            estimator: KnnDensity::new(),
        }
    }
}

impl<B, E> ModeSeeker<B, E>
where
    B: IndexBuilder,
    E: DensityEstimator,
{
    /// Creates an assigner with explicit collaborators.
    #[must_use]
    pub const fn with_collaborators(index_builder: B, estimator: E) -> Self {
        Self {
            index_builder,
            estimator,
        }
    }

    /// Returns the neighbour index builder.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index_builder(&self) -> &B { &self.index_builder }

    /// Returns the density estimator.
    #[must_use]
    #[rustfmt::skip]
    pub const fn estimator(&self) -> &E { &self.estimator }

    /// Clusters `dataset`, linking each point within its `neighbours`
    /// nearest points.
    ///
    /// # Errors
    /// Returns [`QuickShiftError::InvalidDataset`] for an empty dataset,
    /// [`QuickShiftError::ZeroNeighbourhood`] when `neighbours` is zero and
    /// [`QuickShiftError::NeighbourhoodTooLarge`] unless
    /// `neighbours < dataset.len()`. Collaborator failures are wrapped.
    #[instrument(
        name = "core.assign",
        err,
        skip(self, dataset),
        fields(
            data_source = %dataset.name(),
            items = dataset.len(),
            neighbours = neighbours,
            clusters = field::Empty,
        ),
    )]
    pub fn assign(&self, dataset: &Dataset, neighbours: usize) -> Result<Vec<usize>> {
        validate_neighbourhood(dataset.len(), neighbours)?;
        let model = self.estimator.fit(dataset)?;
        let density_neighbourhood = neighbours.saturating_mul(2);
        let densities = try_map_range(dataset.len(), |point| {
            let row = dataset.row(point)?;
            Ok::<_, QuickShiftError>(model.density(row, density_neighbourhood)?)
        })?;
        debug!(density_neighbourhood, "estimated point densities");

        let labels = self.link_and_resolve(dataset, neighbours, &densities)?;
        Span::current().record("clusters", count_labels(&labels));
        Ok(labels)
    }

    /// Clusters `dataset` with caller-supplied densities.
    ///
    /// # Errors
    /// Returns the same validation errors as [`ModeSeeker::assign`], plus
    /// [`QuickShiftError::DensityLengthMismatch`] and
    /// [`QuickShiftError::InvalidDensity`] when `densities` does not hold one
    /// finite, non-negative value per point.
    pub fn assign_with_densities(
        &self,
        dataset: &Dataset,
        neighbours: usize,
        densities: &[f32],
    ) -> Result<Vec<usize>> {
        validate_neighbourhood(dataset.len(), neighbours)?;
        validate_densities(dataset.len(), densities)?;
        self.link_and_resolve(dataset, neighbours, densities)
    }

    /// Builds the unresolved parent forest for `dataset` and `densities`.
    ///
    /// # Errors
    /// Returns the same errors as [`ModeSeeker::assign_with_densities`].
    pub fn parent_forest(
        &self,
        dataset: &Dataset,
        neighbours: usize,
        densities: &[f32],
    ) -> Result<ParentForest> {
        validate_neighbourhood(dataset.len(), neighbours)?;
        validate_densities(dataset.len(), densities)?;
        self.link_parents(dataset, neighbours, densities)
    }

    fn link_and_resolve(
        &self,
        dataset: &Dataset,
        neighbours: usize,
        densities: &[f32],
    ) -> Result<Vec<usize>> {
        let mut forest = self.link_parents(dataset, neighbours, densities)?;
        debug!(roots = forest.roots().count(), "linked parent forest");
        forest.resolve_labels()
    }

    fn link_parents(
        &self,
        dataset: &Dataset,
        neighbours: usize,
        densities: &[f32],
    ) -> Result<ParentForest> {
        let index = self.index_builder.build(dataset)?;
        let parents = try_map_range(dataset.len(), |point| {
            let row = dataset.row(point)?;
            let found = index.search(row, neighbours)?;
            Ok::<_, QuickShiftError>(densest_ascent(point, &found, densities))
        })?;
        ParentForest::from_parents(parents)
    }
}

impl<B, E> ExactClusterer for ModeSeeker<B, E>
where
    B: IndexBuilder,
    E: DensityEstimator,
{
    fn cluster_exact(&self, dataset: &Dataset, neighbours: usize) -> Result<Vec<usize>> {
        self.assign(dataset, neighbours)
    }
}

/// Picks the neighbour with the highest density strictly above the point's
/// own. Ties keep the earlier, closer neighbour.
fn densest_ascent(point: usize, neighbours: &[Neighbour], densities: &[f32]) -> usize {
    let mut parent = point;
    let mut best = densities.get(point).copied().unwrap_or(f32::INFINITY);
    for neighbour in neighbours {
        if let Some(&density) = densities.get(neighbour.id)
            && density > best
        {
            best = density;
            parent = neighbour.id;
        }
    }
    parent
}

pub(crate) fn validate_neighbourhood(items: usize, neighbours: usize) -> Result<()> {
    if items == 0 {
        return Err(DatasetError::Empty.into());
    }
    if neighbours == 0 {
        return Err(QuickShiftError::ZeroNeighbourhood);
    }
    if neighbours >= items {
        return Err(QuickShiftError::NeighbourhoodTooLarge { neighbours, items });
    }
    Ok(())
}

fn validate_densities(items: usize, densities: &[f32]) -> Result<()> {
    if densities.len() != items {
        return Err(QuickShiftError::DensityLengthMismatch {
            expected: items,
            actual: densities.len(),
        });
    }
    match densities
        .iter()
        .enumerate()
        .find(|&(_, value)| !value.is_finite() || *value < 0.0)
    {
        Some((point, &value)) => Err(QuickShiftError::InvalidDensity { point, value }),
        None => Ok(()),
    }
}

pub(crate) fn count_labels(labels: &[usize]) -> usize {
    labels.iter().max().map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests;
