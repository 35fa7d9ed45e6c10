//! Result types for clustering operations.
//!
//! Provides structures to represent clustering results including cluster
//! assignments and validation of cluster identifier constraints.

use std::collections::HashSet;
use thiserror::Error;

/// Represents the output of a [`crate::QuickShift::run`] invocation.
///
/// # Examples
/// ```
/// use quickshift_core::ClusteringResult;
///
/// let result = ClusteringResult::from_labels(vec![0, 1, 0])?;
/// assert_eq!(result.assignments().len(), 3);
/// assert_eq!(result.cluster_count(), 2);
/// # Ok::<(), quickshift_core::NonContiguousClusterIds>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    assignments: Vec<ClusterId>,
    cluster_count: usize,
}

/// Error returned when cluster identifiers are not contiguous starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NonContiguousClusterIds {
    /// The assignments do not include cluster `0`.
    #[error("cluster identifiers must include 0")]
    MissingZero,
    /// The assignments skip identifiers.
    #[error("cluster identifiers must be contiguous without gaps")]
    Gap,
    /// The assignments contain duplicates that mask missing identifiers.
    #[error("cluster identifiers must not repeat identifiers")]
    Duplicate,
    /// The assignments require identifiers beyond the host pointer width.
    #[error("cluster identifiers exceed or reach the host pointer-width limit")]
    Overflow,
}

impl ClusteringResult {
    /// Builds a result from plain per-point labels.
    ///
    /// # Errors
    /// Returns the same errors as [`Self::try_from_assignments`].
    pub fn from_labels(labels: Vec<usize>) -> Result<Self, NonContiguousClusterIds> {
        let assignments = labels
            .into_iter()
            .map(|label| {
                u64::try_from(label)
                    .map(ClusterId::new)
                    .map_err(|_| NonContiguousClusterIds::Overflow)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from_assignments(assignments)
    }

    /// Attempts to build a result from cluster assignments.
    ///
    /// The assignments must be contiguous starting at zero. An empty
    /// `assignments` vector is accepted and yields `cluster_count == 0`.
    ///
    /// # Errors
    /// Returns [`NonContiguousClusterIds::MissingZero`] when the assignments omit
    /// cluster `0`, [`NonContiguousClusterIds::Gap`] when identifiers skip values,
    /// [`NonContiguousClusterIds::Duplicate`] when duplicates hide missing identifiers,
    /// and [`NonContiguousClusterIds::Overflow`] when identifiers exceed the host
    /// pointer width.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::{ClusteringResult, ClusterId, NonContiguousClusterIds};
    ///
    /// let gap = ClusteringResult::try_from_assignments(vec![ClusterId::new(0), ClusterId::new(2)]);
    /// assert_eq!(gap, Err(NonContiguousClusterIds::Gap));
    /// ```
    pub fn try_from_assignments(
        assignments: Vec<ClusterId>,
    ) -> Result<Self, NonContiguousClusterIds> {
        if assignments.is_empty() {
            return Ok(Self {
                assignments,
                cluster_count: 0,
            });
        }

        let mut seen = HashSet::new();
        let mut max_id = 0_usize;
        let mut has_duplicate = false;

        for id in &assignments {
            let value = usize::try_from(id.get())
                .ok()
                .filter(|&value| value < usize::MAX)
                .ok_or(NonContiguousClusterIds::Overflow)?;
            if !seen.insert(value) {
                has_duplicate = true;
            }
            max_id = max_id.max(value);
        }

        if !seen.contains(&0) {
            return Err(NonContiguousClusterIds::MissingZero);
        }

        if seen.len() != max_id + 1 {
            return Err(if has_duplicate {
                NonContiguousClusterIds::Duplicate
            } else {
                NonContiguousClusterIds::Gap
            });
        }

        Ok(Self {
            assignments,
            cluster_count: seen.len(),
        })
    }

    /// Returns the assignments in point order.
    #[must_use]
    pub fn assignments(&self) -> &[ClusterId] {
        &self.assignments
    }

    /// Counts how many distinct clusters exist within the assignments.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the number of points assigned to each cluster, indexed by id.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::ClusteringResult;
    ///
    /// let result = ClusteringResult::from_labels(vec![1, 0, 1, 1])?;
    /// assert_eq!(result.cluster_sizes(), vec![1, 3]);
    /// # Ok::<(), quickshift_core::NonContiguousClusterIds>(())
    /// ```
    #[must_use]
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.cluster_count];
        for id in &self.assignments {
            if let Some(size) = usize::try_from(id.get())
                .ok()
                .and_then(|index| sizes.get_mut(index))
            {
                *size += 1;
            }
        }
        sizes
    }

    /// Reports whether `other` groups the points identically, ignoring how
    /// the clusters are numbered.
    ///
    /// # Examples
    /// ```
    /// use quickshift_core::ClusteringResult;
    ///
    /// let left = ClusteringResult::from_labels(vec![0, 0, 1, 2])?;
    /// let renamed = ClusteringResult::from_labels(vec![2, 2, 0, 1])?;
    /// let merged = ClusteringResult::from_labels(vec![0, 0, 1, 1])?;
    /// assert!(left.same_partition(&renamed));
    /// assert!(!left.same_partition(&merged));
    /// # Ok::<(), quickshift_core::NonContiguousClusterIds>(())
    /// ```
    #[must_use]
    pub fn same_partition(&self, other: &Self) -> bool {
        if self.assignments.len() != other.assignments.len()
            || self.cluster_count != other.cluster_count
        {
            return false;
        }
        // With equal cluster counts a consistent mapping is also a bijection.
        let mut mapping: Vec<Option<ClusterId>> = vec![None; self.cluster_count];
        self.assignments
            .iter()
            .zip(&other.assignments)
            .all(|(mine, theirs)| {
                let Some(slot) = usize::try_from(mine.get())
                    .ok()
                    .and_then(|index| mapping.get_mut(index))
                else {
                    return false;
                };
                *slot.get_or_insert(*theirs) == *theirs
            })
    }
}

/// Identifier assigned to a cluster.
///
/// # Examples
/// ```
/// use quickshift_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}
