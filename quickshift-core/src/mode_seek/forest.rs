//! Parent-pointer forest built by density ascent.
//!
//! Every point points at the neighbour it would move towards to increase
//! density, or at itself when it is a local mode. Because density never
//! decreases along a chain, and strictly increases except at the root, every
//! chain ends at a root. Walks are still bounded by the point count so a
//! malformed forest reports an error instead of looping.

use crate::{Result, error::QuickShiftError};

/// Parent pointers over the points of one clustering run.
///
/// # Examples
/// ```
/// use quickshift_core::ParentForest;
///
/// // 0 -> 1 -> 2 (root), 3 is its own root.
/// let mut forest = ParentForest::from_parents(vec![1, 2, 2, 3])?;
/// assert_eq!(forest.roots().collect::<Vec<_>>(), [2, 3]);
/// assert_eq!(forest.resolve_labels()?, [0, 0, 0, 1]);
/// assert_eq!(forest.parent(0), Some(2));
/// # Ok::<(), quickshift_core::QuickShiftError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentForest {
    parents: Vec<usize>,
}

impl ParentForest {
    /// Wraps explicit parent pointers.
    ///
    /// # Errors
    /// Returns [`QuickShiftError::ParentOutOfBounds`] when a pointer does not
    /// reference a point of the forest.
    pub fn from_parents(parents: Vec<usize>) -> Result<Self> {
        let items = parents.len();
        if let Some((point, &parent)) = parents
            .iter()
            .enumerate()
            .find(|&(_, &parent)| parent >= items)
        {
            return Err(QuickShiftError::ParentOutOfBounds { point, parent });
        }
        Ok(Self { parents })
    }

    /// Returns the number of points in the forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.parents.len() }

    /// Returns whether the forest holds no points.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.parents.is_empty() }

    /// Returns the current parent of `point`.
    #[must_use]
    pub fn parent(&self, point: usize) -> Option<usize> {
        self.parents.get(point).copied()
    }

    /// Returns the parent pointers in point order.
    #[must_use]
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Iterates over the roots (points that are their own parent) in point
    /// order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(point, &parent)| (point == parent).then_some(point))
    }

    /// Follows parent pointers from `point` to its root without modifying
    /// the forest.
    ///
    /// # Errors
    /// Returns [`QuickShiftError::ParentCycle`] when no root is reached within
    /// `len()` steps, and [`QuickShiftError::ParentOutOfBounds`] when `point`
    /// is outside the forest.
    pub fn root_of(&self, point: usize) -> Result<usize> {
        self.walk(point).map(|(root, _)| root)
    }

    /// Assigns a cluster label to every point.
    ///
    /// Roots receive fresh labels in the order they are first reached while
    /// scanning points `0..len()`; every other point copies its root's label.
    /// Pointers are compressed along the way, so afterwards each point's
    /// parent is its root.
    ///
    /// # Errors
    /// Returns [`QuickShiftError::ParentCycle`] when a chain does not
    /// terminate.
    pub fn resolve_labels(&mut self) -> Result<Vec<usize>> {
        let items = self.parents.len();
        let mut root_labels: Vec<Option<usize>> = vec![None; items];
        let mut next_label = 0_usize;

        for point in 0..items {
            let root = self.find(point)?;
            if let Some(slot) = root_labels.get_mut(root)
                && slot.is_none()
            {
                *slot = Some(next_label);
                next_label += 1;
            }
        }

        let mut labels = Vec::with_capacity(items);
        for point in 0..items {
            let root = self.find(point)?;
            let label = root_labels
                .get(root)
                .copied()
                .flatten()
                .ok_or(QuickShiftError::ParentCycle {
                    point,
                    limit: items,
                })?;
            labels.push(label);
        }
        Ok(labels)
    }

    fn walk(&self, point: usize) -> Result<(usize, usize)> {
        let limit = self.parents.len();
        let mut current = point;
        let mut steps = 0_usize;
        loop {
            let parent = self
                .parent(current)
                .ok_or(QuickShiftError::ParentOutOfBounds {
                    point: current,
                    parent: current,
                })?;
            if parent == current {
                return Ok((current, steps));
            }
            steps += 1;
            if steps >= limit {
                return Err(QuickShiftError::ParentCycle { point, limit });
            }
            current = parent;
        }
    }

    fn find(&mut self, point: usize) -> Result<usize> {
        let (root, steps) = self.walk(point)?;
        if steps > 1 {
            let mut current = point;
            while current != root {
                let Some(slot) = self.parents.get_mut(current) else {
                    break;
                };
                current = std::mem::replace(slot, root);
            }
        }
        Ok(root)
    }
}
