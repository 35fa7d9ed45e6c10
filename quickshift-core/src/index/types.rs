//! Search result types with deterministic ordering semantics.

use std::cmp::Ordering;

/// Point discovered during a search, including its distance from the query.
///
/// Neighbours order by distance first and id second, so equally distant
/// points always come back in the same order.
///
/// # Examples
/// ```
/// use quickshift_core::Neighbour;
///
/// let near = Neighbour { id: 7, distance: 0.5 };
/// let tie = Neighbour { id: 3, distance: 0.5 };
/// assert!(tie < near);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Position of the neighbour within the indexed dataset.
    pub id: usize,
    /// Euclidean distance between the query and [`Neighbour::id`].
    pub distance: f32,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
