//! Benchmark parameter labels.

use std::fmt;

/// Parameters identifying one clustering benchmark input.
#[derive(Clone, Copy, Debug)]
pub struct ClusteringBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Neighbourhood size used to link points.
    pub neighbours: usize,
}

impl fmt::Display for ClusteringBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.point_count, self.neighbours)
    }
}
