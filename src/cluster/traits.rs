//! Clustering traits.

use crate::error::Result;

/// Trait for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model to data and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    ///
    /// Algorithms that choose the count themselves return 0; read the count
    /// off the labels after fitting.
    fn n_clusters(&self) -> usize;
}
