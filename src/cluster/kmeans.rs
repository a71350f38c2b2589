//! K-means under cosine distance.
//!
//! Partitions documents into k clusters by Lloyd refinement, with cosine
//! distance in the assignment step and the plain arithmetic mean in the
//! update step.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids: k *distinct* rows, sampled without replacement
//!    from a generator seeded with the configured seed
//! 2. **Assign**: each row → centroid with the smallest cosine distance
//!    (ties → lowest cluster index)
//! 3. **Update**: each centroid → mean of its assigned rows
//! 4. Stop when no centroid changes (exact equality) or after `max_iter`
//!    assignment passes
//!
//! # Objective
//!
//! Each assignment pass records
//!
//! ```text
//! J = Σᵢ d(xᵢ, μ_label(i))²
//! ```
//!
//! in [`PartitionFit::objective_history`]. The mean is not the exact
//! minimiser of squared cosine distance, so `J` is a diagnostic rather than
//! a guaranteed-monotone quantity; on separable data it settles after a few
//! passes.
//!
//! # Empty Clusters
//!
//! A cluster that receives no rows keeps its previous centroid. Its label
//! stays valid and may be picked up again in a later pass. Nothing is
//! re-seeded, so the generator is consumed only by initialization.
//!
//! # Reproducibility
//!
//! The generator lives for one `fit` call. Same matrix, k and seed give the
//! same labels, with or without the `parallel` feature.

use super::traits::Clustering;
use crate::distance::{unit_distance, unit_rows, unit_vector, update_centroids};
use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;
use log::{debug, trace};
use ndarray::{Array2, ArrayView1};
use rand::prelude::*;
use rand::seq::index;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 100;

/// Default seed for centroid initialization.
pub const DEFAULT_SEED: u64 = 42;

/// K-means with cosine distance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CosineKmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum assignment passes.
    max_iter: usize,
    /// Seed for choosing the initial centroids.
    seed: u64,
}

/// How a k-means run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convergence {
    /// Centroids stopped changing after this many assignment passes.
    Converged {
        /// Passes performed.
        iterations: usize,
    },
    /// The iteration cap was reached first. The partition is still usable.
    IterationCap {
        /// Passes performed (equal to the cap).
        iterations: usize,
    },
}

impl Convergence {
    /// Number of assignment passes performed.
    pub fn iterations(&self) -> usize {
        match *self {
            Convergence::Converged { iterations } | Convergence::IterationCap { iterations } => {
                iterations
            }
        }
    }

    /// Whether the centroids stabilised.
    pub fn is_converged(&self) -> bool {
        matches!(self, Convergence::Converged { .. })
    }
}

/// Result of a single k-means run.
#[derive(Debug, Clone)]
pub struct PartitionFit {
    /// One label in `0..k` per row.
    pub labels: Vec<usize>,
    /// Centroids after the last update step, `k x d`.
    pub centroids: Array2<f64>,
    /// Rows per cluster in the final labeling. May contain zeros.
    pub cluster_sizes: Vec<usize>,
    /// Objective `J` after each assignment pass.
    pub objective_history: Vec<f64>,
    /// How the run ended.
    pub convergence: Convergence,
}

impl PartitionFit {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centroids.nrows()
    }

    /// Sum of squared cosine distances from rows to their centroids at the
    /// last assignment pass.
    pub fn inertia(&self) -> f64 {
        self.objective_history.last().copied().unwrap_or(0.0)
    }

    /// Assign a new vector to its nearest final centroid.
    pub fn assign(&self, point: ArrayView1<'_, f64>) -> Result<usize> {
        if point.len() != self.centroids.ncols() {
            return Err(Error::DimensionMismatch {
                expected: self.centroids.ncols(),
                found: point.len(),
            });
        }
        if let Some(col) = point.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFiniteValue { row: 0, col });
        }
        let units = unit_rows(&self.centroids);
        Ok(nearest(unit_vector(point).view(), &units).0)
    }
}

impl CosineKmeans {
    /// Create a new clusterer for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: DEFAULT_SEED,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Configured iteration cap.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Configured seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run k-means and return only the labels.
    pub fn partition(&self, matrix: &FeatureMatrix) -> Result<Vec<usize>> {
        self.fit(matrix).map(|fit| fit.labels)
    }

    /// Run k-means and return the full fit.
    pub fn fit(&self, matrix: &FeatureMatrix) -> Result<PartitionFit> {
        let n = matrix.nrows();
        if self.k <= 1 || self.k > n {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }

        let mut centroids = self.init_centroids(matrix);
        let mut labels = vec![0usize; n];
        let mut cluster_sizes = vec![0usize; self.k];
        let mut objective_history = Vec::new();
        let mut convergence = Convergence::IterationCap {
            iterations: self.max_iter,
        };

        for iter in 0..self.max_iter {
            let units = unit_rows(&centroids);
            let assigned = assign_rows(matrix, &units);

            let mut objective = 0.0;
            for (label, (best, dist)) in labels.iter_mut().zip(assigned) {
                *label = best;
                objective += dist * dist;
            }
            objective_history.push(objective);

            let (new_centroids, counts) = update_centroids(matrix, &labels, &centroids);
            cluster_sizes = counts;
            trace!(
                "cosine k-means k={} iter={} objective={:.6} sizes={:?}",
                self.k,
                iter + 1,
                objective,
                cluster_sizes
            );

            if new_centroids == centroids {
                convergence = Convergence::Converged {
                    iterations: iter + 1,
                };
                break;
            }
            centroids = new_centroids;
        }

        match convergence {
            Convergence::Converged { iterations } => {
                debug!("cosine k-means k={} converged after {} iterations", self.k, iterations)
            }
            Convergence::IterationCap { iterations } => debug!(
                "cosine k-means k={} hit the iteration cap ({}) without converging",
                self.k, iterations
            ),
        }

        Ok(PartitionFit {
            labels,
            centroids,
            cluster_sizes,
            objective_history,
            convergence,
        })
    }

    /// Pick k distinct rows as starting centroids.
    fn init_centroids(&self, matrix: &FeatureMatrix) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let picks = index::sample(&mut rng, matrix.nrows(), self.k);

        let mut centroids = Array2::zeros((self.k, matrix.ncols()));
        for (c, row) in picks.iter().enumerate() {
            centroids.row_mut(c).assign(&matrix.row(row));
        }
        centroids
    }
}

impl Default for CosineKmeans {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Clustering for CosineKmeans {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let matrix = FeatureMatrix::from_rows(data)?;
        self.partition(&matrix)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Nearest centroid and its distance, both sides unit length (or zero).
/// Strict `<` keeps the lowest index on ties.
fn nearest(point: ArrayView1<'_, f64>, centroids: &Array2<f64>) -> (usize, f64) {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.outer_iter().enumerate() {
        let dist = unit_distance(point, centroid);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = c;
        }
    }
    (best_cluster, best_dist)
}

fn assign_rows(matrix: &FeatureMatrix, centroids: &Array2<f64>) -> Vec<(usize, f64)> {
    let assign = |i: usize| nearest(matrix.unit_row(i), centroids);

    #[cfg(feature = "parallel")]
    {
        (0..matrix.nrows()).into_par_iter().map(assign).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..matrix.nrows()).map(assign).collect()
    }
}
