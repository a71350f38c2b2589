//! Choosing the number of clusters by silhouette.
//!
//! [`ModelSelector`] runs [`CosineKmeans`] once per candidate k in
//! `k_min..=k_max`, scores every partition with the mean cosine silhouette
//! and keeps the best one.
//!
//! ```text
//! k* = argmax_k  silhouette(kmeans_k(X))     ties → smallest k
//! ```
//!
//! # Cost
//!
//! The pairwise distance matrix is computed once, O(N² D). Each trial then
//! costs one k-means run plus an O(N²) silhouette pass. This is deliberately
//! exact: with approximate scores the tie-break on equal scores would no
//! longer be well defined.
//!
//! # Seeding
//!
//! Every trial builds its own generator from the configured seed. Trial k is
//! therefore exactly `CosineKmeans::new(k).with_seed(seed)`, and trials share
//! no mutable state. With the `parallel` feature they run on rayon and the
//! outcome is identical to the sequential one: results are gathered in
//! ascending k before the reduction.
//!
//! # Usage
//!
//! ```rust
//! use topica::{FeatureMatrix, ModelSelector};
//!
//! let m = FeatureMatrix::from_rows(&[
//!     vec![1.0, 0.0],
//!     vec![0.9, 0.1],
//!     vec![0.95, 0.05],
//!     vec![0.0, 1.0],
//!     vec![0.1, 0.9],
//!     vec![0.05, 0.95],
//! ])
//! .unwrap();
//!
//! let outcome = ModelSelector::new(2, 4).with_seed(42).select(&m).unwrap();
//! assert_eq!(outcome.k, 2);
//! assert!(outcome.score > 0.99);
//! ```

use crate::cluster::{Clustering, CosineKmeans, DEFAULT_MAX_ITER, DEFAULT_SEED};
use crate::distance::pairwise_cosine_distances;
use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;
use crate::metrics::{cluster_sizes, silhouette_score_precomputed};
use crate::summarize::group_by_cluster;
use log::{debug, warn};
use ndarray::ArrayView2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// What to do when a single trial fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrialFailurePolicy {
    /// Abort the whole search with the trial's error.
    #[default]
    Abort,
    /// Log a warning, leave that k out and keep going.
    Skip,
}

/// One trial: a candidate k, its partition and its score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateResult {
    /// Cluster count tried.
    pub k: usize,
    /// Labels produced for this k.
    pub labels: Vec<usize>,
    /// Mean cosine silhouette of `labels`.
    pub score: f64,
}

/// The chosen cluster count and its partition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionOutcome {
    /// Selected number of clusters.
    pub k: usize,
    /// One label in `0..k` per row.
    pub labels: Vec<usize>,
    /// Mean cosine silhouette of `labels`.
    pub score: f64,
}

impl SelectionOutcome {
    /// Rows per cluster, indexed by label. Empty clusters count as 0.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        cluster_sizes(&self.labels, self.k)
    }

    /// Row indices of each cluster, indexed by label.
    ///
    /// Fails if a label is not below `k`, which only happens for outcomes
    /// built or deserialized by hand.
    pub fn members(&self) -> Result<Vec<Vec<usize>>> {
        group_by_cluster(&self.labels, self.k)
    }
}

impl From<CandidateResult> for SelectionOutcome {
    fn from(c: CandidateResult) -> Self {
        Self {
            k: c.k,
            labels: c.labels,
            score: c.score,
        }
    }
}

/// Silhouette-driven search over a range of cluster counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelSelector {
    /// Smallest k tried (inclusive, at least 2).
    pub k_min: usize,
    /// Largest k tried (inclusive, below the number of rows).
    pub k_max: usize,
    /// Seed for every trial's centroid initialization.
    pub seed: u64,
    /// Iteration cap for every trial.
    pub max_iter: usize,
    /// Behavior on a failed trial.
    pub on_trial_failure: TrialFailurePolicy,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self {
            k_min: 2,
            k_max: 10,
            seed: DEFAULT_SEED,
            max_iter: DEFAULT_MAX_ITER,
            on_trial_failure: TrialFailurePolicy::Abort,
        }
    }
}

impl ModelSelector {
    /// Search `k_min..=k_max` with default seed and iteration cap.
    pub fn new(k_min: usize, k_max: usize) -> Self {
        Self {
            k_min,
            k_max,
            ..Self::default()
        }
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set maximum iterations per trial.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the trial failure policy.
    pub fn with_failure_policy(mut self, policy: TrialFailurePolicy) -> Self {
        self.on_trial_failure = policy;
        self
    }

    /// Check the range against a dataset of `n_items` rows.
    pub fn validate(&self, n_items: usize) -> Result<()> {
        if self.k_min < 2 || self.k_max >= n_items || self.k_min > self.k_max {
            return Err(Error::InvalidRange {
                k_min: self.k_min,
                k_max: self.k_max,
                n_items,
            });
        }
        Ok(())
    }

    /// Run every trial and return them in ascending k.
    ///
    /// Skipped trials (under [`TrialFailurePolicy::Skip`]) are absent.
    pub fn evaluate(&self, matrix: &FeatureMatrix) -> Result<Vec<CandidateResult>> {
        self.validate(matrix.nrows())?;

        let distances = pairwise_cosine_distances(matrix);
        let run = |k: usize| self.trial(matrix, distances.view(), k);

        #[cfg(feature = "parallel")]
        let trials: Vec<Result<CandidateResult>> = (self.k_min..=self.k_max).into_par_iter().map(run).collect();
        #[cfg(not(feature = "parallel"))]
        let trials: Vec<Result<CandidateResult>> = (self.k_min..=self.k_max).map(run).collect();

        let mut candidates = Vec::with_capacity(trials.len());
        for (k, trial) in (self.k_min..=self.k_max).zip(trials) {
            match trial {
                Ok(candidate) => candidates.push(candidate),
                Err(e) => match self.on_trial_failure {
                    TrialFailurePolicy::Abort => return Err(e),
                    TrialFailurePolicy::Skip => warn!("skipping k={k}: {e}"),
                },
            }
        }
        Ok(candidates)
    }

    /// Pick the best-scoring k.
    pub fn select(&self, matrix: &FeatureMatrix) -> Result<SelectionOutcome> {
        let candidates = self.evaluate(matrix)?;
        let best = best_candidate(candidates).ok_or(Error::NoCandidates)?;
        debug!("selected k={} (silhouette {:.4})", best.k, best.score);
        Ok(best.into())
    }

    fn trial(&self, matrix: &FeatureMatrix, distances: ArrayView2<'_, f64>, k: usize) -> Result<CandidateResult> {
        let fit = CosineKmeans::new(k)
            .with_seed(self.seed)
            .with_max_iter(self.max_iter)
            .fit(matrix)?;
        let score = silhouette_score_precomputed(distances, &fit.labels)?;
        debug!(
            "k={} silhouette={:.4} iterations={} converged={}",
            k,
            score,
            fit.convergence.iterations(),
            fit.convergence.is_converged()
        );
        Ok(CandidateResult {
            k,
            labels: fit.labels,
            score,
        })
    }
}

/// Highest score wins; on equal scores the smaller k wins.
///
/// Order of `candidates` does not matter.
pub fn best_candidate(candidates: impl IntoIterator<Item = CandidateResult>) -> Option<CandidateResult> {
    candidates.into_iter().fold(None, |best, c| match best {
        None => Some(c),
        Some(b) if c.score > b.score || (c.score == b.score && c.k < b.k) => Some(c),
        keep => keep,
    })
}

impl Clustering for ModelSelector {
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let matrix = FeatureMatrix::from_rows(data)?;
        self.select(&matrix).map(|outcome| outcome.labels)
    }

    /// The count is chosen during fitting, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}
