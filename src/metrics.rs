//! Clustering evaluation metrics.
//!
//! # Metrics Overview
//!
//! | Metric | Needs | Range | Best |
//! |--------|-------|-------|------|
//! | [`silhouette_score`] | data + labels | [-1, 1] | 1 |
//! | [`ari`] | two labelings | [-1, 1] | 1 |
//!
//! The silhouette is *internal*: it judges a partition from the data alone,
//! which is what model selection needs. ARI is *external*: it compares a
//! partition against another one (ground truth, or a second run) and ignores
//! how labels are numbered.
//!
//! # Silhouette
//!
//! For row i with cluster C:
//!
//! ```text
//! a(i) = mean d(i, j) over j ∈ C, j ≠ i
//! b(i) = min over non-empty C' ≠ C of mean d(i, j), j ∈ C'
//! s(i) = (b(i) - a(i)) / max(a(i), b(i))
//! ```
//!
//! with d the cosine distance. s(i) is 0 when C is a singleton, when there
//! is no other non-empty cluster, or when a(i) = b(i) = 0. The score is the
//! mean of s(i) over all rows.
//!
//! Cost is O(N²) per labeling on top of an O(N² D) distance matrix; the
//! `_precomputed` variants let callers pay for the matrix once.
//!
//! # References
//!
//! - Rousseeuw (1987). "Silhouettes: a graphical aid to the interpretation
//!   and validation of cluster analysis"
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)

use crate::distance::pairwise_cosine_distances;
use crate::error::{Error, Result};
use crate::matrix::FeatureMatrix;
use ndarray::ArrayView2;
use std::collections::HashMap;

/// Per-row silhouette values from a precomputed distance matrix.
///
/// `distances` must be N x N with N = `labels.len()`, and every label must
/// be below N (a labeling of N rows has at most N clusters).
pub fn silhouette_samples_precomputed(
    distances: ArrayView2<'_, f64>,
    labels: &[usize],
) -> Result<Vec<f64>> {
    let n = labels.len();
    if n == 0 {
        return Err(Error::EmptyInput);
    }
    for dim in [distances.nrows(), distances.ncols()] {
        if dim != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                found: dim,
            });
        }
    }

    if labels.iter().any(|&l| l >= n) {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "label must be below the number of rows",
        });
    }

    let k = labels.iter().max().map_or(0, |&m| m + 1);
    let sizes = cluster_sizes(labels, k);

    let mut out = Vec::with_capacity(n);
    let mut sums = vec![0.0f64; k];
    for (i, row) in distances.outer_iter().enumerate() {
        let own = labels[i];
        if sizes[own] <= 1 {
            out.push(0.0);
            continue;
        }

        sums.iter_mut().for_each(|s| *s = 0.0);
        for (j, &d) in row.iter().enumerate() {
            if j != i {
                sums[labels[j]] += d;
            }
        }

        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..k)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);

        if !b.is_finite() {
            out.push(0.0);
            continue;
        }

        let denom = a.max(b);
        let s = if denom > 0.0 { (b - a) / denom } else { 0.0 };
        out.push(s.clamp(-1.0, 1.0));
    }

    Ok(out)
}

/// Mean silhouette from a precomputed distance matrix.
pub fn silhouette_score_precomputed(distances: ArrayView2<'_, f64>, labels: &[usize]) -> Result<f64> {
    let samples = silhouette_samples_precomputed(distances, labels)?;
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Mean cosine silhouette of `labels` over `matrix`.
///
/// ```rust
/// use topica::{metrics::silhouette_score, FeatureMatrix};
///
/// let m = FeatureMatrix::from_rows(&[
///     vec![1.0, 0.0],
///     vec![0.9, 0.1],
///     vec![0.0, 1.0],
///     vec![0.1, 0.9],
/// ])
/// .unwrap();
///
/// let good = silhouette_score(&m, &[0, 0, 1, 1]).unwrap();
/// let bad = silhouette_score(&m, &[0, 1, 0, 1]).unwrap();
/// assert!(good > 0.9);
/// assert!(bad < 0.0);
/// ```
pub fn silhouette_score(matrix: &FeatureMatrix, labels: &[usize]) -> Result<f64> {
    if labels.len() != matrix.nrows() {
        return Err(Error::DimensionMismatch {
            expected: matrix.nrows(),
            found: labels.len(),
        });
    }
    let distances = pairwise_cosine_distances(matrix);
    silhouette_score_precomputed(distances.view(), labels)
}

/// Number of rows carrying each label in `0..k`.
///
/// Labels `>= k` are ignored.
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &l in labels {
        if let Some(s) = sizes.get_mut(l) {
            *s += 1;
        }
    }
    sizes
}

/// Adjusted Rand Index between two clusterings.
///
/// 0 for chance agreement, 1 for identical partitions (up to relabeling).
///
/// ```rust
/// use topica::metrics::ari;
///
/// assert!((ari(&[0, 0, 1, 1], &[1, 1, 0, 0]) - 1.0).abs() < 1e-12);
/// ```
pub fn ari(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut joint: HashMap<(usize, usize), usize> = HashMap::new();
    let mut row_sums: HashMap<usize, usize> = HashMap::new();
    let mut col_sums: HashMap<usize, usize> = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth) {
        *joint.entry((p, t)).or_insert(0) += 1;
        *row_sums.entry(p).or_insert(0) += 1;
        *col_sums.entry(t).or_insert(0) += 1;
    }

    let sum_comb_ij: f64 = joint.values().map(|&c| comb2(c)).sum();
    let sum_comb_a: f64 = row_sums.values().map(|&c| comb2(c)).sum();
    let sum_comb_b: f64 = col_sums.values().map(|&c| comb2(c)).sum();
    let comb_n = comb2(pred.len());

    let expected = if comb_n > 0.0 {
        sum_comb_a * sum_comb_b / comb_n
    } else {
        0.0
    };
    let max_index = (sum_comb_a + sum_comb_b) / 2.0;

    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        // Both labelings are trivial (all one cluster, or all singletons).
        return if is_one_to_one(&joint, &row_sums, &col_sums) {
            1.0
        } else {
            0.0
        };
    }

    (sum_comb_ij - expected) / denom
}

fn comb2(n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        (n * (n - 1) / 2) as f64
    }
}

fn is_one_to_one(
    joint: &HashMap<(usize, usize), usize>,
    row_sums: &HashMap<usize, usize>,
    col_sums: &HashMap<usize, usize>,
) -> bool {
    joint.len() == row_sums.len() && joint.len() == col_sums.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_silhouette_two_topics_near_one() {
        let m = FeatureMatrix::from_rows(&[
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.95, 0.05],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![0.05, 0.95],
        ])
        .unwrap();
        let score = silhouette_score(&m, &[0, 0, 0, 1, 1, 1]).unwrap();
        assert!(score > 0.99, "score = {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn test_silhouette_hand_computed() {
        // Row 0: a = 0.2, b = (0.6 + 0.8) / 2 = 0.7 → s = 0.5 / 0.7
        let d = array![
            [0.0, 0.2, 0.6, 0.8],
            [0.2, 0.0, 0.5, 0.7],
            [0.6, 0.5, 0.0, 0.1],
            [0.8, 0.7, 0.1, 0.0],
        ];
        let s = silhouette_samples_precomputed(d.view(), &[0, 0, 1, 1]).unwrap();
        assert!((s[0] - 0.5 / 0.7).abs() < 1e-12);
        assert!((s[1] - (0.6 - 0.2) / 0.6).abs() < 1e-12);

        let score = silhouette_score_precomputed(d.view(), &[0, 0, 1, 1]).unwrap();
        assert!((score - s.iter().sum::<f64>() / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_singleton_cluster_scores_zero() {
        let d = array![[0.0, 0.3, 0.9], [0.3, 0.0, 0.8], [0.9, 0.8, 0.0]];
        let s = silhouette_samples_precomputed(d.view(), &[0, 0, 1]).unwrap();
        assert_eq!(s[2], 0.0);
        assert!(s[0] > 0.0);
    }

    #[test]
    fn test_single_cluster_scores_zero() {
        // Labels skip cluster 0 entirely: no other non-empty cluster exists.
        let d = array![[0.0, 0.3], [0.3, 0.0]];
        let s = silhouette_samples_precomputed(d.view(), &[1, 1]).unwrap();
        assert_eq!(s, vec![0.0, 0.0]);
    }

    #[test]
    fn test_identical_points_score_zero() {
        let d = array![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
        let s = silhouette_samples_precomputed(d.view(), &[0, 1, 1]).unwrap();
        // Row 1: a = 1.0, b = 0.0 → s = -1.
        assert_eq!(s[1], -1.0);
        assert_eq!(s[0], 0.0);
    }

    #[test]
    fn test_silhouette_shape_errors() {
        let d = array![[0.0, 0.3], [0.3, 0.0]];
        assert!(matches!(
            silhouette_samples_precomputed(d.view(), &[0, 1, 1]),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(
            silhouette_samples_precomputed(d.view(), &[]).unwrap_err(),
            Error::EmptyInput
        );
    }

    #[test]
    fn test_out_of_range_labels_rejected() {
        let d = array![[0.0, 0.3], [0.3, 0.0]];
        for bad in [2, 1 << 40, usize::MAX] {
            assert!(matches!(
                silhouette_samples_precomputed(d.view(), &[0, bad]),
                Err(Error::InvalidParameter { name: "labels", .. })
            ));
        }

        let m = FeatureMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(silhouette_score(&m, &[0, usize::MAX]).is_err());
    }

    #[test]
    fn test_cluster_sizes_counts_empty_labels() {
        assert_eq!(cluster_sizes(&[0, 2, 2, 0, 2], 4), vec![2, 0, 3, 0]);
    }

    #[test]
    fn test_ari_perfect_and_permuted() {
        assert!((ari(&[0, 0, 1, 1], &[0, 0, 1, 1]) - 1.0).abs() < 0.01);
        assert!((ari(&[1, 1, 0, 0, 2, 2], &[0, 0, 1, 1, 2, 2]) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_ari_disagreement_is_low() {
        assert!(ari(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 0.5);
    }
}
