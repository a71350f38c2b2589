//! Cosine distance and centroid helpers shared by the partitioner and the
//! silhouette score.
//!
//! ```text
//! d(a, b) = 1 - (a · b) / (|a| |b|)        d ∈ [0, 2]
//! ```
//!
//! Input rows are never zero (see [`FeatureMatrix`]), but a centroid can be:
//! the mean of `(1, 0)` and `(-1, 0)` is the origin. A zero-magnitude operand
//! has similarity 0 with everything, so its distance is 1.

use crate::matrix::FeatureMatrix;
use ndarray::{Array1, Array2, ArrayView1};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Cosine distance between two vectors of equal length.
#[inline]
pub fn cosine_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    unit_distance(unit_vector(a).view(), unit_vector(b).view())
}

/// `v` scaled to unit length, or all zeros when `v` has no magnitude.
///
/// Components are divided by the largest absolute value before squaring, so
/// rows around `1e-170` or `1e200` neither underflow to a zero norm nor
/// overflow to an infinite one.
pub fn unit_vector(v: ArrayView1<'_, f64>) -> Array1<f64> {
    let scale = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return Array1::zeros(v.len());
    }
    let scaled = v.mapv(|x| x / scale);
    let norm = scaled.dot(&scaled).sqrt();
    scaled / norm
}

/// Unit-length copy of every row (zero rows stay zero).
pub(crate) fn unit_rows(rows: &Array2<f64>) -> Array2<f64> {
    let mut out = Array2::zeros(rows.raw_dim());
    for (mut dst, src) in out.outer_iter_mut().zip(rows.outer_iter()) {
        dst.assign(&unit_vector(src));
    }
    out
}

/// Cosine distance between two vectors that are unit length or zero.
///
/// A zero operand has similarity 0, hence distance 1.
#[inline]
pub(crate) fn unit_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    (1.0 - a.dot(&b)).clamp(0.0, 2.0)
}

/// Full N x N cosine distance matrix: symmetric, zero diagonal.
///
/// Silhouette scoring reads every entry once per trial, so model selection
/// computes this a single time and shares it across all candidate k.
pub fn pairwise_cosine_distances(matrix: &FeatureMatrix) -> Array2<f64> {
    let n = matrix.nrows();

    let upper = |i: usize| -> Vec<f64> {
        ((i + 1)..n)
            .map(|j| unit_distance(matrix.unit_row(i), matrix.unit_row(j)))
            .collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(upper).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..n).map(upper).collect();

    let mut out = Array2::zeros((n, n));
    for (i, row) in rows.into_iter().enumerate() {
        for (offset, d) in row.into_iter().enumerate() {
            let j = i + 1 + offset;
            out[[i, j]] = d;
            out[[j, i]] = d;
        }
    }
    out
}

/// Per-cluster means of the rows in `matrix` labelled by `labels`.
///
/// Each member contributes `row / count`, so the sum stays finite for any
/// finite input. A cluster with no members keeps its row from `previous`
/// untouched, so the result never contains NaN.
pub(crate) fn update_centroids(
    matrix: &FeatureMatrix,
    labels: &[usize],
    previous: &Array2<f64>,
) -> (Array2<f64>, Vec<usize>) {
    let k = previous.nrows();
    let mut counts = vec![0usize; k];
    for &label in labels {
        counts[label] += 1;
    }

    let mut means = Array2::<f64>::zeros(previous.raw_dim());
    for (i, &label) in labels.iter().enumerate() {
        means
            .row_mut(label)
            .scaled_add(1.0 / counts[label] as f64, &matrix.row(i));
    }

    for (c, &count) in counts.iter().enumerate() {
        if count == 0 {
            means.row_mut(c).assign(&previous.row(c));
        }
    }

    (means, counts)
}
