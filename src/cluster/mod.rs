//! Fixed-k partitioning of document vectors.
//!
//! ## Why cosine
//!
//! Document vectors (TF-IDF weights, embeddings) encode a topic in their
//! *direction*; length mostly tracks document size. A long and a short
//! article about the same event point the same way but sit far apart in
//! Euclidean space. Cosine distance compares directions only:
//!
//! ```text
//! d(a, b) = 1 - (a · b) / (|a| |b|)
//! ```
//!
//! ## K-means
//!
//! [`CosineKmeans`] is Lloyd's algorithm with cosine distance in the
//! assignment step and the arithmetic mean in the update step:
//!
//! 1. **Init**: k distinct rows, sampled with a seeded generator
//! 2. **Assign**: each row → nearest centroid
//! 3. **Update**: each centroid → mean of its rows
//! 4. Repeat until the centroids stop changing or the iteration cap is hit
//!
//! **Assumptions**:
//! - You know k in advance (otherwise see [`ModelSelector`](crate::ModelSelector))
//! - Topics are roughly separated by angle
//!
//! ## Usage
//!
//! ```rust
//! use topica::cluster::{Clustering, CosineKmeans};
//!
//! let data = vec![
//!     vec![1.0, 0.0],
//!     vec![5.0, 0.4],
//!     vec![0.0, 1.0],
//!     vec![0.3, 4.0],
//! ];
//!
//! let labels = CosineKmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]); // same direction, different length
//! assert_ne!(labels[0], labels[2]);
//! ```

mod kmeans;
mod traits;

pub use kmeans::{Convergence, CosineKmeans, PartitionFit, DEFAULT_MAX_ITER, DEFAULT_SEED};
pub use traits::Clustering;
