//! # topica
//!
//! Topic clustering for documents that are already feature vectors.
//!
//! Given a dense matrix (rows = documents, columns = features), `topica`
//! partitions the rows with k-means under cosine distance and picks the
//! number of clusters by the mean cosine silhouette:
//!
//! - [`FeatureMatrix`]: validated input (finite values, no zero rows)
//! - [`CosineKmeans`]: fixed-k partition, reproducible from a seed
//! - [`ModelSelector`]: tries `k_min..=k_max`, keeps the best silhouette
//! - [`metrics`]: silhouette scores and ARI
//! - [`SelectionCache`]: caller-owned memoization keyed by content hash
//! - [`summarize`]: per-cluster summaries such as top terms
//!
//! How text becomes vectors (tokenizing, weighting) is the caller's business.
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
//! ])?;
//!
//! let outcome = ModelSelector::new(2, 4).with_seed(42).select(&m)?;
//! assert_eq!(outcome.k, 2);
//! # Ok::<(), topica::Error>(())
//! ```
//!
//! ## Features
//!
//! - `parallel`: rayon for the assignment step, the distance matrix and the
//!   per-k trials. Results are identical to the sequential build.
//! - `serde`: `Serialize`/`Deserialize` for configuration and results.

#![forbid(unsafe_code)]

pub mod cache;
pub mod cluster;
pub mod distance;
/// Error types used across `topica`.
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod selection;
pub mod summarize;

pub use cache::{SelectionCache, SelectionKey};
pub use cluster::{Clustering, Convergence, CosineKmeans, PartitionFit};
pub use error::{Error, Result};
pub use matrix::FeatureMatrix;
pub use metrics::{ari, silhouette_score};
pub use selection::{CandidateResult, ModelSelector, SelectionOutcome, TrialFailurePolicy};
pub use summarize::{Summarizer, TermFrequency};
