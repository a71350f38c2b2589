use thiserror::Error;

/// Result alias for `topica`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering and model selection.
///
/// Every variant describes a violated input contract. None of them is
/// recoverable by retrying the same call, and no partial result accompanies
/// them. Hitting the iteration cap is not an error: see
/// [`Convergence`](crate::cluster::Convergence).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Rows or matrices have inconsistent dimensions.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// A feature value is NaN or infinite.
    #[error("non-finite value at row {row}, column {col}")]
    NonFiniteValue {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
    },

    /// A row has zero magnitude, so its cosine distance is undefined.
    #[error("row {row} has zero magnitude; cosine distance is undefined")]
    DegenerateVector {
        /// Row index.
        row: usize,
    },

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} items (need 1 < k <= n)")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Malformed bounds for the cluster-count search.
    #[error("invalid k range {k_min}..={k_max} for {n_items} items (need 2 <= k_min <= k_max < n)")]
    InvalidRange {
        /// Lower bound (inclusive).
        k_min: usize,
        /// Upper bound (inclusive).
        k_max: usize,
        /// Number of items.
        n_items: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// Every candidate k was skipped, so there is nothing to select from.
    #[error("no candidate cluster count produced a partition")]
    NoCandidates,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failed_precondition() {
        let err = Error::InvalidRange {
            k_min: 2,
            k_max: 6,
            n_items: 6,
        };
        assert_eq!(
            err.to_string(),
            "invalid k range 2..=6 for 6 items (need 2 <= k_min <= k_max < n)"
        );

        let err = Error::DegenerateVector { row: 3 };
        assert!(err.to_string().contains("row 3"));
    }
}
