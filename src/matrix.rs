//! Validated dense feature matrices.
//!
//! A [`FeatureMatrix`] is the only input the clustering engine accepts. It is
//! built once, checked once, and then shared read-only by every trial:
//!
//! - at least one row, every row the same length
//! - every value finite
//! - no row with zero magnitude (cosine distance is undefined for it)
//!
//! Unit-length copies of the rows are cached at construction, since every
//! cosine distance is a dot product between them. They are computed from
//! max-abs scaled rows, so magnitude alone (tiny or huge) never makes a row
//! degenerate.

use crate::distance::unit_rows;
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Dense N x D matrix of document feature vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    data: Array2<f64>,
    units: Array2<f64>,
}

impl FeatureMatrix {
    /// Validate and wrap an owned array (rows = documents, columns = features).
    pub fn new(data: Array2<f64>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(Error::EmptyInput);
        }

        for (i, row) in data.outer_iter().enumerate() {
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(Error::NonFiniteValue { row: i, col: j });
            }
        }

        if let Some(row) = data.outer_iter().position(|row| row.iter().all(|&v| v == 0.0)) {
            return Err(Error::DegenerateVector { row });
        }

        let units = unit_rows(&data);
        Ok(Self { data, units })
    }

    /// Build from row vectors, e.g. the output of a TF-IDF step.
    ///
    /// ```rust
    /// use topica::FeatureMatrix;
    ///
    /// let m = FeatureMatrix::from_rows(&[vec![1.0f32, 0.0], vec![0.0, 1.0]]).unwrap();
    /// assert_eq!((m.nrows(), m.ncols()), (2, 2));
    ///
    /// // A zero row is rejected up front.
    /// assert!(FeatureMatrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 0.0]]).is_err());
    /// ```
    pub fn from_rows<T>(rows: &[Vec<T>]) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let d = rows[0].len();

        let mut flat: Vec<f64> = Vec::with_capacity(n * d);
        for row in rows {
            if row.len() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    found: row.len(),
                });
            }
            flat.extend(row.iter().map(|&v| v.into()));
        }

        let data = Array2::from_shape_vec((n, d), flat).map_err(|e| Error::Other(e.to_string()))?;
        Self::new(data)
    }

    /// Number of rows (documents).
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns (features).
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// View of row `i`.
    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.data.row(i)
    }

    /// Row `i` scaled to unit length.
    pub fn unit_row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.units.row(i)
    }

    /// All rows scaled to unit length.
    pub fn units(&self) -> ArrayView2<'_, f64> {
        self.units.view()
    }

    /// Read-only view of the whole matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }
}

impl TryFrom<Array2<f64>> for FeatureMatrix {
    type Error = Error;

    fn try_from(data: Array2<f64>) -> Result<Self> {
        Self::new(data)
    }
}
