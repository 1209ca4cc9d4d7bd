use ndarray::{Array2, Axis};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A two-dimensional `f64` matrix backed by `ndarray`.
///
/// Rows are samples when the matrix holds a batch: a batch of 64 images is a
/// 64x784 matrix, and layer weights are stored input x output so that a
/// forward step is `batch.dot(&weights)`.
///
/// All data is kept in standard (row-major, contiguous) layout so `data()`
/// can always hand out a flat slice.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    #[must_use]
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            rows * cols,
            "Data length must match rows * cols"
        );
        Self {
            data: Array2::from_shape_vec((rows, cols), data)
                .expect("length checked against shape above"),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline(always)]
    #[must_use]
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    #[inline(always)]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[[row, col]]
    }

    /// Flat view of the matrix contents in row-major order.
    #[inline(always)]
    #[must_use]
    pub fn data(&self) -> &[f64] {
        self.data
            .as_slice()
            .expect("matrix is always stored in standard layout")
    }

    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Glorot-uniform initialization: samples from
    /// `U(-sqrt(6 / (rows + cols)), sqrt(6 / (rows + cols)))`.
    ///
    /// Keeps activation variance roughly constant across a stack of dense
    /// layers, which plain `U(-1, 1)` does not for wide inputs.
    #[must_use]
    pub fn glorot(rows: usize, cols: usize) -> Self {
        let limit = (6.0 / (rows + cols) as f64).sqrt();
        Self {
            data: Array2::random((rows, cols), Uniform::new(-limit, limit)),
        }
    }

    #[must_use]
    pub fn dot(&self, other: &Matrix) -> Matrix {
        assert_eq!(
            self.cols(),
            other.rows(),
            "Invalid matrix dimensions for multiplication"
        );
        Self {
            data: self.data.dot(&other.data),
        }
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }

    #[must_use]
    pub fn add(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows(), other.rows(), "Matrix rows must match");
        assert_eq!(self.cols(), other.cols(), "Matrix columns must match");
        Self {
            data: &self.data + &other.data,
        }
    }

    #[must_use]
    pub fn subtract(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows(), other.rows(), "Matrix rows must match");
        assert_eq!(self.cols(), other.cols(), "Matrix columns must match");
        Self {
            data: &self.data - &other.data,
        }
    }

    #[must_use]
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.rows(), other.rows(), "Matrix rows must match");
        assert_eq!(self.cols(), other.cols(), "Matrix columns must match");
        Self {
            data: &self.data * &other.data,
        }
    }

    #[must_use]
    pub fn scale(&self, factor: f64) -> Matrix {
        Self {
            data: &self.data * factor,
        }
    }

    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            data: self.data.mapv(|x| f(x)),
        }
    }

    /// Adds a 1xN row matrix to every row of this matrix.
    ///
    /// Used to apply a bias row across a whole batch in one step.
    #[must_use]
    pub fn add_row_broadcast(&self, row: &Matrix) -> Matrix {
        assert_eq!(row.rows(), 1, "Broadcast operand must be a single row");
        assert_eq!(self.cols(), row.cols(), "Matrix columns must match");
        Self {
            data: &self.data + &row.data,
        }
    }

    /// Sums over the rows, producing a 1xN matrix of column totals.
    #[must_use]
    pub fn sum_rows(&self) -> Matrix {
        Self {
            data: self.data.sum_axis(Axis(0)).insert_axis(Axis(0)),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::zeros(0, 0)
    }
}

impl From<Vec<f64>> for Matrix {
    fn from(vec: Vec<f64>) -> Self {
        let rows = vec.len();
        Matrix::new(rows, 1, vec)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.rows() {
            for value in row {
                write!(f, "{:8.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
