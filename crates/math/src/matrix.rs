//! Dense row-major matrices with named block-composition operations.
//!
//! The linearized trajectory engine stacks its constraint systems out of
//! small blocks. Rows keep the order in which blocks were concatenated, and
//! downstream constraint semantics depend on that order, so composition is
//! expressed through named functions rather than arithmetic operators.

use crate::MathError;

/// A dense `rows x cols` matrix of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from rows. Every row must have the same non-zero width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MathError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MathError::DimensionMismatch(height, width, 0, 0, "from_rows"));
        }
        let mut data = Vec::with_capacity(height * width);
        for row in &rows {
            if row.len() != width {
                return Err(MathError::DimensionMismatch(
                    height,
                    width,
                    1,
                    row.len(),
                    "from_rows",
                ));
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: height,
            cols: width,
            data,
        })
    }

    /// Zero matrix of the given dimensions.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Identity matrix of the given size.
    pub fn identity(size: usize) -> Self {
        let mut m = Matrix::zeros(size, size);
        for i in 0..size {
            m.data[i * size + i] = 1.0;
        }
        m
    }

    /// Square matrix with `values` on the diagonal.
    pub fn diagonal(values: &[f64]) -> Self {
        let size = values.len();
        let mut m = Matrix::zeros(size, size);
        for (i, v) in values.iter().enumerate() {
            m.data[i * size + i] = *v;
        }
        m
    }

    /// Column vector from a slice.
    pub fn column(values: &[f64]) -> Self {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Row `row` as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Stack `other` below `self`. Column counts must match.
    pub fn vertical_concat(&self, other: &Matrix) -> Result<Matrix, MathError> {
        if self.cols != other.cols {
            return Err(MathError::DimensionMismatch(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
                "vertical_concat",
            ));
        }
        let mut data = self.data.clone();
        data.extend_from_slice(&other.data);
        Ok(Matrix {
            rows: self.rows + other.rows,
            cols: self.cols,
            data,
        })
    }

    /// Append `other` to the right of `self`. Row counts must match.
    pub fn horizontal_concat(&self, other: &Matrix) -> Result<Matrix, MathError> {
        if self.rows != other.rows {
            return Err(MathError::DimensionMismatch(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
                "horizontal_concat",
            ));
        }
        let cols = self.cols + other.cols;
        let mut data = Vec::with_capacity(self.rows * cols);
        for i in 0..self.rows {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        Ok(Matrix {
            rows: self.rows,
            cols,
            data,
        })
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Matrix) -> Result<Matrix, MathError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MathError::DimensionMismatch(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
                "add",
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MathError> {
        if self.cols != other.rows {
            return Err(MathError::DimensionMismatch(
                self.rows,
                self.cols,
                other.rows,
                other.cols,
                "multiply",
            ));
        }
        let mut out = Matrix::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a = self.get(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..other.cols {
                    out.data[i * other.cols + j] += a * other.get(k, j);
                }
            }
        }
        Ok(out)
    }

    /// Scale every element by `factor`.
    pub fn scale(&self, factor: f64) -> Matrix {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * factor).collect(),
        }
    }
}
